use axum::{Json, debug_handler, extract::State};
use tower_sessions::Session;

use crate::{AppResult, AppState, chat::{ChatMessage, Room}, session};

#[debug_handler(state = AppState)]
pub(crate) async fn roll(
    State(room): State<Room>,
    session: Session,
) -> AppResult<Json<ChatMessage>> {
    let username = session::username(&session).await?;
    let user = room.member(&username)?;

    Ok(Json(super::announce_roll(&room, &user).await))
}
