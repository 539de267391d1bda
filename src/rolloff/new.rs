use axum::{Json, debug_handler, extract::State};
use tower_sessions::Session;

use crate::{AppResult, AppState, chat::Room, session};

use super::{RollOff, RollOffs};

#[debug_handler(state = AppState)]
pub(crate) async fn new_roll_off(
    State(room): State<Room>,
    State(roll_offs): State<RollOffs>,
    session: Session,
) -> AppResult<Json<RollOff>> {
    let username = session::username(&session).await?;
    let user = room.member(&username)?;

    Ok(Json(roll_offs.create(&user).await))
}
