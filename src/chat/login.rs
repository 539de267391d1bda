use axum::{Json, debug_handler, extract::State, http::StatusCode};
use serde::Deserialize;
use tower_sessions::Session;

use crate::{
    AppResult, AppState,
    error::ChatError,
    session::{self, USERNAME},
};

use super::{ChatMessage, Room};

#[derive(Deserialize)]
pub(crate) struct LoginRequest {
    username: String,
}

/// Joins the room and hands back the history to start the client off.
///
/// A session still in the room has to log out before taking another name.
#[debug_handler(state = AppState)]
pub(crate) async fn login(
    State(room): State<Room>,
    session: Session,
    Json(LoginRequest { username }): Json<LoginRequest>,
) -> AppResult<Json<Vec<ChatMessage>>> {
    if let Some(current) = session.get::<String>(USERNAME).await? {
        if room.user(&current).is_some() {
            return Err(ChatError::AlreadyLoggedIn(current))?;
        }
    }

    let username = username.trim();
    let joined = room.join(username).await?;
    session.insert(USERNAME, username).await?;

    Ok(Json(joined.history))
}

#[debug_handler(state = AppState)]
pub(crate) async fn logout(
    State(room): State<Room>,
    session: Session,
) -> AppResult<StatusCode> {
    let username = session::username(&session).await?;
    session.clear().await;
    room.leave(&username).await?;

    Ok(StatusCode::NO_CONTENT)
}
