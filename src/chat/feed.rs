use axum::{Json, debug_handler, extract::State};
use serde::Deserialize;
use tower_sessions::Session;

use crate::{AppResult, AppState, session};

use super::{ChatMessage, Poll, Room};

#[derive(Deserialize)]
pub(crate) struct PostRequest {
    body: String,
}

#[debug_handler(state = AppState)]
pub(crate) async fn post(
    State(room): State<Room>,
    session: Session,
    Json(PostRequest { body }): Json<PostRequest>,
) -> AppResult<Json<ChatMessage>> {
    let username = session::username(&session).await?;
    Ok(Json(room.post(&username, &body).await?))
}

/// Long-poll: answers with the next message, or an empty list once the timeout runs out.
#[debug_handler(state = AppState)]
pub(crate) async fn poll(
    State(room): State<Room>,
    session: Session,
) -> AppResult<Json<Vec<ChatMessage>>> {
    let username = session::username(&session).await?;

    let messages = match room.poll(&username, room.poll_timeout()).await? {
        Poll::Message(msg) => vec![msg],
        Poll::Timeout => Vec::new(),
    };
    Ok(Json(messages))
}
