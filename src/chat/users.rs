use axum::{Json, debug_handler, extract::State};
use serde::Serialize;

use crate::AppState;

use super::Room;

#[derive(Serialize)]
pub(crate) struct Member {
    username: String,
}

#[debug_handler(state = AppState)]
pub(crate) async fn users(State(room): State<Room>) -> Json<Vec<Member>> {
    Json(
        room.roster()
            .into_iter()
            .map(|username| Member { username })
            .collect(),
    )
}
