use axum::{
    Json, debug_handler,
    extract::{Path, State},
};
use tower_sessions::Session;

use crate::{AppResult, AppState, chat::Room, error::ChatError, session};

use super::{RollOff, RollOffEntry, RollOffs};

#[debug_handler(state = AppState)]
pub(crate) async fn enter_roll_off(
    Path(id): Path<String>,
    State(room): State<Room>,
    State(roll_offs): State<RollOffs>,
    session: Session,
) -> AppResult<Json<RollOffEntry>> {
    let username = session::username(&session).await?;
    let user = room.member(&username)?;

    Ok(Json(roll_offs.enter(&id, &user).await?))
}

#[debug_handler(state = AppState)]
pub(crate) async fn roll_off(
    Path(id): Path<String>,
    State(roll_offs): State<RollOffs>,
) -> AppResult<Json<RollOff>> {
    let Some(contest) = roll_offs.get(&id) else {
        return Err(ChatError::ContestNotFound(id))?;
    };
    Ok(Json(contest))
}
