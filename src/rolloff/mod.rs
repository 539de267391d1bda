mod engine;
mod enter;
mod new;
mod roll;

pub use engine::{RollOff, RollOffEntry, RollOffStatus, RollOffs, announce_roll};

use axum::{Router, routing::post};

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/roll", post(roll::roll))
        .route("/roll-off", post(new::new_roll_off))
        .route("/roll-off/{id}", post(enter::enter_roll_off).get(enter::roll_off))
}
