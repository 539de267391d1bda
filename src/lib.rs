pub mod chat;
pub mod config;
pub mod error;
pub mod render;
pub mod res;
pub mod rolloff;
pub mod session;

use axum::{
    Router,
    extract::FromRef,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer, cookie::SameSite};

use chat::Room;
use config::Config;
use error::ChatError;
use render::Renderer;
use rolloff::RollOffs;

#[derive(Clone, FromRef)]
pub struct AppState {
    pub room: Room,
    pub roll_offs: RollOffs,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        let room = Room::new(Renderer::from_config(config), config.poll_timeout);
        let roll_offs = RollOffs::new(room.clone(), config.roll_off_delay);
        Self { room, roll_offs }
    }
}

pub fn app(app_state: AppState) -> Router {
    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_secure(false)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnSessionEnd);

    Router::new()
        .route("/", get(res::index))
        .merge(chat::router())
        .merge(rolloff::router())
        .with_state(app_state)
        .layer(session_layer)
        .layer(TraceLayer::new_for_http())
}

pub type AppResult<T> = Result<T, AppError>;
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let Some(err) = self.0.downcast_ref::<ChatError>() {
            tracing::debug!(error = %err, "request refused");
            return (err.status(), err.to_string()).into_response();
        }

        tracing::error!(error = %self.0, "request failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("{}\n\n{}", self.0, self.0.backtrace()),
        )
            .into_response()
    }
}

macro_rules! apperr_impl {
    ($E:ty) => {
        impl From<$E> for AppError {
            fn from(err: $E) -> Self {
                Self(anyhow::Error::from(err))
            }
        }
    };
}

apperr_impl!(ChatError);
apperr_impl!(tower_sessions::session::Error);
