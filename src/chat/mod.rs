mod feed;
mod history;
mod login;
mod mailbox;
mod message;
mod registry;
mod room;
mod users;

pub use history::{HISTORY_CAPACITY, MessageHistory};
pub use mailbox::{MAILBOX_CAPACITY, Mailbox, User};
pub use message::{ChatMessage, MessageKind, SYSTEM};
pub use registry::MembershipRegistry;
pub use room::{Joined, Poll, Room};

use axum::{
    Router,
    routing::{get, post},
};

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login::login).delete(login::logout))
        .route("/feed", get(feed::poll).post(feed::post))
        .route("/users", get(users::users))
}
