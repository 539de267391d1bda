use axum::http::StatusCode;
use thiserror::Error;

pub type ChatResult<T> = Result<T, ChatError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChatError {
    #[error("the username {0} is already taken")]
    DuplicateUsername(String),
    #[error("{0:?} is not a valid username")]
    InvalidUsername(String),
    #[error("{0} isn't in the room")]
    UnknownUser(String),
    #[error("no username on this session, log in first")]
    Anonymous,
    #[error("this session is already logged in as {0}")]
    AlreadyLoggedIn(String),
    #[error("no roll-off with id {0}")]
    ContestNotFound(String),
    #[error("roll-off {0} is already closed")]
    ContestClosed(String),
    #[error("mailbox of {0} is full")]
    MailboxOverflow(String),
}

impl ChatError {
    pub fn status(&self) -> StatusCode {
        use ChatError::*;
        match self {
            DuplicateUsername(_) | AlreadyLoggedIn(_) => StatusCode::CONFLICT,
            InvalidUsername(_) => StatusCode::BAD_REQUEST,
            UnknownUser(_) | ContestNotFound(_) => StatusCode::NOT_FOUND,
            Anonymous => StatusCode::UNAUTHORIZED,
            ContestClosed(_) => StatusCode::GONE,
            MailboxOverflow(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}
