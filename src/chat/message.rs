use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Author name used for announcements. Nobody can log in under it.
pub const SYSTEM: &str = "system";

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

fn next_id() -> u64 {
    NEXT_ID.fetch_add(1, Ordering::SeqCst)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    User,
    System,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: u64,
    pub author: String,
    pub body: String,
    pub kind: MessageKind,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

impl ChatMessage {
    pub fn new(author: impl Into<String>, body: impl Into<String>, kind: MessageKind) -> Self {
        Self {
            id: next_id(),
            author: author.into(),
            body: body.into(),
            kind,
            timestamp: OffsetDateTime::now_utc(),
        }
    }

    pub fn user(author: impl Into<String>, body: impl Into<String>) -> Self {
        Self::new(author, body, MessageKind::User)
    }

    pub fn announcement(body: impl Into<String>, is_error: bool) -> Self {
        let kind = if is_error { MessageKind::Error } else { MessageKind::System };
        Self::new(SYSTEM, body, kind)
    }
}
