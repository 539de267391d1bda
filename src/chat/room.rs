use std::{
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};

use crate::{
    config::DEFAULT_POLL_TIMEOUT,
    error::{ChatError, ChatResult},
    render::Renderer,
};

use super::{ChatMessage, MembershipRegistry, MessageHistory, SYSTEM, User};

/// What a long-poll ends with.
#[derive(Debug, Clone, PartialEq)]
pub enum Poll {
    Message(ChatMessage),
    Timeout,
}

/// A fresh member and the history it starts from.
#[derive(Debug)]
pub struct Joined {
    pub user: Arc<User>,
    /// Ends with the user's own "entered the room" notice. Everything newer is
    /// waiting in the user's mailbox instead.
    pub history: Vec<ChatMessage>,
}

#[derive(Debug, Default)]
struct RoomState {
    members: MembershipRegistry,
    history: MessageHistory,
}

impl RoomState {
    /// Appends to history and drops a copy in every mailbox. Runs under the room lock,
    /// so every member sees messages in history order. Deliveries never wait.
    fn publish(&mut self, msg: &ChatMessage) {
        self.history.push(msg.clone());
        for user in self.members.all() {
            if let Err(e) = user.deliver(msg.clone()) {
                tracing::warn!(id = msg.id, error = %e, "dropping message");
            }
        }
    }
}

/// The one chat room. Cloning gives another handle to the same room.
#[derive(Debug, Clone)]
pub struct Room {
    state: Arc<Mutex<RoomState>>,
    renderer: Arc<Renderer>,
    poll_timeout: Duration,
}

impl Default for Room {
    fn default() -> Self {
        Self::new(Renderer::plain(), DEFAULT_POLL_TIMEOUT)
    }
}

impl Room {
    pub fn new(renderer: Renderer, poll_timeout: Duration) -> Self {
        Self {
            state: Arc::new(Mutex::new(RoomState::default())),
            renderer: Arc::new(renderer),
            poll_timeout,
        }
    }

    fn lock(&self) -> MutexGuard<'_, RoomState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn poll_timeout(&self) -> Duration {
        self.poll_timeout
    }

    /// Registers `username` and announces it.
    ///
    /// Does not return until the new user's own mailbox has handed back the
    /// "entered the room" notice, so a poll right after joining picks up whatever
    /// comes next. Anything delivered ahead of the notice is consumed along with it;
    /// it is already part of [`history`](Self::history). Delivery never blocks, so the
    /// wait only gives up (after the poll timeout) if the notice was dropped.
    pub async fn join(&self, username: &str) -> ChatResult<Joined> {
        validate_username(username)?;
        let user = self.lock().members.add(username)?;
        tracing::info!(username, "user joined");

        let notice = self
            .announce(format!("{username} has entered the room."), false)
            .await;

        let deadline = tokio::time::Instant::now() + self.poll_timeout;
        loop {
            let left = deadline.saturating_duration_since(tokio::time::Instant::now());
            match user.mailbox.recv_timeout(left).await {
                Some(msg) if msg.id == notice.id => break,
                Some(_) => continue,
                None => {
                    tracing::warn!(username, "join notice never reached its own mailbox");
                    break;
                }
            }
        }

        let history = self.lock().history.through(notice.id);
        Ok(Joined { user, history })
    }

    pub async fn leave(&self, username: &str) -> ChatResult<()> {
        if self.lock().members.remove(username).is_none() {
            return Err(ChatError::UnknownUser(username.to_owned()));
        }
        tracing::info!(username, "user left");
        self.announce(format!("{username} has left the room."), false)
            .await;
        Ok(())
    }

    pub fn user(&self, username: &str) -> Option<Arc<User>> {
        self.lock().members.get(username)
    }

    pub fn member(&self, username: &str) -> ChatResult<Arc<User>> {
        self.user(username)
            .ok_or_else(|| ChatError::UnknownUser(username.to_owned()))
    }

    pub fn roster(&self) -> Vec<String> {
        self.lock()
            .members
            .all()
            .iter()
            .map(|u| u.username.clone())
            .collect()
    }

    pub fn history(&self) -> Vec<ChatMessage> {
        self.lock().history.to_vec()
    }

    /// Renders the body, stores the message and fans it out. Returns what was stored.
    pub async fn add_message(&self, mut msg: ChatMessage) -> ChatMessage {
        msg.body = self.renderer.render(&msg.body).await;
        self.lock().publish(&msg);
        msg
    }

    pub async fn post(&self, author: &str, body: &str) -> ChatResult<ChatMessage> {
        self.member(author)?;
        let msg = self.add_message(ChatMessage::user(author, body)).await;
        tracing::debug!(author, id = msg.id, "message posted");
        Ok(msg)
    }

    pub async fn announce(&self, text: impl Into<String>, is_error: bool) -> ChatMessage {
        self.add_message(ChatMessage::announcement(text, is_error))
            .await
    }

    /// Waits for the next message addressed to `username`, or for `timeout`.
    pub async fn poll(&self, username: &str, timeout: Duration) -> ChatResult<Poll> {
        let user = self.member(username)?;
        Ok(match user.mailbox.recv_timeout(timeout).await {
            Some(msg) => Poll::Message(msg),
            None => Poll::Timeout,
        })
    }
}

fn validate_username(username: &str) -> ChatResult<()> {
    if username.is_empty() || username.chars().any(char::is_whitespace) || username == SYSTEM {
        return Err(ChatError::InvalidUsername(username.to_owned()));
    }
    Ok(())
}
