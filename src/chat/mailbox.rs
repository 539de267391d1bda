use std::time::Duration;

use tokio::sync::{Mutex, mpsc};

use crate::error::{ChatError, ChatResult};

use super::ChatMessage;

pub const MAILBOX_CAPACITY: usize = 20;

/// Bounded queue of messages waiting for the owner's next poll.
///
/// Any number of broadcasters may deliver at once. Delivery never waits: when the
/// queue is full the incoming message is dropped (drop newest) and the caller gets
/// [`ChatError::MailboxOverflow`]. Only one poll can hold the receiving end at a time,
/// so a message is handed out exactly once.
#[derive(Debug)]
pub struct Mailbox {
    tx: mpsc::Sender<ChatMessage>,
    rx: Mutex<mpsc::Receiver<ChatMessage>>,
}

impl Mailbox {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel(MAILBOX_CAPACITY);
        Self { tx, rx: Mutex::new(rx) }
    }

    pub fn deliver(&self, owner: &str, msg: ChatMessage) -> ChatResult<()> {
        self.tx
            .try_send(msg)
            .map_err(|_| ChatError::MailboxOverflow(owner.to_owned()))
    }

    /// Waits up to `timeout` for the next message. Cancel-safe.
    pub async fn recv_timeout(&self, timeout: Duration) -> Option<ChatMessage> {
        tokio::time::timeout(timeout, async {
            let mut rx = self.rx.lock().await;
            rx.recv().await
        })
        .await
        .ok()
        .flatten()
    }
}

impl Default for Mailbox {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
pub struct User {
    pub username: String,
    pub mailbox: Mailbox,
}

impl User {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            mailbox: Mailbox::new(),
        }
    }

    pub fn deliver(&self, msg: ChatMessage) -> ChatResult<()> {
        self.mailbox.deliver(&self.username, msg)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[tokio::test]
    async fn overflow_drops_newest() {
        let user = User::new("alice");
        let sent: Vec<u64> = (0..MAILBOX_CAPACITY)
            .map(|i| {
                let msg = ChatMessage::user("bob", format!("{i}"));
                let id = msg.id;
                user.deliver(msg).unwrap();
                id
            })
            .collect();

        let err = user.deliver(ChatMessage::user("bob", "one too many")).unwrap_err();
        assert_eq!(err, ChatError::MailboxOverflow("alice".to_owned()));

        for id in sent {
            let msg = user.mailbox.recv_timeout(Duration::from_millis(10)).await.unwrap();
            assert_eq!(msg.id, id);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn empty_mailbox_times_out() {
        let mailbox = Mailbox::new();
        let started = tokio::time::Instant::now();
        assert!(mailbox.recv_timeout(Duration::from_secs(120)).await.is_none());
        let waited = started.elapsed();
        assert!(waited >= Duration::from_secs(120) && waited < Duration::from_secs(121));
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_receivers_never_share_a_message() {
        let user = Arc::new(User::new("alice"));
        let first = tokio::spawn({
            let user = user.clone();
            async move { user.mailbox.recv_timeout(Duration::from_secs(5)).await }
        });
        let second = tokio::spawn({
            let user = user.clone();
            async move { user.mailbox.recv_timeout(Duration::from_secs(5)).await }
        });
        tokio::task::yield_now().await;
        user.deliver(ChatMessage::user("bob", "only once")).unwrap();

        let got: Vec<_> = [first.await.unwrap(), second.await.unwrap()]
            .into_iter()
            .flatten()
            .collect();
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].body, "only once");
    }
}
