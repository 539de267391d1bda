use super::ChatMessage;

pub const HISTORY_CAPACITY: usize = 20;

/// Ring buffer of the most recent messages.
#[derive(Debug)]
pub struct MessageHistory {
    slots: Vec<Option<ChatMessage>>,
    // slot the next message goes into, which is also the oldest once we've wrapped
    next: usize,
}

impl MessageHistory {
    pub fn new() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "history needs at least one slot");
        Self {
            slots: vec![None; capacity],
            next: 0,
        }
    }

    pub fn push(&mut self, msg: ChatMessage) {
        self.slots[self.next] = Some(msg);
        self.next = (self.next + 1) % self.slots.len();
    }

    /// Oldest first. Empty slots (before the first wrap) are skipped.
    pub fn iter(&self) -> impl Iterator<Item = &ChatMessage> {
        let (newer, older) = self.slots.split_at(self.next);
        older.iter().chain(newer).flatten()
    }

    pub fn to_vec(&self) -> Vec<ChatMessage> {
        self.iter().cloned().collect()
    }

    /// Everything up to and including message `id`. Empty once `id` has rolled out.
    pub fn through(&self, id: u64) -> Vec<ChatMessage> {
        let mut out = Vec::new();
        for msg in self.iter() {
            out.push(msg.clone());
            if msg.id == id {
                return out;
            }
        }
        Vec::new()
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots[0].is_none()
    }
}

impl Default for MessageHistory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bodies(history: &MessageHistory) -> Vec<String> {
        history.iter().map(|m| m.body.clone()).collect()
    }

    #[test]
    fn partially_filled() {
        let mut history = MessageHistory::new();
        assert!(history.is_empty());
        for i in 0..3 {
            history.push(ChatMessage::user("alice", i.to_string()));
        }
        assert_eq!(history.len(), 3);
        assert_eq!(bodies(&history), ["0", "1", "2"]);
    }

    #[test]
    fn keeps_the_most_recent_in_order() {
        let mut history = MessageHistory::new();
        for i in 0..57 {
            history.push(ChatMessage::user("alice", i.to_string()));
        }
        let expected: Vec<String> = (37..57).map(|i| i.to_string()).collect();
        assert_eq!(history.len(), HISTORY_CAPACITY);
        assert_eq!(bodies(&history), expected);
    }

    #[test]
    fn through_stops_at_the_given_message() {
        let mut history = MessageHistory::with_capacity(4);
        let msgs: Vec<ChatMessage> = (0..6).map(|i| ChatMessage::user("alice", i.to_string())).collect();
        for msg in &msgs {
            history.push(msg.clone());
        }
        let bodies: Vec<String> = history.through(msgs[3].id).into_iter().map(|m| m.body).collect();
        assert_eq!(bodies, ["2", "3"]);
        assert_eq!(history.through(msgs[5].id).len(), 4);
        assert!(history.through(msgs[0].id).is_empty(), "rolled out");
    }

    #[test]
    fn exactly_full() {
        let mut history = MessageHistory::with_capacity(4);
        for i in 0..4 {
            history.push(ChatMessage::user("alice", i.to_string()));
        }
        assert_eq!(bodies(&history), ["0", "1", "2", "3"]);
        history.push(ChatMessage::user("alice", "4"));
        assert_eq!(bodies(&history), ["1", "2", "3", "4"]);
    }
}
