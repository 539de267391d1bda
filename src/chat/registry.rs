use std::sync::Arc;

use crate::error::{ChatError, ChatResult};

use super::User;

/// Connected users in the order they joined. Not synchronized on its own; the
/// [`Room`](super::Room) keeps it behind its lock.
#[derive(Debug, Default)]
pub struct MembershipRegistry {
    users: Vec<Arc<User>>,
}

impl MembershipRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, username: &str) -> ChatResult<Arc<User>> {
        if self.get(username).is_some() {
            return Err(ChatError::DuplicateUsername(username.to_owned()));
        }
        let user = Arc::new(User::new(username));
        self.users.push(user.clone());
        Ok(user)
    }

    pub fn remove(&mut self, username: &str) -> Option<Arc<User>> {
        let index = self.users.iter().position(|u| u.username == username)?;
        Some(self.users.remove(index))
    }

    pub fn get(&self, username: &str) -> Option<Arc<User>> {
        self.users.iter().find(|u| u.username == username).cloned()
    }

    pub fn all(&self) -> Vec<Arc<User>> {
        self.users.clone()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}
