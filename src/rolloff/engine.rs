use std::{
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};

use rand::Rng;
use serde::Serialize;
use uuid::Uuid;

use crate::{
    chat::{ChatMessage, Room, User},
    error::{ChatError, ChatResult},
};

pub fn roll_score() -> u8 {
    rand::rng().random_range(1..=100)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RollOffStatus {
    Open,
    Closed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RollOffEntry {
    pub username: String,
    pub score: u8,
}

impl RollOffEntry {
    fn roll(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            score: roll_score(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RollOff {
    pub id: String,
    pub entries: Vec<RollOffEntry>,
    pub status: RollOffStatus,
    pub winner: Option<RollOffEntry>,
}

impl RollOff {
    fn open(first: RollOffEntry) -> Self {
        Self {
            id: Uuid::now_v7().simple().to_string(),
            entries: vec![first],
            status: RollOffStatus::Open,
            winner: None,
        }
    }

    /// Highest score; on a tie the earliest entry keeps the lead.
    pub fn leader(&self) -> Option<&RollOffEntry> {
        let mut entries = self.entries.iter();
        let mut best = entries.next()?;
        for entry in entries {
            if entry.score > best.score {
                best = entry;
            }
        }
        Some(best)
    }

    /// Returns the winner the first time, `None` if it was already closed.
    fn close(&mut self) -> Option<RollOffEntry> {
        if self.status == RollOffStatus::Closed {
            return None;
        }
        self.status = RollOffStatus::Closed;
        self.winner = self.leader().cloned();
        self.winner.clone()
    }
}

/// Every roll-off ever started, open or closed.
///
/// Closed contests are kept for the life of the process so their results stay
/// queryable; nothing prunes the list.
#[derive(Debug, Clone)]
pub struct RollOffs {
    room: Room,
    contests: Arc<Mutex<Vec<RollOff>>>,
    delay: Duration,
}

impl RollOffs {
    pub fn new(room: Room, delay: Duration) -> Self {
        Self {
            room,
            contests: Arc::new(Mutex::new(Vec::new())),
            delay,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<RollOff>> {
        self.contests.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Starts a roll-off with `user` already rolled in, and schedules its closing.
    pub async fn create(&self, user: &User) -> RollOff {
        let contest = RollOff::open(RollOffEntry::roll(user));
        self.lock().push(contest.clone());
        tracing::info!(id = %contest.id, username = %user.username, "roll-off started");

        let closer = self.clone();
        let id = contest.id.clone();
        tokio::spawn(async move {
            tokio::time::sleep(closer.delay).await;
            closer.close(&id).await;
        });

        let first = &contest.entries[0];
        self.room
            .announce(
                format!(
                    "{} has started a roll-off ({}) and rolled {}. Join it within {} seconds!",
                    first.username,
                    contest.id,
                    first.score,
                    self.delay.as_secs()
                ),
                false,
            )
            .await;
        contest
    }

    /// Rolls `user` into an open roll-off. Closed ones turn late entries away.
    pub async fn enter(&self, id: &str, user: &User) -> ChatResult<RollOffEntry> {
        let entry = {
            let mut contests = self.lock();
            let contest = contests
                .iter_mut()
                .find(|c| c.id == id)
                .ok_or_else(|| ChatError::ContestNotFound(id.to_owned()))?;
            if contest.status == RollOffStatus::Closed {
                return Err(ChatError::ContestClosed(id.to_owned()));
            }
            let entry = RollOffEntry::roll(user);
            contest.entries.push(entry.clone());
            entry
        };

        self.room
            .announce(
                format!("{} joined roll-off {id} and rolled {}.", entry.username, entry.score),
                false,
            )
            .await;
        Ok(entry)
    }

    pub fn get(&self, id: &str) -> Option<RollOff> {
        self.lock().iter().find(|c| c.id == id).cloned()
    }

    async fn close(&self, id: &str) {
        let winner = self
            .lock()
            .iter_mut()
            .find(|c| c.id == id)
            .and_then(RollOff::close);
        let Some(winner) = winner else {
            return;
        };

        tracing::info!(id, winner = %winner.username, score = winner.score, "roll-off closed");
        self.room
            .announce(
                format!(
                    "{} won roll-off {id} with a {}!",
                    winner.username, winner.score
                ),
                false,
            )
            .await;
    }
}

/// A single roll outside of any contest, announced to the room.
pub async fn announce_roll(room: &Room, user: &User) -> ChatMessage {
    let score = roll_score();
    room.announce(format!("{} rolled {score}", user.username), false)
        .await
}
