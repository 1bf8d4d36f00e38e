//! Session store backed by DashMap.
//!
//! Holds at most one [`Session`] per user. Values are cloned out on read and
//! no map guard is ever held across an `.await`.
//!
//! Each user also gets a "lane": an async mutex that the conversation service
//! holds while it handles one event. Events from the same user are therefore
//! processed one at a time, while different users proceed in parallel.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;

use pagesmith_types::session::{Session, UserId};

/// Concurrent map of user id to session.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: DashMap<UserId, Session>,
    lanes: DashMap<UserId, Arc<Mutex<()>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A copy of the user's session, if any.
    pub fn get(&self, user: UserId) -> Option<Session> {
        self.sessions.get(&user).map(|entry| entry.value().clone())
    }

    /// Insert or replace the user's session.
    pub fn put(&self, session: Session) {
        self.sessions.insert(session.user_id, session);
    }

    /// Remove and return the user's session.
    pub fn remove(&self, user: UserId) -> Option<Session> {
        self.sessions.remove(&user).map(|(_, session)| session)
    }

    /// The per-user lock serializing event handling for `user`.
    pub fn lane(&self, user: UserId) -> Arc<Mutex<()>> {
        self.lanes.entry(user).or_default().value().clone()
    }

    /// Drop the user's lane once they have no session and nobody else holds
    /// or is waiting on it. Returns whether it was removed.
    pub fn release_lane(&self, user: UserId) -> bool {
        if self.sessions.contains_key(&user) {
            return false;
        }
        self.lanes
            .remove_if(&user, |_, lane| Arc::strong_count(lane) == 1)
            .is_some()
    }

    /// Number of users with a lane.
    pub fn lane_count(&self) -> usize {
        self.lanes.len()
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
