//! Session management
//!
//! A session is created at login and destroyed at logout or expiry. The
//! bearer token only carries its id; the store decides whether it is alive.

use chrono::Utc;
use dashmap::DashMap;
use loan_shared::Role;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: Uuid,
    pub actor_id: Uuid,
    pub role: Role,
    pub issued_at: i64,
    pub expires_at: i64,
}

impl Session {
    pub fn new(actor_id: Uuid, role: Role, ttl_seconds: i64) -> Self {
        let now = Utc::now().timestamp();
        Self {
            id: Uuid::new_v4(),
            actor_id,
            role,
            issued_at: now,
            expires_at: now + ttl_seconds,
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.expires_at
    }
}

/// Live sessions keyed by session id
#[derive(Default)]
pub struct SessionStore {
    sessions: DashMap<Uuid, Session>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self, actor_id: Uuid, role: Role, ttl_seconds: i64) -> Session {
        let session = Session::new(actor_id, role, ttl_seconds);
        self.sessions.insert(session.id, session.clone());
        debug!("Session {} started for actor {}", session.id, actor_id);
        session
    }

    /// Returns the session if it exists and has not expired.
    /// Expired sessions are dropped on access.
    pub fn get(&self, session_id: &Uuid) -> Option<Session> {
        let session = self.sessions.get(session_id)?.value().clone();
        if session.is_expired() {
            self.sessions.remove(session_id);
            debug!("Session {} expired", session_id);
            return None;
        }
        Some(session)
    }

    pub fn end(&self, session_id: &Uuid) -> bool {
        self.sessions.remove(session_id).is_some()
    }

    /// Ends every session of an actor, e.g. after a role change or account deletion
    pub fn end_all_for(&self, actor_id: &Uuid) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|_, s| s.actor_id != *actor_id);
        before - self.sessions.len()
    }

    pub fn purge_expired(&self) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|_, s| !s.is_expired());
        before - self.sessions.len()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
