//! In-process session store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::session::{
    domain::{Session, SessionId},
    ports::{SessionStore, SessionStoreError, SessionStoreResult},
};

/// Thread-safe in-memory session store.
///
/// Sessions do not survive a restart.
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionStore {
    sessions: Arc<RwLock<HashMap<SessionId, Session>>>,
}

impl InMemorySessionStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned(err: impl std::fmt::Display) -> SessionStoreError {
    SessionStoreError::storage(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn insert(&self, session: Session) -> SessionStoreResult<()> {
        let mut sessions = self.sessions.write().map_err(poisoned)?;
        sessions.insert(session.id(), session);
        Ok(())
    }

    async fn find(&self, id: SessionId) -> SessionStoreResult<Option<Session>> {
        let sessions = self.sessions.read().map_err(poisoned)?;
        Ok(sessions.get(&id).cloned())
    }

    async fn remove(&self, id: SessionId) -> SessionStoreResult<bool> {
        let mut sessions = self.sessions.write().map_err(poisoned)?;
        Ok(sessions.remove(&id).is_some())
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> SessionStoreResult<usize> {
        let mut sessions = self.sessions.write().map_err(poisoned)?;
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired(now));
        Ok(before - sessions.len())
    }
}
