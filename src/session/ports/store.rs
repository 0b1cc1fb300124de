//! Storage port for login sessions.

use crate::session::domain::{Session, SessionId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for session store operations.
pub type SessionStoreResult<T> = Result<T, SessionStoreError>;

/// Session persistence contract.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Stores a new session.
    async fn insert(&self, session: Session) -> SessionStoreResult<()>;

    /// Finds a session by identifier, regardless of expiry.
    async fn find(&self, id: SessionId) -> SessionStoreResult<Option<Session>>;

    /// Removes a session. Returns `false` when none was stored.
    async fn remove(&self, id: SessionId) -> SessionStoreResult<bool>;

    /// Removes every session expired at `now`; returns how many were dropped.
    async fn purge_expired(&self, now: DateTime<Utc>) -> SessionStoreResult<usize>;
}

/// Errors returned by session store implementations.
#[derive(Debug, Clone, Error)]
pub enum SessionStoreError {
    /// Storage-layer failure.
    #[error("session storage error: {0}")]
    Storage(Arc<dyn std::error::Error + Send + Sync>),
}

impl SessionStoreError {
    /// Wraps a storage error.
    pub fn storage(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Storage(Arc::new(err))
    }
}
