//! Login, logout, and per-request authentication and authorization.

use crate::identity::{
    domain::{User, UserName},
    ports::{UserRepository, UserRepositoryError},
};
use crate::session::{
    domain::{AuthenticatedIdentity, Session, SessionId},
    ports::{SessionStore, SessionStoreError},
};
use chrono::Duration;
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Errors raised by the session gate.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Login was attempted without a name.
    #[error("Name is required")]
    MissingName,

    /// No user holds the supplied name.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// The request carries no live session.
    #[error("Authentication required")]
    Unauthorized,

    /// The caller lacks the administrator role.
    #[error("Admin access required")]
    Forbidden,

    /// Session storage failed.
    #[error(transparent)]
    Store(#[from] SessionStoreError),

    /// Reading the user directory failed.
    #[error(transparent)]
    Lookup(#[from] UserRepositoryError),
}

/// Result type for session gate operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Session-backed authentication and role gate.
pub struct SessionGate<S, U, C>
where
    S: SessionStore + ?Sized,
    U: UserRepository + ?Sized,
    C: Clock + Send + Sync,
{
    sessions: Arc<S>,
    users: Arc<U>,
    clock: Arc<C>,
    ttl: Duration,
}

impl<S, U, C> Clone for SessionGate<S, U, C>
where
    S: SessionStore + ?Sized,
    U: UserRepository + ?Sized,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            sessions: Arc::clone(&self.sessions),
            users: Arc::clone(&self.users),
            clock: Arc::clone(&self.clock),
            ttl: self.ttl,
        }
    }
}

impl<S, U, C> SessionGate<S, U, C>
where
    S: SessionStore + ?Sized,
    U: UserRepository + ?Sized,
    C: Clock + Send + Sync,
{
    /// Creates a gate whose sessions last `ttl`.
    #[must_use]
    pub const fn new(sessions: Arc<S>, users: Arc<U>, clock: Arc<C>, ttl: Duration) -> Self {
        Self {
            sessions,
            users,
            clock,
            ttl,
        }
    }

    /// Returns how long new sessions last.
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Opens a session for the user named `name`.
    ///
    /// The caller's `previous` session, if any, is replaced and every expired
    /// session is swept from the store.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::MissingName`] for a missing or blank name and
    /// [`SessionError::InvalidCredentials`] when no such user exists.
    pub async fn login(
        &self,
        name: Option<&str>,
        previous: Option<SessionId>,
    ) -> SessionResult<(Session, User)> {
        let Some(raw) = name.map(str::trim).filter(|value| !value.is_empty()) else {
            return Err(SessionError::MissingName);
        };
        let user_name = UserName::new(raw).map_err(|_| SessionError::InvalidCredentials)?;
        let user = self
            .users
            .find_by_name(&user_name)
            .await?
            .ok_or(SessionError::InvalidCredentials)?;

        if let Some(replaced) = previous {
            self.sessions.remove(replaced).await?;
        }
        let now = self.clock.utc();
        let purged = self.sessions.purge_expired(now).await?;
        if purged > 0 {
            debug!(purged, "expired sessions purged");
        }
        let session = Session::open(&user, now, self.ttl);
        self.sessions.insert(session.clone()).await?;
        info!(user_id = %user.id(), name = %user.name(), "user logged in");
        Ok((session, user))
    }

    /// Destroys the session, if any. Returns `true` when one was removed.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Store`] when session storage fails.
    pub async fn logout(&self, session_id: Option<SessionId>) -> SessionResult<bool> {
        let Some(id) = session_id else {
            return Ok(false);
        };
        let removed = self.sessions.remove(id).await?;
        if removed {
            info!("user logged out");
        }
        Ok(removed)
    }

    /// Returns the identity cached in a live session, if any.
    ///
    /// Expired sessions are purged on access.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Store`] when session storage fails.
    pub async fn status(
        &self,
        session_id: Option<SessionId>,
    ) -> SessionResult<Option<AuthenticatedIdentity>> {
        let Some(id) = session_id else {
            return Ok(None);
        };
        let Some(session) = self.sessions.find(id).await? else {
            return Ok(None);
        };
        if session.is_expired(self.clock.utc()) {
            self.sessions.remove(id).await?;
            debug!("expired session purged");
            return Ok(None);
        }
        Ok(Some(session.identity().clone()))
    }

    /// Requires a live session.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Unauthorized`] when the session is absent,
    /// unknown, or expired.
    pub async fn authenticate(
        &self,
        session_id: Option<SessionId>,
    ) -> SessionResult<AuthenticatedIdentity> {
        self.status(session_id)
            .await?
            .ok_or(SessionError::Unauthorized)
    }

    /// Requires the caller to currently hold the administrator role.
    ///
    /// The role is read from the directory on every call, never from the
    /// session.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Forbidden`] unless the stored user is an
    /// administrator, and [`SessionError::Lookup`] when the lookup fails.
    pub async fn authorize_admin(&self, identity: &AuthenticatedIdentity) -> SessionResult<()> {
        let user = self.users.find_by_id(identity.id).await?;
        if user.is_some_and(|stored| stored.is_admin()) {
            Ok(())
        } else {
            Err(SessionError::Forbidden)
        }
    }

    /// Re-reads the caller's user record.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Unauthorized`] when the user no longer exists.
    pub async fn current_user(&self, identity: &AuthenticatedIdentity) -> SessionResult<User> {
        self.users
            .find_by_id(identity.id)
            .await?
            .ok_or(SessionError::Unauthorized)
    }
}
