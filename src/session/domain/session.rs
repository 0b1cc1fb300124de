//! Session records and the identity they carry.

use crate::identity::domain::{Role, User, UserId, UserName};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Opaque session identifier carried in the session cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Generates a fresh random identifier.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.as_simple())
    }
}

impl FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(value).map(Self)
    }
}

/// The principal behind an authenticated request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthenticatedIdentity {
    /// User identifier.
    pub id: UserId,
    /// User name at login time.
    pub name: UserName,
    /// Role at login time; not authoritative for authorization.
    pub role: Role,
}

impl From<&User> for AuthenticatedIdentity {
    fn from(user: &User) -> Self {
        Self {
            id: user.id(),
            name: user.name().clone(),
            role: user.role(),
        }
    }
}

/// A server-side login session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    id: SessionId,
    identity: AuthenticatedIdentity,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl Session {
    /// Opens a session for `user` lasting `ttl` from `now`.
    #[must_use]
    pub fn open(user: &User, now: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            id: SessionId::random(),
            identity: AuthenticatedIdentity::from(user),
            created_at: now,
            expires_at: now + ttl,
        }
    }

    /// Returns the session identifier.
    #[must_use]
    pub const fn id(&self) -> SessionId {
        self.id
    }

    /// Returns the identity cached at login.
    #[must_use]
    pub const fn identity(&self) -> &AuthenticatedIdentity {
        &self.identity
    }

    /// Returns when the session was opened.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns when the session stops being valid.
    #[must_use]
    pub const fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Returns `true` once `now` has reached the expiry instant.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}
