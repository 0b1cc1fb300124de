//! User aggregate.

use super::{Role, UserId, UserName};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::Serialize;

/// A registered user as stored in the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    id: UserId,
    name: UserName,
    role: Role,
    created_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedUserData {
    /// Persisted user identifier.
    pub id: UserId,
    /// Persisted unique name.
    pub name: UserName,
    /// Persisted role.
    pub role: Role,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Reconstructs a user from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedUserData) -> Self {
        Self {
            id: data.id,
            name: data.name,
            role: data.role,
            created_at: data.created_at,
        }
    }

    /// Returns the user identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Returns the unique user name.
    #[must_use]
    pub const fn name(&self) -> &UserName {
        &self.name
    }

    /// Returns the user role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns `true` when the user holds the administrator role.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// A validated user awaiting an identifier from storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    name: UserName,
    role: Role,
    created_at: DateTime<Utc>,
}

impl NewUser {
    /// Creates a new user record stamped with the current clock time.
    #[must_use]
    pub fn new(name: UserName, role: Role, clock: &impl Clock) -> Self {
        Self {
            name,
            role,
            created_at: clock.utc(),
        }
    }

    /// Returns the requested name.
    #[must_use]
    pub const fn name(&self) -> &UserName {
        &self.name
    }

    /// Returns the requested role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Completes the record with the identifier assigned by storage.
    #[must_use]
    pub fn into_user(self, id: UserId) -> User {
        User {
            id,
            name: self.name,
            role: self.role,
            created_at: self.created_at,
        }
    }
}
