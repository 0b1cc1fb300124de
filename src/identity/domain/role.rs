//! User roles.

use super::IdentityDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Role carried by every user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// May manage users and delete tasks.
    #[serde(rename = "admin")]
    Admin,
    /// Regular task participant.
    #[serde(rename = "trabajador")]
    Worker,
}

impl Role {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Worker => "trabajador",
        }
    }

    /// Returns `true` for the administrator role.
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Role {
    type Error = IdentityDomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "admin" => Ok(Self::Admin),
            "trabajador" => Ok(Self::Worker),
            "" => Err(IdentityDomainError::MissingRole),
            _ => Err(IdentityDomainError::InvalidRole(value.to_owned())),
        }
    }
}
