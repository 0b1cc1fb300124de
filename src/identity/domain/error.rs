//! Error types for identity domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing identity domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdentityDomainError {
    /// The user name is missing or empty after trimming.
    #[error("name is required")]
    MissingName,

    /// The user name exceeds the 100-character storage limit.
    #[error("name exceeds 100 character limit: {0}")]
    NameTooLong(String),

    /// No role was supplied.
    #[error("role is required")]
    MissingRole,

    /// The role value is not one of the supported roles.
    #[error("role must be either admin or trabajador, got '{0}'")]
    InvalidRole(String),
}
