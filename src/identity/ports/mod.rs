//! Port contracts for the identity directory.
//!
//! Ports define infrastructure-agnostic interfaces used by identity services.

pub mod repository;

pub use repository::{UserRepository, UserRepositoryError, UserRepositoryResult};
