//! Persistence gateway shared by the identity and task contexts.
//!
//! Two storage engines back the repository ports:
//!
//! - [`postgres`]: the production engine, a Diesel r2d2 pool whose blocking
//!   calls are moved onto the Tokio blocking pool.
//! - [`memory`]: an in-process relational store with auto-increment
//!   identifiers, foreign-key checks and cascade deletes, used by tests and
//!   by `--in-memory` runs.

pub mod memory;
pub mod postgres;
pub(crate) mod schema;

pub use memory::InMemoryDatabase;
pub use postgres::{PersistenceError, PgPool, apply_schema, connect};

/// Port errors that can carry an opaque storage failure.
///
/// Lets the shared blocking helper surface pool and join failures through
/// each context's own repository error type.
pub trait StorageFailure: Sized {
    /// Wraps a storage-layer error.
    fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self;
}
