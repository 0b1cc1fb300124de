//! `PostgreSQL` connection pool, schema bootstrap, and blocking bridge.

use super::StorageFailure;
use diesel::connection::SimpleConnection;
use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool, PoolError};
use thiserror::Error;
use tracing::info;

/// `PostgreSQL` connection pool type shared by all adapters.
pub type PgPool = Pool<ConnectionManager<PgConnection>>;

/// Idempotent schema for users, tasks, and progress updates.
const SCHEMA_SQL: &str =
    include_str!("../../migrations/2026-01-05-000000_create_taskboard_tables/up.sql");

/// Errors raised while preparing the `PostgreSQL` backend.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// The connection pool could not be built.
    #[error("failed to build connection pool: {0}")]
    Pool(#[from] PoolError),

    /// A pooled connection could not be checked out.
    #[error("failed to check out connection: {0}")]
    Checkout(#[source] PoolError),

    /// Applying the schema failed.
    #[error("failed to apply schema: {0}")]
    Schema(#[from] diesel::result::Error),

    /// The blocking task panicked or was cancelled.
    #[error("blocking task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Builds a connection pool for `database_url` holding at most `max_size`
/// connections.
///
/// # Errors
///
/// Returns [`PersistenceError::Pool`] when the pool cannot establish its
/// initial connections.
pub fn connect(database_url: &str, max_size: u32) -> Result<PgPool, PersistenceError> {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    let pool = Pool::builder().max_size(max_size).build(manager)?;
    Ok(pool)
}

/// Creates tables and indexes when they do not exist yet.
///
/// # Errors
///
/// Returns [`PersistenceError`] when no connection is available or the
/// schema statements fail.
pub async fn apply_schema(pool: &PgPool) -> Result<(), PersistenceError> {
    let shared = pool.clone();
    tokio::task::spawn_blocking(move || {
        let mut connection = shared.get().map_err(PersistenceError::Checkout)?;
        connection.batch_execute(SCHEMA_SQL)?;
        Ok::<_, PersistenceError>(())
    })
    .await??;
    info!("database schema ready");
    Ok(())
}

/// Runs `f` with a pooled connection on the blocking thread pool.
///
/// Pool checkout and join failures are reported through the caller's port
/// error type.
pub(crate) async fn run_blocking<F, T, E>(pool: &PgPool, f: F) -> Result<T, E>
where
    F: FnOnce(&mut PgConnection) -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: StorageFailure + Send + 'static,
{
    let shared = pool.clone();
    tokio::task::spawn_blocking(move || {
        let mut connection = shared.get().map_err(E::persistence)?;
        f(&mut connection)
    })
    .await
    .map_err(E::persistence)?
}
