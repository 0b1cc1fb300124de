//! Server assembly and lifecycle.

use crate::config::{ConfigError, ServerConfig, StorageMode};
use crate::http::{self, AppState, Repositories};
use crate::identity::adapters::postgres::PostgresUserRepository;
use crate::identity::services::IdentityError;
use crate::persistence::{self, PersistenceError};
use crate::session::adapters::memory::InMemorySessionStore;
use crate::task::adapters::postgres::PostgresTaskRepository;
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::info;

/// Failures that stop the server from starting or serving.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The configuration is unusable.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The database could not be prepared.
    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    /// Seeding the default administrator failed.
    #[error("failed to seed default administrator: {0}")]
    Seed(#[from] IdentityError),

    /// Binding or serving the listener failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Opens the configured storage backend.
///
/// # Errors
///
/// Returns [`ServerError`] when no backend is configured or `PostgreSQL`
/// cannot be reached or migrated.
pub async fn open_repositories(config: &ServerConfig) -> Result<Repositories, ServerError> {
    match config.storage()? {
        StorageMode::InMemory => {
            info!("using in-memory storage");
            Ok(Repositories::in_memory())
        }
        StorageMode::Postgres(url) => {
            let pool = persistence::connect(url, config.pool_size)?;
            persistence::apply_schema(&pool).await?;
            info!(pool_size = config.pool_size, "connected to PostgreSQL");
            Ok(Repositories {
                users: Arc::new(PostgresUserRepository::new(pool.clone())),
                tasks: Arc::new(PostgresTaskRepository::new(pool)),
                sessions: Arc::new(InMemorySessionStore::new()),
            })
        }
    }
}

/// Builds the application state and seeds the default administrator.
///
/// # Errors
///
/// Returns [`ServerError`] when storage or seeding fails.
pub async fn build_state(config: &ServerConfig) -> Result<AppState, ServerError> {
    config.validate()?;
    let repositories = open_repositories(config).await?;
    let state = AppState::new(repositories, config.session_ttl(), config.realtime_buffer);
    state
        .directory
        .ensure_default_admin(&config.default_admin)
        .await?;
    Ok(state)
}

/// Serves the task board until Ctrl-C or SIGTERM.
///
/// # Errors
///
/// Returns [`ServerError`] when start-up fails or the listener errors.
pub async fn run(config: ServerConfig) -> Result<(), ServerError> {
    let state = build_state(&config).await?;
    let listener = TcpListener::bind(config.bind).await?;
    info!(address = %listener.local_addr()?, "task board listening");
    axum::serve(listener, http::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("task board stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %err, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
    info!("shutdown signal received");
}
