//! Command-line and environment configuration.

use clap::Parser;
use std::net::SocketAddr;
use thiserror::Error;

/// Runtime settings of the task board server.
///
/// Every flag falls back to an environment variable.
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(name = "taskboard", version, about = "Multi-user task board server")]
pub struct ServerConfig {
    /// Address the HTTP listener binds to.
    #[arg(long, env = "TASKBOARD_BIND", default_value = "0.0.0.0:3000")]
    pub bind: SocketAddr,

    /// `PostgreSQL` connection URL.
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Keep all data in process memory instead of `PostgreSQL`.
    #[arg(long, env = "TASKBOARD_IN_MEMORY")]
    pub in_memory: bool,

    /// Maximum number of pooled database connections.
    #[arg(long, env = "TASKBOARD_POOL_SIZE", default_value_t = 8)]
    pub pool_size: u32,

    /// Hours before an idle session expires.
    #[arg(long, env = "TASKBOARD_SESSION_TTL_HOURS", default_value_t = 24)]
    pub session_ttl_hours: u32,

    /// Name of the administrator seeded into an empty user table.
    #[arg(long, env = "TASKBOARD_DEFAULT_ADMIN", default_value = "admin")]
    pub default_admin: String,

    /// Log filter used when `RUST_LOG` is unset.
    #[arg(long, env = "TASKBOARD_LOG", default_value = "taskboard=info")]
    pub log_filter: String,

    /// Events buffered per realtime subscriber before it starts lagging.
    #[arg(long, env = "TASKBOARD_REALTIME_BUFFER", default_value_t = 256)]
    pub realtime_buffer: usize,
}

/// Rejected configuration values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Neither a database URL nor in-memory storage was requested.
    #[error("a database URL is required unless --in-memory is set")]
    MissingDatabaseUrl,

    /// The pool cannot hold any connection.
    #[error("pool size must be positive")]
    EmptyPool,

    /// Sessions would expire immediately.
    #[error("session TTL must be positive")]
    ZeroSessionTtl,

    /// The realtime channel cannot buffer any event.
    #[error("realtime buffer must be positive")]
    EmptyRealtimeBuffer,

    /// The seeded administrator would have no name.
    #[error("default administrator name must not be blank")]
    BlankAdminName,
}

/// Where the server keeps its data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageMode<'a> {
    /// `PostgreSQL` at the given URL.
    Postgres(&'a str),
    /// Process memory.
    InMemory,
}

impl ServerConfig {
    /// Checks cross-field constraints clap cannot express.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pool_size == 0 {
            return Err(ConfigError::EmptyPool);
        }
        if self.session_ttl_hours == 0 {
            return Err(ConfigError::ZeroSessionTtl);
        }
        if self.realtime_buffer == 0 {
            return Err(ConfigError::EmptyRealtimeBuffer);
        }
        if self.default_admin.trim().is_empty() {
            return Err(ConfigError::BlankAdminName);
        }
        self.storage().map(|_| ())
    }

    /// Resolves the storage backend.
    ///
    /// In-memory storage wins over a configured URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingDatabaseUrl`] when no backend is usable.
    pub fn storage(&self) -> Result<StorageMode<'_>, ConfigError> {
        if self.in_memory {
            return Ok(StorageMode::InMemory);
        }
        match self.database_url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => Ok(StorageMode::Postgres(url)),
            _ => Err(ConfigError::MissingDatabaseUrl),
        }
    }

    /// Returns the session lifetime.
    #[must_use]
    pub fn session_ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(i64::from(self.session_ttl_hours))
    }
}
