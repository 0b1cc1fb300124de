//! Shared application state handed to every handler.

use crate::identity::{
    adapters::memory::InMemoryUserRepository, ports::UserRepository,
    services::IdentityDirectoryService,
};
use crate::persistence::InMemoryDatabase;
use crate::realtime::BroadcastHub;
use crate::session::{
    adapters::memory::InMemorySessionStore, ports::SessionStore, services::SessionGate,
};
use crate::task::{
    adapters::memory::InMemoryTaskRepository, ports::TaskRepository, services::TaskLedgerService,
};
use chrono::Duration;
use mockable::{Clock, DefaultClock};
use std::sync::Arc;

/// Identity directory over a type-erased repository.
pub type Directory = IdentityDirectoryService<dyn UserRepository, DefaultClock>;

/// Task ledger over type-erased repositories.
pub type Ledger = TaskLedgerService<dyn TaskRepository, dyn UserRepository, DefaultClock>;

/// Session gate over a type-erased store and directory.
pub type Gate = SessionGate<dyn SessionStore, dyn UserRepository, DefaultClock>;

/// Storage handles the application is assembled from.
#[derive(Clone)]
pub struct Repositories {
    /// User storage.
    pub users: Arc<dyn UserRepository>,
    /// Task storage.
    pub tasks: Arc<dyn TaskRepository>,
    /// Session storage.
    pub sessions: Arc<dyn SessionStore>,
}

impl Repositories {
    /// Builds repositories over one fresh in-memory database.
    #[must_use]
    pub fn in_memory() -> Self {
        let database = InMemoryDatabase::new();
        Self {
            users: Arc::new(InMemoryUserRepository::with_database(database.clone())),
            tasks: Arc::new(InMemoryTaskRepository::with_database(database)),
            sessions: Arc::new(InMemorySessionStore::new()),
        }
    }
}

/// Services and the broadcast hub shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    /// User management.
    pub directory: Directory,
    /// Task management.
    pub ledger: Ledger,
    /// Authentication and authorization.
    pub gate: Gate,
    /// Realtime fan-out.
    pub hub: BroadcastHub,
    /// Wall clock shared by the services.
    pub clock: Arc<DefaultClock>,
}

impl AppState {
    /// Assembles the services over `repositories`.
    #[must_use]
    pub fn new(repositories: Repositories, session_ttl: Duration, realtime_buffer: usize) -> Self {
        let clock = Arc::new(DefaultClock);
        let hub_clock: Arc<dyn Clock + Send + Sync> = clock.clone();
        let Repositories {
            users,
            tasks,
            sessions,
        } = repositories;
        Self {
            directory: IdentityDirectoryService::new(Arc::clone(&users), Arc::clone(&clock)),
            ledger: TaskLedgerService::new(tasks, Arc::clone(&users), Arc::clone(&clock)),
            gate: SessionGate::new(sessions, users, Arc::clone(&clock), session_ttl),
            hub: BroadcastHub::new(realtime_buffer, hub_clock),
            clock,
        }
    }
}
