//! Shared world state for task progress BDD scenarios.

use std::collections::HashMap;
use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use taskboard::identity::{
    adapters::memory::InMemoryUserRepository, domain::User, services::IdentityDirectoryService,
};
use taskboard::persistence::InMemoryDatabase;
use taskboard::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::{ProgressUpdateEntry, TaskDetail},
    services::{TaskLedgerError, TaskLedgerService},
};

/// Directory type used by the BDD world.
pub type TestDirectory = IdentityDirectoryService<InMemoryUserRepository, DefaultClock>;

/// Ledger type used by the BDD world.
pub type TestLedger =
    TaskLedgerService<InMemoryTaskRepository, InMemoryUserRepository, DefaultClock>;

/// Scenario world for task progress behaviour tests.
pub struct TaskProgressWorld {
    /// Directory used to register scenario users.
    pub directory: TestDirectory,
    /// Ledger under test.
    pub ledger: TestLedger,
    /// Registered users by name.
    pub users: HashMap<String, User>,
    /// Task the scenario works on, as last fetched.
    pub task: Option<TaskDetail>,
    /// Outcome of the most recent progress update.
    pub last_update: Option<Result<ProgressUpdateEntry, TaskLedgerError>>,
}

impl TaskProgressWorld {
    /// Creates a world over an empty shared in-memory database.
    #[must_use]
    pub fn new() -> Self {
        let database = InMemoryDatabase::new();
        let users = Arc::new(InMemoryUserRepository::with_database(database.clone()));
        let tasks = Arc::new(InMemoryTaskRepository::with_database(database));
        let clock = Arc::new(DefaultClock);

        Self {
            directory: IdentityDirectoryService::new(Arc::clone(&users), Arc::clone(&clock)),
            ledger: TaskLedgerService::new(tasks, users, clock),
            users: HashMap::new(),
            task: None,
            last_update: None,
        }
    }

    /// Returns the user created under `name`.
    pub fn user(&self, name: &str) -> Result<&User, eyre::Report> {
        self.users
            .get(name)
            .ok_or_else(|| eyre::eyre!("user {name} was not created in this scenario"))
    }

    /// Returns the task created in the background.
    pub fn task(&self) -> Result<&TaskDetail, eyre::Report> {
        self.task
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing task in scenario world"))
    }

    /// Re-reads the scenario task from the ledger.
    pub fn reload_task(&self) -> Result<TaskDetail, eyre::Report> {
        let id = self.task()?.task().id();
        run_async(self.ledger.get(id)).map_err(|err| eyre::eyre!("reload task {id}: {err}"))
    }
}

impl Default for TaskProgressWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> TaskProgressWorld {
    TaskProgressWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
