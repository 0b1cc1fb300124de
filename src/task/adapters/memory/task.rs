//! In-memory task repository backed by the shared in-memory database.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::cmp::Reverse;

use crate::identity::domain::UserId;
use crate::persistence::{InMemoryDatabase, memory::MemoryTables};
use crate::task::{
    domain::{
        NewProgressUpdate, NewTask, ProgressState, ProgressUpdate, ProgressUpdateEntry, Task,
        TaskFilter, TaskId, TaskPatch, TaskStats, TaskStatus, TaskSummary, UpdateId,
    },
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};

/// Thread-safe in-memory task repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    database: InMemoryDatabase,
}

impl InMemoryTaskRepository {
    /// Creates a repository over a fresh, empty database.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository sharing tables with other adapters.
    #[must_use]
    pub const fn with_database(database: InMemoryDatabase) -> Self {
        Self { database }
    }
}

fn summarize(tables: &MemoryTables, task: &Task) -> TaskSummary {
    TaskSummary {
        task: task.clone(),
        creator_name: task.created_by().and_then(|id| tables.user_name(id)),
        assigned_name: task.assigned_to().and_then(|id| tables.user_name(id)),
    }
}

/// Updates whose author was deleted drop out of listings.
fn to_entry(tables: &MemoryTables, update: &ProgressUpdate) -> Option<ProgressUpdateEntry> {
    let author = update.user_id().and_then(|id| tables.user_name(id))?;
    Some(update.clone().into_entry(author))
}

fn ensure_user(tables: &MemoryTables, id: UserId) -> TaskRepositoryResult<()> {
    if tables.users.contains_key(&id) {
        Ok(())
    } else {
        Err(TaskRepositoryError::UnknownUser(id))
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn list(&self, filter: &TaskFilter) -> TaskRepositoryResult<Vec<TaskSummary>> {
        let tables = self
            .database
            .read()
            .map_err(TaskRepositoryError::persistence)?;
        let mut matching: Vec<&Task> = tables
            .tasks
            .values()
            .filter(|task| filter.matches(task))
            .collect();
        matching.sort_by_key(|task| Reverse((task.created_at(), task.id())));
        Ok(matching
            .into_iter()
            .map(|task| summarize(&tables, task))
            .collect())
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<TaskSummary>> {
        let tables = self
            .database
            .read()
            .map_err(TaskRepositoryError::persistence)?;
        Ok(tables.tasks.get(&id).map(|task| summarize(&tables, task)))
    }

    async fn list_updates(&self, id: TaskId) -> TaskRepositoryResult<Vec<ProgressUpdateEntry>> {
        let tables = self
            .database
            .read()
            .map_err(TaskRepositoryError::persistence)?;
        let mut updates: Vec<&ProgressUpdate> = tables
            .updates
            .values()
            .filter(|update| update.task_id() == id)
            .collect();
        updates.sort_by_key(|update| Reverse((update.timestamp(), update.id())));
        Ok(updates
            .into_iter()
            .filter_map(|update| to_entry(&tables, update))
            .collect())
    }

    async fn find_update(&self, id: UpdateId) -> TaskRepositoryResult<Option<ProgressUpdateEntry>> {
        let tables = self
            .database
            .read()
            .map_err(TaskRepositoryError::persistence)?;
        Ok(tables
            .updates
            .get(&id)
            .and_then(|update| to_entry(&tables, update)))
    }

    async fn exists(&self, id: TaskId) -> TaskRepositoryResult<bool> {
        let tables = self
            .database
            .read()
            .map_err(TaskRepositoryError::persistence)?;
        Ok(tables.tasks.contains_key(&id))
    }

    async fn insert(&self, task: &NewTask) -> TaskRepositoryResult<TaskId> {
        let mut tables = self
            .database
            .write()
            .map_err(TaskRepositoryError::persistence)?;
        ensure_user(&tables, task.created_by())?;
        if let Some(assignee) = task.assigned_to() {
            ensure_user(&tables, assignee)?;
        }
        let id = tables.next_task_id();
        tables.tasks.insert(id, task.clone().into_task(id));
        Ok(id)
    }

    async fn apply_patch(
        &self,
        id: TaskId,
        patch: &TaskPatch,
        updated_at: DateTime<Utc>,
    ) -> TaskRepositoryResult<bool> {
        let mut tables = self
            .database
            .write()
            .map_err(TaskRepositoryError::persistence)?;
        if let Some(Some(assignee)) = patch.assigned_to() {
            ensure_user(&tables, assignee)?;
        }
        let Some(task) = tables.tasks.get_mut(&id) else {
            return Ok(false);
        };
        task.apply(patch, updated_at);
        Ok(true)
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<bool> {
        let mut tables = self
            .database
            .write()
            .map_err(TaskRepositoryError::persistence)?;
        if tables.tasks.remove(&id).is_none() {
            return Ok(false);
        }
        tables.updates.retain(|_, update| update.task_id() != id);
        Ok(true)
    }

    async fn insert_update(&self, update: &NewProgressUpdate) -> TaskRepositoryResult<UpdateId> {
        let mut tables = self
            .database
            .write()
            .map_err(TaskRepositoryError::persistence)?;
        if !tables.tasks.contains_key(&update.task_id()) {
            return Err(TaskRepositoryError::NotFound(update.task_id()));
        }
        ensure_user(&tables, update.user_id())?;
        let id = tables.next_update_id();
        tables.updates.insert(id, update.clone().into_update(id));
        Ok(id)
    }

    async fn set_progress_state(
        &self,
        id: TaskId,
        state: ProgressState,
        updated_at: DateTime<Utc>,
    ) -> TaskRepositoryResult<()> {
        let mut tables = self
            .database
            .write()
            .map_err(TaskRepositoryError::persistence)?;
        let task = tables
            .tasks
            .get_mut(&id)
            .ok_or(TaskRepositoryError::NotFound(id))?;
        task.record_progress(state, updated_at);
        Ok(())
    }

    async fn stats(&self) -> TaskRepositoryResult<TaskStats> {
        let tables = self
            .database
            .read()
            .map_err(TaskRepositoryError::persistence)?;
        Ok(tables
            .tasks
            .values()
            .fold(TaskStats::default(), |mut stats, task| {
                stats.total += 1;
                match task.status() {
                    TaskStatus::Active => stats.active += 1,
                    TaskStatus::Inactive => stats.inactive += 1,
                    TaskStatus::Completed => stats.completed += 1,
                }
                if task.assigned_to().is_none() {
                    stats.unassigned += 1;
                }
                stats
            }))
    }
}
