//! Repository port for task and progress-update persistence.

use crate::identity::domain::UserId;
use crate::persistence::StorageFailure;
use crate::task::domain::{
    NewProgressUpdate, NewTask, ProgressState, ProgressUpdateEntry, TaskFilter, TaskId, TaskPatch,
    TaskStats, TaskSummary, UpdateId,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Task persistence contract.
///
/// Reads return rows already joined with user display names.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Returns tasks matching `filter`, newest first.
    async fn list(&self, filter: &TaskFilter) -> TaskRepositoryResult<Vec<TaskSummary>>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<TaskSummary>>;

    /// Returns the progress updates of a task, newest first.
    async fn list_updates(&self, id: TaskId) -> TaskRepositoryResult<Vec<ProgressUpdateEntry>>;

    /// Finds a single progress update joined with its author's name.
    async fn find_update(&self, id: UpdateId) -> TaskRepositoryResult<Option<ProgressUpdateEntry>>;

    /// Returns `true` when the task exists.
    async fn exists(&self, id: TaskId) -> TaskRepositoryResult<bool>;

    /// Stores a new task and returns its identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::UnknownUser`] when the creator or
    /// assignee does not exist.
    async fn insert(&self, task: &NewTask) -> TaskRepositoryResult<TaskId>;

    /// Applies the fields present in `patch` and stamps `updated_at`.
    ///
    /// Returns `false` when the task does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::UnknownUser`] when the new assignee
    /// does not exist.
    async fn apply_patch(
        &self,
        id: TaskId,
        patch: &TaskPatch,
        updated_at: DateTime<Utc>,
    ) -> TaskRepositoryResult<bool>;

    /// Removes a task and, by cascade, its progress updates.
    ///
    /// Returns `false` when no row was removed.
    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<bool>;

    /// Appends a progress update and returns its identifier.
    ///
    /// This does not touch the parent task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist
    /// or [`TaskRepositoryError::UnknownUser`] when the author does not.
    async fn insert_update(&self, update: &NewProgressUpdate) -> TaskRepositoryResult<UpdateId>;

    /// Overwrites the progress state of a task and stamps `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist.
    async fn set_progress_state(
        &self,
        id: TaskId,
        state: ProgressState,
        updated_at: DateTime<Utc>,
    ) -> TaskRepositoryResult<()>;

    /// Computes aggregate counts over all tasks.
    async fn stats(&self) -> TaskRepositoryResult<TaskStats>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// A referenced user does not exist.
    #[error("user not found: {0}")]
    UnknownUser(UserId),

    /// Persisted data could not be reconstructed into domain types.
    #[error("invalid persisted data: {0}")]
    InvalidPersistedData(Arc<dyn std::error::Error + Send + Sync>),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a data-quality error from persisted rows.
    pub fn invalid_persisted_data(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::InvalidPersistedData(Arc::new(err))
    }

    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

impl StorageFailure for TaskRepositoryError {
    fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::persistence(err)
    }
}
