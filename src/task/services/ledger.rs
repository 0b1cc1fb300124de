//! Service layer for task CRUD, progress updates, and aggregate counts.

use super::requests::{AddProgressUpdateRequest, CreateTaskRequest, UpdateTaskRequest};
use crate::identity::{
    domain::UserId,
    ports::{UserRepository, UserRepositoryError},
};
use crate::task::{
    domain::{
        NewProgressUpdate, ProgressUpdateEntry, TaskDetail, TaskDomainError, TaskFilter, TaskId,
        TaskPatch, TaskStats, TaskStatus, TaskSummary,
    },
    ports::{TaskRepository, TaskRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Service-level errors for task ledger operations.
#[derive(Debug, Error)]
pub enum TaskLedgerError {
    /// Input validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),

    /// Task repository operation failed.
    #[error(transparent)]
    Repository(TaskRepositoryError),

    /// User lookup failed.
    #[error(transparent)]
    Users(#[from] UserRepositoryError),

    /// The task does not exist.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// The requested assignee does not exist.
    #[error("assigned user {0} does not exist")]
    UnknownAssignee(UserId),
}

impl From<TaskRepositoryError> for TaskLedgerError {
    fn from(err: TaskRepositoryError) -> Self {
        match err {
            TaskRepositoryError::NotFound(id) => Self::NotFound(id),
            TaskRepositoryError::UnknownUser(id) => Self::UnknownAssignee(id),
            other => Self::Repository(other),
        }
    }
}

/// Result type for task ledger operations.
pub type TaskLedgerResult<T> = Result<T, TaskLedgerError>;

/// Task ledger orchestration service.
pub struct TaskLedgerService<T, U, C>
where
    T: TaskRepository + ?Sized,
    U: UserRepository + ?Sized,
    C: Clock + Send + Sync,
{
    tasks: Arc<T>,
    users: Arc<U>,
    clock: Arc<C>,
}

impl<T, U, C> Clone for TaskLedgerService<T, U, C>
where
    T: TaskRepository + ?Sized,
    U: UserRepository + ?Sized,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            tasks: Arc::clone(&self.tasks),
            users: Arc::clone(&self.users),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<T, U, C> TaskLedgerService<T, U, C>
where
    T: TaskRepository + ?Sized,
    U: UserRepository + ?Sized,
    C: Clock + Send + Sync,
{
    /// Creates a new task ledger service.
    #[must_use]
    pub const fn new(tasks: Arc<T>, users: Arc<U>, clock: Arc<C>) -> Self {
        Self {
            tasks,
            users,
            clock,
        }
    }

    /// Lists tasks matching `filter`, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLedgerError::Repository`] when the lookup fails.
    pub async fn list(&self, filter: &TaskFilter) -> TaskLedgerResult<Vec<TaskSummary>> {
        Ok(self.tasks.list(filter).await?)
    }

    /// Retrieves a task with its progress trail.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLedgerError::NotFound`] when the task does not exist.
    pub async fn get(&self, id: TaskId) -> TaskLedgerResult<TaskDetail> {
        let summary = self
            .tasks
            .find_by_id(id)
            .await?
            .ok_or(TaskLedgerError::NotFound(id))?;
        let updates = self.tasks.list_updates(id).await?;
        Ok(summary.with_updates(updates))
    }

    /// Creates a task on behalf of `creator`.
    ///
    /// The creator always comes from the caller's identity.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLedgerError::Domain`] for a blank title or unknown
    /// priority and [`TaskLedgerError::UnknownAssignee`] when the assignee
    /// does not exist.
    pub async fn create(
        &self,
        request: CreateTaskRequest,
        creator: UserId,
    ) -> TaskLedgerResult<TaskDetail> {
        let requested_assignee = request.assigned_to();
        let new_task = request.into_new_task(creator, &*self.clock)?;
        if let Some(assignee) = requested_assignee {
            self.ensure_user_exists(assignee).await?;
        }
        let id = self.tasks.insert(&new_task).await?;
        info!(task_id = %id, created_by = %creator, "task created");
        self.get(id).await
    }

    /// Applies a partial update.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLedgerError::NotFound`] when the task does not exist,
    /// [`TaskLedgerError::Domain`] for invalid values or an empty update, and
    /// [`TaskLedgerError::UnknownAssignee`] when the new assignee does not
    /// exist.
    pub async fn update(
        &self,
        id: TaskId,
        request: UpdateTaskRequest,
        updated_by: UserId,
    ) -> TaskLedgerResult<TaskDetail> {
        self.ensure_task_exists(id).await?;
        let patch = request.into_patch()?;
        self.write_patch(id, &patch).await?;
        info!(task_id = %id, updated_by = %updated_by, "task updated");
        self.get(id).await
    }

    /// Sets or clears the assignee of a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLedgerError::NotFound`] when the task does not exist and
    /// [`TaskLedgerError::UnknownAssignee`] when the user does not.
    pub async fn assign(
        &self,
        id: TaskId,
        assignee: Option<UserId>,
        assigned_by: UserId,
    ) -> TaskLedgerResult<TaskDetail> {
        self.ensure_task_exists(id).await?;
        let patch = TaskPatch::new().with_assignee(assignee);
        self.write_patch(id, &patch).await?;
        info!(task_id = %id, assigned_by = %assigned_by, assignee = ?assignee.map(UserId::value), "task assigned");
        self.get(id).await
    }

    /// Changes the status of a task.
    ///
    /// The status token is validated before storage is touched.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLedgerError::Domain`] for an unknown status and
    /// [`TaskLedgerError::NotFound`] when the task does not exist.
    pub async fn change_status(
        &self,
        id: TaskId,
        status: &str,
        changed_by: UserId,
    ) -> TaskLedgerResult<TaskDetail> {
        let new_status = TaskStatus::try_from(status)?;
        self.ensure_task_exists(id).await?;
        self.write_patch(id, &TaskPatch::new().with_status(new_status))
            .await?;
        info!(task_id = %id, changed_by = %changed_by, status = %new_status, "task status changed");
        self.get(id).await
    }

    /// Deletes a task together with its progress updates.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLedgerError::NotFound`] when no task was removed.
    pub async fn delete(&self, id: TaskId) -> TaskLedgerResult<()> {
        if !self.tasks.delete(id).await? {
            return Err(TaskLedgerError::NotFound(id));
        }
        info!(task_id = %id, "task deleted");
        Ok(())
    }

    /// Appends a progress update authored by `author`.
    ///
    /// When a progress state is reported, the parent task is brought in line
    /// with a second, separate write.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLedgerError::Domain`] when neither a comment nor a valid
    /// progress state is given and [`TaskLedgerError::NotFound`] when the
    /// task does not exist.
    pub async fn add_update(
        &self,
        task_id: TaskId,
        request: AddProgressUpdateRequest,
        author: UserId,
    ) -> TaskLedgerResult<ProgressUpdateEntry> {
        let (comment, state) = request.into_parts()?;
        let update = NewProgressUpdate::new(task_id, author, comment, state, &*self.clock)?;
        self.ensure_task_exists(task_id).await?;

        let update_id = self.tasks.insert_update(&update).await?;
        if let Some(reported) = update.reported_state() {
            self.tasks
                .set_progress_state(task_id, reported, update.timestamp())
                .await?;
        }
        info!(task_id = %task_id, update_id = %update_id, author = %author, "progress update added");

        self.tasks
            .find_update(update_id)
            .await?
            .ok_or(TaskLedgerError::NotFound(task_id))
    }

    /// Computes aggregate counts.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLedgerError::Repository`] when the lookup fails.
    pub async fn stats(&self) -> TaskLedgerResult<TaskStats> {
        Ok(self.tasks.stats().await?)
    }

    async fn ensure_task_exists(&self, id: TaskId) -> TaskLedgerResult<()> {
        if self.tasks.exists(id).await? {
            Ok(())
        } else {
            Err(TaskLedgerError::NotFound(id))
        }
    }

    async fn ensure_user_exists(&self, id: UserId) -> TaskLedgerResult<()> {
        if self.users.find_by_id(id).await?.is_some() {
            Ok(())
        } else {
            Err(TaskLedgerError::UnknownAssignee(id))
        }
    }

    async fn write_patch(&self, id: TaskId, patch: &TaskPatch) -> TaskLedgerResult<()> {
        if let Some(Some(assignee)) = patch.assigned_to() {
            self.ensure_user_exists(assignee).await?;
        }
        if !self.tasks.apply_patch(id, patch, self.clock.utc()).await? {
            return Err(TaskLedgerError::NotFound(id));
        }
        Ok(())
    }
}
