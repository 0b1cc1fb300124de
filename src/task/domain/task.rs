//! Task record and creation draft.

use super::{ProgressState, TaskId, TaskPatch, TaskPriority, TaskStatus, TaskTitle};
use crate::identity::domain::UserId;
use chrono::{DateTime, NaiveDate, Utc};
use mockable::Clock;
use serde::Serialize;

/// A task as stored in the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    id: TaskId,
    title: TaskTitle,
    description: String,
    status: TaskStatus,
    priority: TaskPriority,
    assigned_to: Option<UserId>,
    created_by: Option<UserId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    due_date: Option<NaiveDate>,
    progress_state: ProgressState,
}

/// Parameter object for reconstructing a persisted task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted title.
    pub title: TaskTitle,
    /// Persisted description.
    pub description: String,
    /// Persisted status.
    pub status: TaskStatus,
    /// Persisted priority.
    pub priority: TaskPriority,
    /// Persisted assignee, if any.
    pub assigned_to: Option<UserId>,
    /// Persisted creator, `None` once the user is deleted.
    pub created_by: Option<UserId>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted last mutation timestamp.
    pub updated_at: DateTime<Utc>,
    /// Persisted due date, if any.
    pub due_date: Option<NaiveDate>,
    /// Persisted progress state.
    pub progress_state: ProgressState,
}

impl Task {
    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            title: data.title,
            description: data.description,
            status: data.status,
            priority: data.priority,
            assigned_to: data.assigned_to,
            created_by: data.created_by,
            created_at: data.created_at,
            updated_at: data.updated_at,
            due_date: data.due_date,
            progress_state: data.progress_state,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the title.
    #[must_use]
    pub const fn title(&self) -> &TaskTitle {
        &self.title
    }

    /// Returns the description, empty when none was given.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> TaskPriority {
        self.priority
    }

    /// Returns the assignee, if any.
    #[must_use]
    pub const fn assigned_to(&self) -> Option<UserId> {
        self.assigned_to
    }

    /// Returns the creating user, `None` once that user is deleted.
    #[must_use]
    pub const fn created_by(&self) -> Option<UserId> {
        self.created_by
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the last mutation timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns the due date, if any.
    #[must_use]
    pub const fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }

    /// Returns the progress state.
    #[must_use]
    pub const fn progress_state(&self) -> ProgressState {
        self.progress_state
    }

    /// Applies the fields present in `patch` and stamps `updated_at`.
    ///
    /// The creator is never part of a patch.
    pub fn apply(&mut self, patch: &TaskPatch, updated_at: DateTime<Utc>) {
        if let Some(title) = patch.title() {
            self.title = title.clone();
        }
        if let Some(description) = patch.description() {
            description.clone_into(&mut self.description);
        }
        if let Some(status) = patch.status() {
            self.status = status;
        }
        if let Some(priority) = patch.priority() {
            self.priority = priority;
        }
        if let Some(assigned_to) = patch.assigned_to() {
            self.assigned_to = assigned_to;
        }
        if let Some(due_date) = patch.due_date() {
            self.due_date = due_date;
        }
        if let Some(progress_state) = patch.progress_state() {
            self.progress_state = progress_state;
        }
        self.updated_at = updated_at;
    }

    /// Records a new progress state reported through a progress update.
    pub fn record_progress(&mut self, state: ProgressState, updated_at: DateTime<Utc>) {
        self.progress_state = state;
        self.updated_at = updated_at;
    }

    /// Drops the creator reference when `user` is deleted.
    pub(crate) fn forget_user(&mut self, user: UserId) {
        if self.created_by == Some(user) {
            self.created_by = None;
        }
    }
}

/// A validated task awaiting an identifier from storage.
///
/// New tasks always start `activo` and `inicializado`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    title: TaskTitle,
    description: String,
    priority: TaskPriority,
    assigned_to: Option<UserId>,
    created_by: UserId,
    due_date: Option<NaiveDate>,
    created_at: DateTime<Utc>,
}

impl NewTask {
    /// Creates a draft with default priority and no assignee.
    #[must_use]
    pub fn new(title: TaskTitle, created_by: UserId, clock: &impl Clock) -> Self {
        Self {
            title,
            description: String::new(),
            priority: TaskPriority::default(),
            assigned_to: None,
            created_by,
            due_date: None,
            created_at: clock.utc(),
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the assignee.
    #[must_use]
    pub const fn with_assignee(mut self, assignee: UserId) -> Self {
        self.assigned_to = Some(assignee);
        self
    }

    /// Sets the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Returns the title.
    #[must_use]
    pub const fn title(&self) -> &TaskTitle {
        &self.title
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> TaskPriority {
        self.priority
    }

    /// Returns the assignee, if any.
    #[must_use]
    pub const fn assigned_to(&self) -> Option<UserId> {
        self.assigned_to
    }

    /// Returns the creating user.
    #[must_use]
    pub const fn created_by(&self) -> UserId {
        self.created_by
    }

    /// Returns the due date, if any.
    #[must_use]
    pub const fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }

    /// Returns the creation timestamp, also used as the first `updated_at`.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Completes the draft with the identifier assigned by storage.
    #[must_use]
    pub fn into_task(self, id: TaskId) -> Task {
        Task {
            id,
            title: self.title,
            description: self.description,
            status: TaskStatus::default(),
            priority: self.priority,
            assigned_to: self.assigned_to,
            created_by: Some(self.created_by),
            created_at: self.created_at,
            updated_at: self.created_at,
            due_date: self.due_date,
            progress_state: ProgressState::default(),
        }
    }
}
