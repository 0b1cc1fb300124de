//! Request payloads accepted by the task ledger.
//!
//! Enum-valued fields arrive as raw strings so that out-of-vocabulary values
//! surface as domain validation errors with a readable message.

use crate::identity::domain::UserId;
use crate::task::domain::{
    NewTask, ProgressState, TaskDomainError, TaskPatch, TaskPriority, TaskStatus, TaskTitle,
};
use chrono::NaiveDate;
use mockable::Clock;
use serde::{Deserialize, Deserializer};

/// Distinguishes an explicit `null` from an absent field.
fn present<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Request payload for creating a task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CreateTaskRequest {
    title: Option<String>,
    description: Option<String>,
    priority: Option<String>,
    assigned_to: Option<UserId>,
    due_date: Option<NaiveDate>,
}

impl CreateTaskRequest {
    /// Creates a request carrying only a title.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the raw priority token.
    #[must_use]
    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
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

    /// Returns the requested assignee.
    #[must_use]
    pub const fn assigned_to(&self) -> Option<UserId> {
        self.assigned_to
    }

    pub(super) fn into_new_task(
        self,
        created_by: UserId,
        clock: &impl Clock,
    ) -> Result<NewTask, TaskDomainError> {
        let title = TaskTitle::new(self.title.unwrap_or_default())?;
        let mut task = NewTask::new(title, created_by, clock);
        if let Some(description) = self.description {
            task = task.with_description(description);
        }
        if let Some(priority) = self.priority {
            task = task.with_priority(TaskPriority::try_from(priority.as_str())?);
        }
        if let Some(assignee) = self.assigned_to {
            task = task.with_assignee(assignee);
        }
        if let Some(due_date) = self.due_date {
            task = task.with_due_date(due_date);
        }
        Ok(task)
    }
}

/// Request payload for a partial task update.
///
/// Absent fields are left untouched. For `description`, `assigned_to`, and
/// `due_date` an explicit `null` clears the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UpdateTaskRequest {
    title: Option<String>,
    #[serde(default, deserialize_with = "present")]
    description: Option<Option<String>>,
    status: Option<String>,
    priority: Option<String>,
    progress_state: Option<String>,
    #[serde(default, deserialize_with = "present")]
    assigned_to: Option<Option<UserId>>,
    #[serde(default, deserialize_with = "present")]
    due_date: Option<Option<NaiveDate>>,
}

impl UpdateTaskRequest {
    /// Creates a request that changes nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrites the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Overwrites the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(Some(description.into()));
        self
    }

    /// Overwrites the status with a raw token.
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Overwrites the priority with a raw token.
    #[must_use]
    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
        self
    }

    /// Overwrites the progress state with a raw token.
    #[must_use]
    pub fn with_progress_state(mut self, state: impl Into<String>) -> Self {
        self.progress_state = Some(state.into());
        self
    }

    /// Sets or clears the assignee.
    #[must_use]
    pub const fn with_assignee(mut self, assignee: Option<UserId>) -> Self {
        self.assigned_to = Some(assignee);
        self
    }

    /// Sets or clears the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: Option<NaiveDate>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub(super) fn into_patch(self) -> Result<TaskPatch, TaskDomainError> {
        let mut patch = TaskPatch::new();
        if let Some(title) = self.title {
            patch = patch.with_title(TaskTitle::new(title)?);
        }
        if let Some(description) = self.description {
            patch = patch.with_description(description.unwrap_or_default());
        }
        if let Some(status) = self.status {
            patch = patch.with_status(TaskStatus::try_from(status.as_str())?);
        }
        if let Some(priority) = self.priority {
            patch = patch.with_priority(TaskPriority::try_from(priority.as_str())?);
        }
        if let Some(state) = self.progress_state {
            patch = patch.with_progress_state(ProgressState::try_from(state.as_str())?);
        }
        if let Some(assignee) = self.assigned_to {
            patch = patch.with_assignee(assignee);
        }
        if let Some(due_date) = self.due_date {
            patch = patch.with_due_date(due_date);
        }
        patch.ensure_not_empty()
    }
}

/// Request payload for appending a progress update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AddProgressUpdateRequest {
    comment: Option<String>,
    progress_state: Option<String>,
}

impl AddProgressUpdateRequest {
    /// Creates an empty request.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the comment.
    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Sets the raw progress-state token.
    #[must_use]
    pub fn with_progress_state(mut self, state: impl Into<String>) -> Self {
        self.progress_state = Some(state.into());
        self
    }

    pub(super) fn into_parts(
        self,
    ) -> Result<(Option<String>, Option<ProgressState>), TaskDomainError> {
        let state = self
            .progress_state
            .filter(|raw| !raw.trim().is_empty())
            .map(|raw| ProgressState::try_from(raw.as_str()))
            .transpose()?;
        Ok((self.comment, state))
    }
}
