//! Partial task update with explicit field presence.

use super::{ProgressState, TaskDomainError, TaskPriority, TaskStatus, TaskTitle};
use crate::identity::domain::UserId;
use chrono::NaiveDate;

/// A set of task fields to overwrite.
///
/// `None` means "leave untouched". For the nullable columns (`assigned_to`,
/// `due_date`) the inner option distinguishes setting a value from clearing
/// it: `Some(None)` clears.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    title: Option<TaskTitle>,
    description: Option<String>,
    status: Option<TaskStatus>,
    priority: Option<TaskPriority>,
    assigned_to: Option<Option<UserId>>,
    due_date: Option<Option<NaiveDate>>,
    progress_state: Option<ProgressState>,
}

impl TaskPatch {
    /// Creates an empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrites the title.
    #[must_use]
    pub fn with_title(mut self, title: TaskTitle) -> Self {
        self.title = Some(title);
        self
    }

    /// Overwrites the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Overwrites the status.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Overwrites the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = Some(priority);
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

    /// Overwrites the progress state.
    #[must_use]
    pub const fn with_progress_state(mut self, state: ProgressState) -> Self {
        self.progress_state = Some(state);
        self
    }

    /// Returns the new title, if present.
    #[must_use]
    pub const fn title(&self) -> Option<&TaskTitle> {
        self.title.as_ref()
    }

    /// Returns the new description, if present.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the new status, if present.
    #[must_use]
    pub const fn status(&self) -> Option<TaskStatus> {
        self.status
    }

    /// Returns the new priority, if present.
    #[must_use]
    pub const fn priority(&self) -> Option<TaskPriority> {
        self.priority
    }

    /// Returns the assignee change, if present.
    #[must_use]
    pub const fn assigned_to(&self) -> Option<Option<UserId>> {
        self.assigned_to
    }

    /// Returns the due date change, if present.
    #[must_use]
    pub const fn due_date(&self) -> Option<Option<NaiveDate>> {
        self.due_date
    }

    /// Returns the new progress state, if present.
    #[must_use]
    pub const fn progress_state(&self) -> Option<ProgressState> {
        self.progress_state
    }

    /// Returns `true` when no field is present.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.priority.is_none()
            && self.assigned_to.is_none()
            && self.due_date.is_none()
            && self.progress_state.is_none()
    }

    /// Rejects patches that would change nothing.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyPatch`] when no field is present.
    pub fn ensure_not_empty(self) -> Result<Self, TaskDomainError> {
        if self.is_empty() {
            return Err(TaskDomainError::EmptyPatch);
        }
        Ok(self)
    }
}
