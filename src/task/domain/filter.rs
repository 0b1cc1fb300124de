//! Task list filters and aggregate counts.

use super::{ProgressState, TaskPriority, TaskStatus};
use crate::identity::domain::UserId;
use serde::Serialize;

/// Assignee criterion of a task listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssigneeFilter {
    /// Only tasks without an assignee.
    Unassigned,
    /// Only tasks assigned to the user.
    User(UserId),
}

impl AssigneeFilter {
    /// Returns `true` when a task with `assignee` satisfies the criterion.
    #[must_use]
    pub fn matches(self, assignee: Option<UserId>) -> bool {
        match self {
            Self::Unassigned => assignee.is_none(),
            Self::User(id) => assignee == Some(id),
        }
    }
}

/// Exact-match criteria for listing tasks; absent criteria match anything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskFilter {
    /// Required status.
    pub status: Option<TaskStatus>,
    /// Required assignee.
    pub assignee: Option<AssigneeFilter>,
    /// Required priority.
    pub priority: Option<TaskPriority>,
    /// Required progress state.
    pub progress_state: Option<ProgressState>,
}

impl TaskFilter {
    /// Creates a filter that matches every task.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requires `status`.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Requires the assignee criterion.
    #[must_use]
    pub const fn with_assignee(mut self, assignee: AssigneeFilter) -> Self {
        self.assignee = Some(assignee);
        self
    }

    /// Requires `priority`.
    #[must_use]
    pub const fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Requires `progress_state`.
    #[must_use]
    pub const fn with_progress_state(mut self, state: ProgressState) -> Self {
        self.progress_state = Some(state);
        self
    }

    /// Returns `true` when the task fields satisfy every present criterion.
    #[must_use]
    pub fn matches(&self, task: &super::Task) -> bool {
        self.status.is_none_or(|status| task.status() == status)
            && self
                .assignee
                .is_none_or(|assignee| assignee.matches(task.assigned_to()))
            && self.priority.is_none_or(|priority| task.priority() == priority)
            && self
                .progress_state
                .is_none_or(|state| task.progress_state() == state)
    }
}

/// Aggregate task counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TaskStats {
    /// All tasks.
    pub total: u64,
    /// Tasks with status `activo`.
    pub active: u64,
    /// Tasks with status `inactivo`.
    pub inactive: u64,
    /// Tasks with status `finalizado`.
    pub completed: u64,
    /// Tasks without an assignee.
    pub unassigned: u64,
}
