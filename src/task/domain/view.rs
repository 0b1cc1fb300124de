//! Read models joining tasks with user display names.

use super::{ProgressUpdateEntry, Task};
use serde::Serialize;

/// A task joined with its creator's and assignee's display names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskSummary {
    /// The stored task.
    #[serde(flatten)]
    pub task: Task,
    /// Display name of the creator, `None` if the user row is gone.
    pub creator_name: Option<String>,
    /// Display name of the assignee, `None` when unassigned.
    pub assigned_name: Option<String>,
}

impl TaskSummary {
    /// Attaches the task's progress trail, newest first.
    #[must_use]
    pub fn with_updates(self, updates: Vec<ProgressUpdateEntry>) -> TaskDetail {
        TaskDetail {
            summary: self,
            updates,
        }
    }
}

/// A task summary with its full progress trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskDetail {
    /// The joined task.
    #[serde(flatten)]
    pub summary: TaskSummary,
    /// Progress updates, newest first.
    pub updates: Vec<ProgressUpdateEntry>,
}

impl TaskDetail {
    /// Returns the stored task.
    #[must_use]
    pub const fn task(&self) -> &Task {
        &self.summary.task
    }
}
