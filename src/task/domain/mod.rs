//! Domain model for tasks and their progress trail.
//!
//! The task domain models creation drafts, partial patches, progress
//! updates, list filters, and aggregate counts while keeping all
//! infrastructure concerns outside of the domain boundary.

mod error;
mod filter;
mod ids;
mod patch;
mod progress;
mod task;
mod vocabulary;
mod view;

pub use error::TaskDomainError;
pub use filter::{AssigneeFilter, TaskFilter, TaskStats};
pub use ids::{TaskId, TaskTitle, UpdateId};
pub use patch::TaskPatch;
pub use progress::{NewProgressUpdate, ProgressUpdate, ProgressUpdateEntry};
pub use task::{NewTask, PersistedTaskData, Task};
pub use view::{TaskDetail, TaskSummary};
pub use vocabulary::{ProgressState, TaskPriority, TaskStatus};
