//! Wire events exchanged over the realtime channel.
//!
//! Every frame is a JSON object `{"event": <name>, "data": <payload>}`.

use super::presence::{PresenceUser, RosterEntry};
use crate::identity::domain::UserId;
use crate::task::domain::{ProgressUpdateEntry, TaskDetail, TaskId, TaskStatus};
use serde::{Deserialize, Serialize};

/// Events pushed from the server to connected clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "data")]
pub enum ServerEvent {
    /// A task was created.
    #[serde(rename = "task:created")]
    TaskCreated(TaskDetail),
    /// A task was updated.
    #[serde(rename = "task:updated")]
    TaskUpdated(TaskDetail),
    /// A task was deleted.
    #[serde(rename = "task:deleted")]
    TaskDeleted(TaskDeleted),
    /// A progress update was appended to a task.
    #[serde(rename = "task:update_added")]
    TaskUpdateAdded(UpdateAdded),
    /// A task was assigned or unassigned.
    #[serde(rename = "task:assigned")]
    TaskAssigned(TaskAssigned),
    /// A task changed status.
    #[serde(rename = "task:status_changed")]
    TaskStatusChanged(StatusChanged),
    /// The roster of announced connections changed.
    #[serde(rename = "users:updated")]
    UsersUpdated(Vec<RosterEntry>),
    /// Another client started viewing the same task.
    #[serde(rename = "task:viewer_joined")]
    ViewerJoined(ViewerNotice),
    /// Another client stopped viewing the same task.
    #[serde(rename = "task:viewer_left")]
    ViewerLeft(ViewerNotice),
    /// Echo of a client's notification acknowledgement.
    #[serde(rename = "notification:read_confirm")]
    NotificationReadConfirm(serde_json::Value),
}

impl ServerEvent {
    /// Returns the wire name of the event.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::TaskCreated(_) => "task:created",
            Self::TaskUpdated(_) => "task:updated",
            Self::TaskDeleted(_) => "task:deleted",
            Self::TaskUpdateAdded(_) => "task:update_added",
            Self::TaskAssigned(_) => "task:assigned",
            Self::TaskStatusChanged(_) => "task:status_changed",
            Self::UsersUpdated(_) => "users:updated",
            Self::ViewerJoined(_) => "task:viewer_joined",
            Self::ViewerLeft(_) => "task:viewer_left",
            Self::NotificationReadConfirm(_) => "notification:read_confirm",
        }
    }
}

/// Payload of `task:deleted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TaskDeleted {
    /// The removed task.
    pub id: TaskId,
}

/// Payload of `task:update_added`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAdded {
    /// Parent task.
    pub task_id: TaskId,
    /// The new progress update.
    pub update: ProgressUpdateEntry,
    /// The task as it stands after the update.
    pub task: TaskDetail,
}

/// Payload of `task:assigned`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskAssigned {
    /// Assigned task.
    pub task_id: TaskId,
    /// New assignee, `null` when cleared.
    pub assigned_to: Option<UserId>,
    /// Name of the user who made the assignment.
    pub assigned_by_name: String,
    /// The task after assignment.
    pub task: TaskDetail,
}

/// Payload of `task:status_changed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusChanged {
    /// Affected task.
    pub task_id: TaskId,
    /// New status.
    pub status: TaskStatus,
    /// Name of the user who changed it.
    pub changed_by_name: String,
    /// The task after the change.
    pub task: TaskDetail,
}

/// Payload of `task:viewer_joined` and `task:viewer_left`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewerNotice {
    /// Viewed task.
    pub task_id: TaskId,
    /// The viewer.
    pub user: PresenceUser,
}

/// Events sent by clients.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ClientEvent {
    /// Announces who is behind the connection.
    #[serde(rename = "user:join")]
    UserJoin(PresenceUser),
    /// The client opened a task's detail view.
    #[serde(rename = "task:viewing")]
    TaskViewing(TaskId),
    /// The client closed a task's detail view.
    #[serde(rename = "task:stop_viewing")]
    TaskStopViewing(TaskId),
    /// The client read a notification.
    #[serde(rename = "notification:read")]
    NotificationRead(serde_json::Value),
}
