//! Append-only progress updates.

use super::{ProgressState, TaskDomainError, TaskId, UpdateId};
use crate::identity::domain::UserId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::Serialize;

/// A progress update as stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressUpdate {
    id: UpdateId,
    task_id: TaskId,
    user_id: Option<UserId>,
    comment: String,
    progress_state: ProgressState,
    timestamp: DateTime<Utc>,
}

impl ProgressUpdate {
    /// Returns the update identifier.
    #[must_use]
    pub const fn id(&self) -> UpdateId {
        self.id
    }

    /// Returns the parent task.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the author, `None` once that user is deleted.
    #[must_use]
    pub const fn user_id(&self) -> Option<UserId> {
        self.user_id
    }

    /// Returns the comment.
    #[must_use]
    pub fn comment(&self) -> &str {
        &self.comment
    }

    /// Drops the author reference when `user` is deleted.
    pub(crate) fn forget_user(&mut self, user: UserId) {
        if self.user_id == Some(user) {
            self.user_id = None;
        }
    }

    /// Returns the recorded progress state.
    #[must_use]
    pub const fn progress_state(&self) -> ProgressState {
        self.progress_state
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Joins the update with its author's display name.
    #[must_use]
    pub fn into_entry(self, user_name: impl Into<String>) -> ProgressUpdateEntry {
        ProgressUpdateEntry {
            id: self.id,
            comment: self.comment,
            progress_state: self.progress_state,
            timestamp: self.timestamp,
            user_name: user_name.into(),
        }
    }
}

/// A progress update joined with its author's name, as shown to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressUpdateEntry {
    /// Update identifier.
    pub id: UpdateId,
    /// Comment text, empty when omitted.
    pub comment: String,
    /// Recorded progress state.
    pub progress_state: ProgressState,
    /// Creation timestamp.
    pub timestamp: DateTime<Utc>,
    /// Author display name.
    pub user_name: String,
}

/// A validated progress update awaiting an identifier from storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProgressUpdate {
    task_id: TaskId,
    user_id: UserId,
    comment: String,
    progress_state: Option<ProgressState>,
    timestamp: DateTime<Utc>,
}

impl NewProgressUpdate {
    /// Validates and stamps a new progress update.
    ///
    /// A blank comment counts as absent.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyProgressUpdate`] when neither a
    /// comment nor a progress state is given.
    pub fn new(
        task_id: TaskId,
        user_id: UserId,
        comment: Option<String>,
        progress_state: Option<ProgressState>,
        clock: &impl Clock,
    ) -> Result<Self, TaskDomainError> {
        let text = comment.filter(|raw| !raw.trim().is_empty());
        if text.is_none() && progress_state.is_none() {
            return Err(TaskDomainError::EmptyProgressUpdate);
        }
        Ok(Self {
            task_id,
            user_id,
            comment: text.unwrap_or_default(),
            progress_state,
            timestamp: clock.utc(),
        })
    }

    /// Returns the parent task.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the author.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the comment, empty when omitted.
    #[must_use]
    pub fn comment(&self) -> &str {
        &self.comment
    }

    /// Returns the explicitly reported progress state, if any.
    ///
    /// Only an explicit state propagates to the parent task.
    #[must_use]
    pub const fn reported_state(&self) -> Option<ProgressState> {
        self.progress_state
    }

    /// Returns the state stored on the update row.
    #[must_use]
    pub fn stored_state(&self) -> ProgressState {
        self.progress_state.unwrap_or_default()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Completes the update with the identifier assigned by storage.
    #[must_use]
    pub fn into_update(self, id: UpdateId) -> ProgressUpdate {
        ProgressUpdate {
            id,
            task_id: self.task_id,
            user_id: Some(self.user_id),
            progress_state: self.stored_state(),
            comment: self.comment,
            timestamp: self.timestamp,
        }
    }
}
