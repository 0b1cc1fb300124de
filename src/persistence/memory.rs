//! In-process relational store shared by the in-memory adapters.
//!
//! Mirrors the `PostgreSQL` schema closely enough for the services to observe
//! the same behaviour: auto-increment identifiers, unique user names,
//! foreign keys from tasks and updates to users, and cascade deletion of
//! updates with their task. Deleting a user clears the creator and author
//! references that pointed at it.

use crate::identity::domain::{User, UserId};
use crate::task::domain::{ProgressUpdate, Task, TaskId, UpdateId};
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Thread-safe in-memory database.
///
/// Clones share the same tables.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDatabase {
    tables: Arc<RwLock<MemoryTables>>,
}

/// Table contents of an [`InMemoryDatabase`].
#[derive(Debug, Default)]
pub(crate) struct MemoryTables {
    pub(crate) users: BTreeMap<UserId, User>,
    pub(crate) tasks: BTreeMap<TaskId, Task>,
    pub(crate) updates: BTreeMap<UpdateId, ProgressUpdate>,
    last_user_id: i64,
    last_task_id: i64,
    last_update_id: i64,
}

impl MemoryTables {
    pub(crate) const fn next_user_id(&mut self) -> UserId {
        self.last_user_id += 1;
        UserId::new(self.last_user_id)
    }

    pub(crate) const fn next_task_id(&mut self) -> TaskId {
        self.last_task_id += 1;
        TaskId::new(self.last_task_id)
    }

    pub(crate) const fn next_update_id(&mut self) -> UpdateId {
        self.last_update_id += 1;
        UpdateId::new(self.last_update_id)
    }

    /// Returns the display name of a user, if the user exists.
    pub(crate) fn user_name(&self, id: UserId) -> Option<String> {
        self.users.get(&id).map(|user| user.name().as_str().to_owned())
    }

    /// Returns `true` when any task is assigned to the user.
    pub(crate) fn is_user_assigned(&self, id: UserId) -> bool {
        self.tasks
            .values()
            .any(|task| task.assigned_to() == Some(id))
    }

    /// Removes a user, nulling the creator and author columns that named it.
    pub(crate) fn remove_user(&mut self, id: UserId) -> bool {
        if self.users.remove(&id).is_none() {
            return false;
        }
        for task in self.tasks.values_mut() {
            task.forget_user(id);
        }
        for update in self.updates.values_mut() {
            update.forget_user(id);
        }
        true
    }
}

impl InMemoryDatabase {
    /// Creates an empty database.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn read(&self) -> Result<RwLockReadGuard<'_, MemoryTables>, std::io::Error> {
        self.tables
            .read()
            .map_err(|err| std::io::Error::other(err.to_string()))
    }

    pub(crate) fn write(&self) -> Result<RwLockWriteGuard<'_, MemoryTables>, std::io::Error> {
        self.tables
            .write()
            .map_err(|err| std::io::Error::other(err.to_string()))
    }
}
