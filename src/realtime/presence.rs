//! Process-local registry of connections, announced users, and task viewers.

use crate::identity::domain::{Role, UserId};
use crate::task::domain::TaskId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

/// Identifier of one realtime connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    /// Generates a fresh random identifier.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The identity a client announces with `user:join`.
///
/// Announcements are taken as sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceUser {
    /// User identifier.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Role.
    pub role: Role,
}

/// One announced connection in the `users:updated` roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterEntry {
    /// User identifier.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Role.
    pub role: Role,
    /// Connection that made the announcement.
    pub socket_id: ConnectionId,
    /// When the announcement was made.
    pub joined_at: DateTime<Utc>,
}

impl RosterEntry {
    fn user(&self) -> PresenceUser {
        PresenceUser {
            id: self.id,
            name: self.name.clone(),
            role: self.role,
        }
    }
}

#[derive(Debug, Default)]
struct ConnectionState {
    announced: Option<RosterEntry>,
    viewing: Option<TaskId>,
}

/// Viewers to notify when a connection enters or leaves a task view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerMove {
    /// The task concerned.
    pub task_id: TaskId,
    /// Who moved, when the connection has announced itself.
    pub user: Option<PresenceUser>,
    /// Other connections viewing the same task.
    pub peers: Vec<ConnectionId>,
}

/// Result of removing a connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Departure {
    /// Whether the connection had announced a user.
    pub was_announced: bool,
    /// The task view it was in, if any.
    pub left_view: Option<ViewerMove>,
}

/// Connection presence keyed by connection identifier.
///
/// Exposes only add, remove, and snapshot operations; entries are cleared
/// when their connection goes away.
#[derive(Debug, Default)]
pub struct PresenceRegistry {
    connections: Mutex<HashMap<ConnectionId, ConnectionState>>,
}

impl PresenceRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<ConnectionId, ConnectionState>> {
        // Entries hold plain data, so a poisoned lock is still consistent.
        self.connections
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Tracks a new, anonymous connection.
    pub fn register(&self, connection: ConnectionId) {
        self.lock().insert(connection, ConnectionState::default());
    }

    /// Records the user behind `connection` and returns the new roster.
    pub fn announce(
        &self,
        connection: ConnectionId,
        user: PresenceUser,
        joined_at: DateTime<Utc>,
    ) -> Vec<RosterEntry> {
        let mut connections = self.lock();
        let state = connections.entry(connection).or_default();
        state.announced = Some(RosterEntry {
            id: user.id,
            name: user.name,
            role: user.role,
            socket_id: connection,
            joined_at,
        });
        roster_of(&connections)
    }

    /// Moves `connection` into the view of `task_id`.
    ///
    /// Returns the view it implicitly left, if it was viewing a different
    /// task, followed by the view it joined.
    pub fn start_viewing(
        &self,
        connection: ConnectionId,
        task_id: TaskId,
    ) -> (Option<ViewerMove>, ViewerMove) {
        let mut connections = self.lock();
        let previous = connections
            .get(&connection)
            .and_then(|state| state.viewing)
            .filter(|current| *current != task_id);
        if let Some(state) = connections.get_mut(&connection) {
            state.viewing = Some(task_id);
        }
        let left = previous.map(|old| viewer_move(&connections, connection, old));
        let joined = viewer_move(&connections, connection, task_id);
        (left, joined)
    }

    /// Takes `connection` out of the view of `task_id`.
    ///
    /// Returns `None` when the connection was not viewing that task.
    pub fn stop_viewing(&self, connection: ConnectionId, task_id: TaskId) -> Option<ViewerMove> {
        let mut connections = self.lock();
        let state = connections.get_mut(&connection)?;
        if state.viewing != Some(task_id) {
            return None;
        }
        state.viewing = None;
        Some(viewer_move(&connections, connection, task_id))
    }

    /// Forgets `connection`.
    ///
    /// Returns `None` when it was not registered.
    pub fn remove(&self, connection: ConnectionId) -> Option<Departure> {
        let mut connections = self.lock();
        let state = connections.remove(&connection)?;
        let left_view = state.viewing.map(|task_id| ViewerMove {
            task_id,
            user: state.announced.as_ref().map(RosterEntry::user),
            peers: peers_of(&connections, connection, task_id),
        });
        Some(Departure {
            was_announced: state.announced.is_some(),
            left_view,
        })
    }

    /// Returns announced connections, oldest announcement first.
    #[must_use]
    pub fn roster(&self) -> Vec<RosterEntry> {
        roster_of(&self.lock())
    }

    /// Returns the connections currently viewing `task_id`.
    #[must_use]
    pub fn viewers(&self, task_id: TaskId) -> Vec<ConnectionId> {
        self.lock()
            .iter()
            .filter(|(_, state)| state.viewing == Some(task_id))
            .map(|(id, _)| *id)
            .collect()
    }

    /// Returns the number of tracked connections.
    #[must_use]
    pub fn connection_count(&self) -> usize {
        self.lock().len()
    }
}

fn roster_of(connections: &HashMap<ConnectionId, ConnectionState>) -> Vec<RosterEntry> {
    let mut roster: Vec<RosterEntry> = connections
        .values()
        .filter_map(|state| state.announced.clone())
        .collect();
    roster.sort_by_key(|entry| (entry.joined_at, entry.socket_id.0));
    roster
}

fn peers_of(
    connections: &HashMap<ConnectionId, ConnectionState>,
    connection: ConnectionId,
    task_id: TaskId,
) -> Vec<ConnectionId> {
    connections
        .iter()
        .filter(|(id, state)| **id != connection && state.viewing == Some(task_id))
        .map(|(id, _)| *id)
        .collect()
}

fn viewer_move(
    connections: &HashMap<ConnectionId, ConnectionState>,
    connection: ConnectionId,
    task_id: TaskId,
) -> ViewerMove {
    ViewerMove {
        task_id,
        user: connections
            .get(&connection)
            .and_then(|state| state.announced.as_ref())
            .map(RosterEntry::user),
        peers: peers_of(connections, connection, task_id),
    }
}
