//! Publish/subscribe fan-out over a Tokio broadcast channel.

use super::events::{ClientEvent, ServerEvent, ViewerNotice};
use super::presence::{ConnectionId, PresenceRegistry, PresenceUser, ViewerMove};
use crate::task::domain::TaskId;
use mockable::Clock;
use std::sync::Arc;
use tokio::sync::broadcast::{
    self,
    error::{RecvError, TryRecvError},
};
use tracing::{debug, info, warn};

/// Who should receive an event.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Audience {
    Everyone,
    Only(Vec<ConnectionId>),
}

impl Audience {
    fn includes(&self, connection: ConnectionId) -> bool {
        match self {
            Self::Everyone => true,
            Self::Only(targets) => targets.contains(&connection),
        }
    }
}

#[derive(Debug, Clone)]
struct Envelope {
    audience: Audience,
    event: Arc<ServerEvent>,
}

/// Broadcast channel shared by request handlers and realtime connections.
///
/// Clones share the same channel and presence registry. Delivery is
/// best-effort: publishing with no subscribers is silent, and subscribers
/// that fall more than the channel capacity behind skip the missed events.
#[derive(Clone)]
pub struct BroadcastHub {
    sender: broadcast::Sender<Envelope>,
    presence: Arc<PresenceRegistry>,
    clock: Arc<dyn Clock + Send + Sync>,
}

impl std::fmt::Debug for BroadcastHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BroadcastHub")
            .field("subscribers", &self.sender.receiver_count())
            .finish_non_exhaustive()
    }
}

impl BroadcastHub {
    /// Creates a hub buffering up to `capacity` events per subscriber.
    ///
    /// A zero capacity is raised to one.
    #[must_use]
    pub fn new(capacity: usize, clock: Arc<dyn Clock + Send + Sync>) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            sender,
            presence: Arc::new(PresenceRegistry::new()),
            clock,
        }
    }

    /// Sends `event` to every subscriber.
    pub fn publish(&self, event: ServerEvent) {
        self.send(Audience::Everyone, event);
    }

    fn send(&self, audience: Audience, event: ServerEvent) {
        if matches!(&audience, Audience::Only(targets) if targets.is_empty()) {
            return;
        }
        let name = event.name();
        let envelope = Envelope {
            audience,
            event: Arc::new(event),
        };
        match self.sender.send(envelope) {
            Ok(receivers) => debug!(event = name, receivers, "event broadcast"),
            Err(_) => debug!(event = name, "event dropped: no subscribers"),
        }
    }

    /// Opens a new connection and returns its event stream.
    #[must_use]
    pub fn subscribe(&self) -> Subscription {
        let connection = ConnectionId::random();
        let receiver = self.sender.subscribe();
        self.presence.register(connection);
        info!(%connection, "realtime client connected");
        Subscription {
            connection,
            receiver,
            hub: self.clone(),
        }
    }

    /// Applies a client event received on `connection`.
    pub fn handle(&self, connection: ConnectionId, event: ClientEvent) {
        match event {
            ClientEvent::UserJoin(user) => self.announce(connection, user),
            ClientEvent::TaskViewing(task_id) => self.start_viewing(connection, task_id),
            ClientEvent::TaskStopViewing(task_id) => self.stop_viewing(connection, task_id),
            ClientEvent::NotificationRead(id) => self.acknowledge_notification(connection, id),
        }
    }

    /// Records who is behind `connection` and re-broadcasts the roster.
    pub fn announce(&self, connection: ConnectionId, user: PresenceUser) {
        info!(%connection, user_id = %user.id, name = %user.name, "realtime user joined");
        let roster = self
            .presence
            .announce(connection, user, self.clock.utc());
        self.publish(ServerEvent::UsersUpdated(roster));
    }

    /// Moves `connection` into a task view and tells the other viewers.
    pub fn start_viewing(&self, connection: ConnectionId, task_id: TaskId) {
        let (previous, joined) = self.presence.start_viewing(connection, task_id);
        if let Some(left) = previous {
            self.notify_viewers(left, ServerEvent::ViewerLeft);
        }
        self.notify_viewers(joined, ServerEvent::ViewerJoined);
    }

    /// Takes `connection` out of a task view and tells the other viewers.
    pub fn stop_viewing(&self, connection: ConnectionId, task_id: TaskId) {
        if let Some(left) = self.presence.stop_viewing(connection, task_id) {
            self.notify_viewers(left, ServerEvent::ViewerLeft);
        }
    }

    /// Echoes a notification acknowledgement back to its sender only.
    pub fn acknowledge_notification(&self, connection: ConnectionId, id: serde_json::Value) {
        self.send(
            Audience::Only(vec![connection]),
            ServerEvent::NotificationReadConfirm(id),
        );
    }

    /// Forgets `connection`, announcing its departure where relevant.
    pub fn disconnect(&self, connection: ConnectionId) {
        let Some(departure) = self.presence.remove(connection) else {
            return;
        };
        info!(%connection, "realtime client disconnected");
        if let Some(left) = departure.left_view {
            self.notify_viewers(left, ServerEvent::ViewerLeft);
        }
        if departure.was_announced {
            self.publish(ServerEvent::UsersUpdated(self.presence.roster()));
        }
    }

    /// Returns the presence registry.
    #[must_use]
    pub fn presence(&self) -> &PresenceRegistry {
        &self.presence
    }

    fn notify_viewers(&self, moved: ViewerMove, wrap: fn(ViewerNotice) -> ServerEvent) {
        let Some(user) = moved.user else {
            return;
        };
        let notice = ViewerNotice {
            task_id: moved.task_id,
            user,
        };
        self.send(Audience::Only(moved.peers), wrap(notice));
    }
}

/// One connection's view of the broadcast channel.
///
/// Dropping the subscription disconnects it.
#[derive(Debug)]
pub struct Subscription {
    connection: ConnectionId,
    receiver: broadcast::Receiver<Envelope>,
    hub: BroadcastHub,
}

impl Subscription {
    /// Returns the connection identifier.
    #[must_use]
    pub const fn connection(&self) -> ConnectionId {
        self.connection
    }

    /// Waits for the next event addressed to this connection.
    ///
    /// Returns `None` once the hub is gone.
    pub async fn recv(&mut self) -> Option<Arc<ServerEvent>> {
        loop {
            match self.receiver.recv().await {
                Ok(envelope) if envelope.audience.includes(self.connection) => {
                    return Some(envelope.event);
                }
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    warn!(connection = %self.connection, skipped, "realtime client lagging");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Returns the next addressed event if one is already buffered.
    pub fn try_recv(&mut self) -> Option<Arc<ServerEvent>> {
        loop {
            match self.receiver.try_recv() {
                Ok(envelope) if envelope.audience.includes(self.connection) => {
                    return Some(envelope.event);
                }
                Ok(_) | Err(TryRecvError::Lagged(_)) => {}
                Err(TryRecvError::Empty | TryRecvError::Closed) => return None,
            }
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.hub.disconnect(self.connection);
    }
}
