//! Live fan-out of task mutations and connection presence.
//!
//! Handlers publish [`events::ServerEvent`]s to the [`hub::BroadcastHub`]
//! after their storage writes succeed; every connected client holds a
//! [`hub::Subscription`] that yields the events addressed to it. Presence
//! (who is connected, who is looking at which task) lives only in process
//! memory inside [`presence::PresenceRegistry`] and is lost on restart.

pub mod events;
pub mod hub;
pub mod presence;

pub use events::{ClientEvent, ServerEvent};
pub use hub::{BroadcastHub, Subscription};
pub use presence::{ConnectionId, PresenceRegistry, PresenceUser, RosterEntry};

#[cfg(test)]
mod tests;
