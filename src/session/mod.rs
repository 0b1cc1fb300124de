//! Session gate for the task board.
//!
//! Sessions are server-side records keyed by an opaque random identifier.
//! They cache the user's name and role at login time for status reporting,
//! but privileged checks always re-read the role from the identity
//! directory, so a downgrade takes effect on the next request.
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
