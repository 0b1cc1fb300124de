//! Identity directory for the task board.
//!
//! Users are the principals of every other context: they log in by name,
//! create and receive tasks, and carry the role that gates administrative
//! operations. The module follows hexagonal architecture:
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
