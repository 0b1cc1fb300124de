//! Task ledger for the task board.
//!
//! Tasks are created by any authenticated user, mutated through partial
//! updates, annotated with an append-only trail of progress updates, and
//! deleted by administrators. Every read goes back to storage; the services
//! hold no authoritative copies. The module follows hexagonal architecture:
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
