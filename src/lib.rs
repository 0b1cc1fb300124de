//! Taskboard: a multi-user task board with live updates.
//!
//! Users log in by name, create and assign tasks, record progress updates,
//! and watch the board change in real time over a WebSocket.
//!
//! # Architecture
//!
//! Each bounded context follows hexagonal architecture principles:
//!
//! - **Domain**: validated values and entities with no infrastructure
//!   dependencies
//! - **Ports**: async trait interfaces for storage
//! - **Adapters**: `PostgreSQL` (Diesel) and in-memory implementations
//! - **Services**: the operations the HTTP edge calls
//!
//! # Modules
//!
//! - [`identity`]: users, roles, and the identity directory
//! - [`task`]: tasks, progress updates, filters, and statistics
//! - [`session`]: cookie sessions and role checks
//! - [`realtime`]: event fan-out and presence tracking
//! - [`persistence`]: the storage engines shared by the contexts
//! - [`http`]: the axum router
//! - [`config`], [`telemetry`], [`server`]: process wiring

pub mod config;
pub mod http;
pub mod identity;
pub mod persistence;
pub mod realtime;
pub mod server;
pub mod session;
pub mod task;
pub mod telemetry;
