//! Application services for session handling and authorization.

mod gate;

pub use gate::{SessionError, SessionGate, SessionResult};
