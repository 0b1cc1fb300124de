//! Domain model for login sessions.

mod session;

pub use session::{AuthenticatedIdentity, Session, SessionId};
