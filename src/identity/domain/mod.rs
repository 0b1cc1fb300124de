//! Domain model for users and roles.

mod error;
mod ids;
mod role;
mod user;

pub use error::IdentityDomainError;
pub use ids::{UserId, UserName};
pub use role::Role;
pub use user::{NewUser, PersistedUserData, User};
