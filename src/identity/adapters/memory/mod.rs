//! In-memory adapters for the identity directory.

mod user;

pub use user::InMemoryUserRepository;
