//! `PostgreSQL` adapters for the identity directory.

mod models;
mod repository;

pub use repository::PostgresUserRepository;
