//! `PostgreSQL` adapters for the task ledger.

mod models;
mod repository;

pub use repository::PostgresTaskRepository;
