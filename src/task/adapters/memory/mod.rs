//! In-memory adapters for the task ledger.

mod task;

pub use task::InMemoryTaskRepository;
