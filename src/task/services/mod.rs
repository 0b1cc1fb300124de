//! Application services for the task ledger.

mod ledger;
mod requests;

pub use ledger::{TaskLedgerError, TaskLedgerResult, TaskLedgerService};
pub use requests::{AddProgressUpdateRequest, CreateTaskRequest, UpdateTaskRequest};
