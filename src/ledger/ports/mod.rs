//! Port contracts for ledger interaction.

mod submitter;
mod watcher;

pub use submitter::{SubmitError, SubmitResult, TransactionSubmitter};
pub use watcher::{ConfirmationWatcher, WatchError, WatchResult};
