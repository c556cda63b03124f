//! Watcher port for observing transaction finalization.

use crate::ledger::domain::{Receipt, TransactionHandle};
use async_trait::async_trait;
use thiserror::Error;

/// Result type for confirmation watches.
pub type WatchResult<T> = Result<T, WatchError>;

/// Observes ledger state until a submitted write is finalized.
///
/// Implementations own their network capabilities; nothing is read from
/// ambient global state.
#[async_trait]
pub trait ConfirmationWatcher: Send + Sync {
    /// Suspends until the handle resolves, producing its receipt.
    ///
    /// Resolves exactly once per handle, with either a successful receipt
    /// or a failure receipt carrying a human-readable reason. Watches on
    /// different handles are independent and may resolve in any order.
    ///
    /// # Errors
    ///
    /// Returns [`WatchError`] when the ledger link is lost; a handle is
    /// never dropped silently.
    async fn watch(&self, handle: &TransactionHandle) -> WatchResult<Receipt>;
}

/// Error returned when a confirmation watch loses its ledger link.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("confirmation watch failed: {0}")]
pub struct WatchError(pub String);
