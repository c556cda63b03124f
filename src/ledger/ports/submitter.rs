//! Submitter port for dispatching write intents to the ledger.

use crate::ledger::domain::{TransactionHandle, TransactionIntent};
use async_trait::async_trait;
use thiserror::Error;

/// Result type for transaction submission.
pub type SubmitResult<T> = Result<T, SubmitError>;

/// Dispatches one signed write intent to the ledger's mempool.
///
/// Implementations own their signer and network capabilities; nothing is
/// read from ambient global state. No retries are performed internally;
/// retry is a workflow decision.
#[async_trait]
pub trait TransactionSubmitter: Send + Sync {
    /// Submits an intent and returns the pending handle.
    ///
    /// Exactly one write is dispatched per call. The caller must not
    /// submit the same logical intent again while a handle from a prior
    /// call is still unresolved.
    ///
    /// # Errors
    ///
    /// Returns [`SubmitError::RejectedByUser`] when the signer declines,
    /// or [`SubmitError::Submission`] on a network or RPC fault. Either
    /// way, no handle was produced and no write reached the mempool.
    async fn submit(&self, intent: &TransactionIntent) -> SubmitResult<TransactionHandle>;
}

/// Errors returned by transaction submitter implementations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SubmitError {
    /// The signer declined to authorise the write.
    #[error("transaction rejected by the signer")]
    RejectedByUser,

    /// The write could not be dispatched.
    #[error("transaction submission failed: {0}")]
    Submission(String),
}
