//! Scripted in-memory ledger for workflow tests.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::ledger::{
    domain::{Receipt, TransactionHandle, TransactionIntent},
    ports::{
        ConfirmationWatcher, SubmitError, SubmitResult, TransactionSubmitter, WatchError,
        WatchResult,
    },
};

/// Thread-safe scripted ledger implementing both ledger ports.
///
/// Submission and watch outcomes are consumed from queues in the order
/// they were enqueued, and every dispatched intent and watched handle is
/// recorded for assertions. An exhausted queue yields an error rather
/// than hanging, so a mis-scripted test fails fast.
#[derive(Debug, Clone, Default)]
pub struct ScriptedLedger {
    state: Arc<Mutex<ScriptedLedgerState>>,
}

#[derive(Debug, Default)]
struct ScriptedLedgerState {
    submissions: VecDeque<SubmitResult<TransactionHandle>>,
    receipts: VecDeque<WatchResult<Receipt>>,
    submitted: Vec<TransactionIntent>,
    watched: Vec<TransactionHandle>,
}

impl ScriptedLedger {
    /// Creates a ledger with empty scripts.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueues the outcome of the next submission.
    pub fn enqueue_submission(&self, outcome: SubmitResult<TransactionHandle>) {
        if let Ok(mut state) = self.state.lock() {
            state.submissions.push_back(outcome);
        }
    }

    /// Enqueues the outcome of the next confirmation watch.
    pub fn enqueue_receipt(&self, outcome: WatchResult<Receipt>) {
        if let Ok(mut state) = self.state.lock() {
            state.receipts.push_back(outcome);
        }
    }

    /// Returns every intent dispatched so far, in submission order.
    #[must_use]
    pub fn submitted(&self) -> Vec<TransactionIntent> {
        self.state
            .lock()
            .map(|state| state.submitted.clone())
            .unwrap_or_default()
    }

    /// Returns every handle watched so far, in watch order.
    #[must_use]
    pub fn watched(&self) -> Vec<TransactionHandle> {
        self.state
            .lock()
            .map(|state| state.watched.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl TransactionSubmitter for ScriptedLedger {
    async fn submit(&self, intent: &TransactionIntent) -> SubmitResult<TransactionHandle> {
        let mut state = self
            .state
            .lock()
            .map_err(|err| SubmitError::Submission(err.to_string()))?;
        state.submitted.push(intent.clone());
        state
            .submissions
            .pop_front()
            .unwrap_or_else(|| Err(SubmitError::Submission("no scripted submission".to_owned())))
    }
}

#[async_trait]
impl ConfirmationWatcher for ScriptedLedger {
    async fn watch(&self, handle: &TransactionHandle) -> WatchResult<Receipt> {
        let mut state = self
            .state
            .lock()
            .map_err(|err| WatchError(err.to_string()))?;
        state.watched.push(handle.clone());
        state
            .receipts
            .pop_front()
            .unwrap_or_else(|| Err(WatchError("no scripted receipt".to_owned())))
    }
}
