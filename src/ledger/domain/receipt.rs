//! Finalized transaction receipts and emitted event records.

use super::TransactionHandle;
use serde::{Deserialize, Serialize};

/// Revert-message markers recognised when normalising failure reasons.
///
/// Checked in order; the first marker present in the raw message wins.
const REVERT_MARKERS: [&str; 4] = [
    "execution reverted:",
    "reverted with reason string:",
    "reverted with custom error:",
    "reason:",
];

/// Maximum length of a failure reason surfaced verbatim.
const MAX_RAW_REASON_CHARS: usize = 200;

/// Extracts a human-readable revert reason from a raw failure message.
///
/// Known revert-message markers are matched in order and the text after
/// the first present marker is returned trimmed. When no marker matches,
/// the first 200 characters of the raw message are surfaced verbatim.
#[must_use]
pub fn extract_revert_reason(raw: &str) -> String {
    for marker in REVERT_MARKERS {
        if let Some((_, rest)) = raw.split_once(marker) {
            let reason = rest.trim().trim_matches(['\'', '"']).trim();
            if !reason.is_empty() {
                return reason.to_owned();
            }
        }
    }
    raw.trim().chars().take(MAX_RAW_REASON_CHARS).collect()
}

/// One event emitted by a finalized transaction.
///
/// Argument values are kept as decoded JSON; entries that belong to
/// unrelated contracts simply carry shapes the decoder does not
/// recognise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    name: String,
    args: serde_json::Map<String, serde_json::Value>,
}

impl EventRecord {
    /// Creates an event record from a name and decoded arguments.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        args: serde_json::Map<String, serde_json::Value>,
    ) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }

    /// Returns the event name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the decoded argument value for `key`, if present.
    #[must_use]
    pub fn arg(&self, key: &str) -> Option<&serde_json::Value> {
        self.args.get(key)
    }
}

/// Finalization outcome of a transaction handle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ReceiptStatus {
    /// The transaction finalized successfully.
    Succeeded,
    /// The transaction finalized but reverted.
    Reverted {
        /// Normalised human-readable revert reason.
        reason: String,
    },
}

/// The finalized outcome of a submitted ledger write.
///
/// A receipt is produced exactly once per handle by the confirmation
/// watcher, or never if the caller abandons the watch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    handle: TransactionHandle,
    status: ReceiptStatus,
    events: Vec<EventRecord>,
}

impl Receipt {
    /// Creates a successful receipt carrying the emitted events in
    /// emission order.
    #[must_use]
    pub const fn succeeded(handle: TransactionHandle, events: Vec<EventRecord>) -> Self {
        Self {
            handle,
            status: ReceiptStatus::Succeeded,
            events,
        }
    }

    /// Creates a failure receipt, normalising the raw revert message.
    #[must_use]
    pub fn reverted(handle: TransactionHandle, raw_reason: &str) -> Self {
        Self {
            handle,
            status: ReceiptStatus::Reverted {
                reason: extract_revert_reason(raw_reason),
            },
            events: Vec::new(),
        }
    }

    /// Returns the handle this receipt finalizes.
    #[must_use]
    pub const fn handle(&self) -> &TransactionHandle {
        &self.handle
    }

    /// Returns the finalization status.
    #[must_use]
    pub const fn status(&self) -> &ReceiptStatus {
        &self.status
    }

    /// Returns the emitted events in emission order.
    #[must_use]
    pub fn events(&self) -> &[EventRecord] {
        &self.events
    }

    /// Returns whether the transaction finalized successfully.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self.status, ReceiptStatus::Succeeded)
    }

    /// Returns the normalised failure reason for a reverted receipt.
    #[must_use]
    pub fn failure_reason(&self) -> Option<&str> {
        match &self.status {
            ReceiptStatus::Succeeded => None,
            ReceiptStatus::Reverted { reason } => Some(reason),
        }
    }
}
