//! Identifier types for the ledger domain.

use super::LedgerDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Domain identifier minted for an agent token.
///
/// Token identifiers are derived exactly once from a finalized receipt's
/// event sequence (see [`super::decode_token_id`]) and cached by the
/// owning workflow thereafter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenId(u64);

impl TokenId {
    /// Creates a token identifier from its numeric value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the wrapped numeric value.
    #[must_use]
    pub const fn into_inner(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque identifier for a submitted, not-yet-finalized ledger write.
///
/// A handle is produced by the transaction submitter immediately after
/// dispatch and is the key used to query confirmation status. Exactly one
/// handle is live per workflow instance at a time; that discipline is
/// enforced by the workflow's phase gating, not here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionHandle(String);

impl TransactionHandle {
    /// Creates a validated transaction handle.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerDomainError::EmptyTransactionHandle`] when the value
    /// is empty after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, LedgerDomainError> {
        let raw = value.into();
        let normalized = raw.trim();
        if normalized.is_empty() {
            return Err(LedgerDomainError::EmptyTransactionHandle);
        }
        Ok(Self(normalized.to_owned()))
    }

    /// Returns the handle as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for TransactionHandle {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for TransactionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Connected ledger account on whose behalf intents are submitted.
///
/// The identity is supplied explicitly when a workflow starts; the core
/// never reads ambient wallet state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CallerIdentity(String);

impl CallerIdentity {
    /// Creates a validated caller identity.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerDomainError::EmptyCallerIdentity`] when the value is
    /// empty after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, LedgerDomainError> {
        let raw = value.into();
        let normalized = raw.trim();
        if normalized.is_empty() {
            return Err(LedgerDomainError::EmptyCallerIdentity);
        }
        Ok(Self(normalized.to_owned()))
    }

    /// Returns the identity as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for CallerIdentity {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for CallerIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
