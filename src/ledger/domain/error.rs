//! Error types for ledger domain validation.

use thiserror::Error;

/// Errors returned while constructing ledger domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LedgerDomainError {
    /// The transaction handle is empty after trimming.
    #[error("transaction handle must not be empty")]
    EmptyTransactionHandle,

    /// The caller identity is empty after trimming.
    #[error("caller identity must not be empty")]
    EmptyCallerIdentity,

    /// The per-call price is empty after trimming.
    #[error("price per call must not be empty")]
    EmptyPricePerCall,

    /// The per-call price is not a plain decimal number.
    #[error("invalid price per call '{0}', expected a decimal amount")]
    InvalidPricePerCall(String),

    /// The per-call price carries no value.
    #[error("price per call '{0}' must be greater than zero")]
    ZeroPricePerCall(String),

    /// The contract endpoint is empty after trimming.
    #[error("contract endpoint must not be empty")]
    EmptyContractEndpoint,
}
