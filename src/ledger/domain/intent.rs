//! Write intents dispatched to the ledger.

use super::{LedgerDomainError, PricePerCall, TokenId};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Validated contract-like endpoint targeted by a write intent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContractEndpoint(String);

impl ContractEndpoint {
    /// Creates a validated contract endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerDomainError::EmptyContractEndpoint`] when the value
    /// is empty after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, LedgerDomainError> {
        let raw = value.into();
        let normalized = raw.trim();
        if normalized.is_empty() {
            return Err(LedgerDomainError::EmptyContractEndpoint);
        }
        Ok(Self(normalized.to_owned()))
    }

    /// Returns the endpoint as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContractEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// On-ledger agent metadata carried by a mint intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentMetadata {
    /// Display name of the agent.
    pub name: String,
    /// Free-form description of the agent's behaviour.
    pub description: String,
    /// Declared capability tags.
    pub capabilities: Vec<String>,
    /// Price charged per invocation.
    pub price_per_call: PricePerCall,
}

impl AgentMetadata {
    /// Returns the hex-encoded SHA-256 digest of the canonical metadata
    /// JSON.
    ///
    /// The digest accompanies the metadata on the mint intent so the
    /// contract can commit to the exact payload.
    #[must_use]
    pub fn metadata_hash(&self) -> String {
        let canonical = serde_json::json!({
            "name": self.name,
            "description": self.description,
            "capabilities": self.capabilities,
            "pricePerCall": self.price_per_call.as_str(),
        })
        .to_string();
        let digest = Sha256::digest(canonical.as_bytes());
        digest.iter().map(|byte| format!("{byte:02x}")).collect()
    }
}

/// Function selector and argument tuple of a write intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "selector", rename_all = "snake_case")]
pub enum TransactionCall {
    /// Mints a new agent token.
    Mint {
        /// Token metadata URI.
        token_uri: String,
        /// On-ledger agent metadata.
        metadata: AgentMetadata,
        /// Hex-encoded SHA-256 digest of the canonical metadata JSON.
        metadata_hash: String,
        /// Opaque encrypted instruction payload.
        encrypted_payload: String,
        /// Opaque sealed decryption key.
        sealed_key: String,
    },
    /// Lists an existing agent token for hire.
    List {
        /// Token to list.
        token_id: TokenId,
        /// Per-call hire price.
        price_per_call: PricePerCall,
    },
    /// Hires a listed agent token for one invocation.
    Hire {
        /// Token to hire.
        token_id: TokenId,
    },
}

impl TransactionCall {
    /// Returns the function selector name.
    #[must_use]
    pub const fn selector(&self) -> &'static str {
        match self {
            Self::Mint { .. } => "mint",
            Self::List { .. } => "list",
            Self::Hire { .. } => "hire",
        }
    }
}

/// A requested ledger write: endpoint, call, and optional value transfer.
///
/// Intents are immutable once built; the submitter dispatches exactly one
/// write per intent and the workflow never mutates an intent after
/// submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionIntent {
    endpoint: ContractEndpoint,
    call: TransactionCall,
    value: Option<PricePerCall>,
}

impl TransactionIntent {
    /// Builds a mint intent for the given metadata and sealed payload.
    ///
    /// The metadata hash is derived from the metadata itself.
    #[must_use]
    pub fn mint(
        endpoint: ContractEndpoint,
        token_uri: impl Into<String>,
        metadata: AgentMetadata,
        encrypted_payload: impl Into<String>,
        sealed_key: impl Into<String>,
    ) -> Self {
        let metadata_hash = metadata.metadata_hash();
        Self {
            endpoint,
            call: TransactionCall::Mint {
                token_uri: token_uri.into(),
                metadata,
                metadata_hash,
                encrypted_payload: encrypted_payload.into(),
                sealed_key: sealed_key.into(),
            },
            value: None,
        }
    }

    /// Builds a list intent pricing the given token per call.
    #[must_use]
    pub const fn list(
        endpoint: ContractEndpoint,
        token_id: TokenId,
        price_per_call: PricePerCall,
    ) -> Self {
        Self {
            endpoint,
            call: TransactionCall::List {
                token_id,
                price_per_call,
            },
            value: None,
        }
    }

    /// Builds a payable hire intent valued at the agent's per-call price.
    #[must_use]
    pub const fn hire(endpoint: ContractEndpoint, token_id: TokenId, price: PricePerCall) -> Self {
        Self {
            endpoint,
            call: TransactionCall::Hire { token_id },
            value: Some(price),
        }
    }

    /// Returns the targeted contract endpoint.
    #[must_use]
    pub const fn endpoint(&self) -> &ContractEndpoint {
        &self.endpoint
    }

    /// Returns the requested call.
    #[must_use]
    pub const fn call(&self) -> &TransactionCall {
        &self.call
    }

    /// Returns the value transferred with the call, if any.
    #[must_use]
    pub const fn value(&self) -> Option<&PricePerCall> {
        self.value.as_ref()
    }
}
