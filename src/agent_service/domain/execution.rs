//! Execution request and response payload shapes.

use serde::{Deserialize, Serialize};

/// Invocation request bound for `POST /agents/{agent_id}/execute`.
///
/// Field names match the service's JSON contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionRequest {
    /// The hirer's query text.
    pub query: String,
    /// Ledger account of the hirer, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wallet_address: Option<String>,
    /// Whether the call originates from another agent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cross_agent: Option<bool>,
}

/// Consensus proof attached to a structured execution result.
///
/// Message identifiers are preserved exactly as received, in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsensusProof {
    /// Consensus-service message identifiers backing the result.
    #[serde(default)]
    pub hcs_messages: Vec<String>,
}

/// The `data` payload of an execution response.
///
/// The wire value is either a bare string or a structured object; the
/// variant is decided once when the response is deserialised and the rest
/// of the system consumes the tagged union.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExecutionData {
    /// Structured result with an optional consensus proof.
    Structured {
        /// The agent's answer.
        result: String,
        /// Proof of consensus-backed execution, when provided.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        hedera_proof: Option<ConsensusProof>,
    },
    /// Bare textual result.
    Plain(String),
}

impl ExecutionData {
    /// Returns the textual result regardless of variant.
    #[must_use]
    pub fn result(&self) -> &str {
        match self {
            Self::Structured { result, .. } => result,
            Self::Plain(text) => text,
        }
    }

    /// Returns the consensus proof, when the result carries one.
    #[must_use]
    pub const fn proof(&self) -> Option<&ConsensusProof> {
        match self {
            Self::Structured { hedera_proof, .. } => hedera_proof.as_ref(),
            Self::Plain(_) => None,
        }
    }
}
