//! Registration request and outcome shapes.

use super::AgentId;
use crate::ledger::domain::{PricePerCall, TokenId};
use serde::{Deserialize, Serialize};

/// Declaration of an agent's executable identity, bound for
/// `POST /agents/register`.
///
/// Field names match the service's JSON contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationRequest {
    /// Deterministic agent identifier.
    pub agent_id: AgentId,
    /// Display name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Instructions executed on the agent's behalf.
    pub system_prompt: String,
    /// Minted token the identity is linked to.
    pub token_id: TokenId,
    /// Price charged per invocation.
    pub price_per_call: PricePerCall,
    /// Whether x402 pay-per-call settlement is enabled.
    pub x402_enabled: bool,
    /// Whether other agents may invoke this agent.
    pub allow_cross_agent: bool,
}

/// Server-reported outcome of a registration call.
///
/// A rejection is explicitly non-fatal: the owning workflow records it as
/// a warning and proceeds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RegistrationOutcome {
    /// The service accepted the registration.
    Accepted,
    /// The service rejected the registration.
    Rejected {
        /// Server-provided failure message.
        message: String,
    },
}

impl RegistrationOutcome {
    /// Returns the rejection message, if the registration was rejected.
    #[must_use]
    pub fn rejection(&self) -> Option<&str> {
        match self {
            Self::Accepted => None,
            Self::Rejected { message } => Some(message),
        }
    }
}
