//! Validated draft fields for agent creation and hire.

use super::LifecycleDomainError;
use crate::agent_service::domain::{AgentId, RegistrationRequest};
use crate::ledger::domain::{AgentMetadata, ContractEndpoint, PricePerCall, TokenId, TransactionIntent};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Validated agent display name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentName(String);

impl AgentName {
    /// Creates a validated agent name.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleDomainError::EmptyAgentName`] when the value is
    /// empty after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, LifecycleDomainError> {
        let raw = value.into();
        let normalized = raw.trim();
        if normalized.is_empty() {
            return Err(LifecycleDomainError::EmptyAgentName);
        }
        Ok(Self(normalized.to_owned()))
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for AgentName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for AgentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validated hire query text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HireQuery(String);

impl HireQuery {
    /// Creates a validated hire query.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleDomainError::EmptyHireQuery`] when the value is
    /// empty after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, LifecycleDomainError> {
        let raw = value.into();
        if raw.trim().is_empty() {
            return Err(LifecycleDomainError::EmptyHireQuery);
        }
        Ok(Self(raw))
    }

    /// Returns the query as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for HireQuery {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for HireQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Draft fields collected before an agent is minted.
///
/// The draft is preserved across mint failures so the user can retry
/// without re-entering anything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentDraft {
    name: AgentName,
    description: String,
    capabilities: Vec<String>,
    system_prompt: String,
    price_per_call: PricePerCall,
    token_uri: String,
    encrypted_payload: String,
    sealed_key: String,
    x402_enabled: bool,
    allow_cross_agent: bool,
}

impl AgentDraft {
    /// Creates a draft with the required name and per-call price.
    #[must_use]
    pub fn new(name: AgentName, price_per_call: PricePerCall) -> Self {
        Self {
            name,
            description: String::new(),
            capabilities: Vec::new(),
            system_prompt: String::new(),
            price_per_call,
            token_uri: String::new(),
            encrypted_payload: String::new(),
            sealed_key: String::new(),
            x402_enabled: false,
            allow_cross_agent: false,
        }
    }

    /// Sets the agent description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the declared capability tags.
    #[must_use]
    pub fn with_capabilities(mut self, capabilities: impl IntoIterator<Item = String>) -> Self {
        self.capabilities = capabilities.into_iter().collect();
        self
    }

    /// Sets the instructions executed on the agent's behalf.
    #[must_use]
    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = system_prompt.into();
        self
    }

    /// Sets the token metadata URI.
    #[must_use]
    pub fn with_token_uri(mut self, token_uri: impl Into<String>) -> Self {
        self.token_uri = token_uri.into();
        self
    }

    /// Sets the sealed instruction payload carried by the mint intent.
    #[must_use]
    pub fn with_sealed_payload(
        mut self,
        encrypted_payload: impl Into<String>,
        sealed_key: impl Into<String>,
    ) -> Self {
        self.encrypted_payload = encrypted_payload.into();
        self.sealed_key = sealed_key.into();
        self
    }

    /// Enables x402 pay-per-call settlement.
    #[must_use]
    pub const fn with_x402_enabled(mut self, enabled: bool) -> Self {
        self.x402_enabled = enabled;
        self
    }

    /// Allows other agents to invoke this agent.
    #[must_use]
    pub const fn with_cross_agent(mut self, allowed: bool) -> Self {
        self.allow_cross_agent = allowed;
        self
    }

    /// Returns the agent name.
    #[must_use]
    pub const fn name(&self) -> &AgentName {
        &self.name
    }

    /// Returns the per-call price.
    #[must_use]
    pub const fn price_per_call(&self) -> &PricePerCall {
        &self.price_per_call
    }

    /// Returns the on-ledger metadata for this draft.
    #[must_use]
    pub fn metadata(&self) -> AgentMetadata {
        AgentMetadata {
            name: self.name.as_str().to_owned(),
            description: self.description.clone(),
            capabilities: self.capabilities.clone(),
            price_per_call: self.price_per_call.clone(),
        }
    }

    /// Builds the mint intent for this draft.
    #[must_use]
    pub fn mint_intent(&self, endpoint: ContractEndpoint) -> TransactionIntent {
        TransactionIntent::mint(
            endpoint,
            self.token_uri.clone(),
            self.metadata(),
            self.encrypted_payload.clone(),
            self.sealed_key.clone(),
        )
    }

    /// Builds the registration request linking this draft to a minted
    /// token.
    ///
    /// The agent identifier is derived deterministically from the draft
    /// name and the token, so re-registering the same mint always uses
    /// the same key.
    #[must_use]
    pub fn registration_request(&self, token_id: TokenId) -> RegistrationRequest {
        RegistrationRequest {
            agent_id: AgentId::derive(self.name.as_str(), token_id),
            name: self.name.as_str().to_owned(),
            description: self.description.clone(),
            system_prompt: self.system_prompt.clone(),
            token_id,
            price_per_call: self.price_per_call.clone(),
            x402_enabled: self.x402_enabled,
            allow_cross_agent: self.allow_cross_agent,
        }
    }
}
