//! Client port for bounded-time agent service calls.

use crate::agent_service::domain::{
    AgentId, ExecutionData, ExecutionRequest, RegistrationOutcome, RegistrationRequest,
};
use crate::ledger::domain::TokenId;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::time::Duration;
use thiserror::Error;

/// Result type for agent service calls.
pub type AgentServiceResult<T> = Result<T, AgentServiceError>;

/// Performs bounded-time HTTP-style calls against the agent service.
///
/// Implementations guarantee at most one in-flight call per logical
/// request and cancel the underlying call on timeout.
#[async_trait]
pub trait AgentServiceClient: Send + Sync {
    /// Registers an agent's executable identity.
    ///
    /// A server-side rejection is returned as
    /// [`RegistrationOutcome::Rejected`], not as an error, because the
    /// owning workflow treats it as non-fatal.
    ///
    /// # Errors
    ///
    /// Returns [`AgentServiceError::Timeout`] when the call exceeds its
    /// bound (an unknown outcome, distinct from a definite rejection) or
    /// [`AgentServiceError::Transport`] on a network fault.
    async fn register(
        &self,
        request: &RegistrationRequest,
    ) -> AgentServiceResult<RegistrationOutcome>;

    /// Invokes a registered agent with the hirer's query.
    ///
    /// # Errors
    ///
    /// Returns [`AgentServiceError::Timeout`] on an exceeded bound,
    /// [`AgentServiceError::Transport`] on a network fault, or
    /// [`AgentServiceError::Rejected`] when the service reports the
    /// execution failed.
    async fn execute(
        &self,
        agent_id: &AgentId,
        request: &ExecutionRequest,
    ) -> AgentServiceResult<ExecutionData>;

    /// Fetches the current token-to-agent identifier map.
    ///
    /// # Errors
    ///
    /// Returns [`AgentServiceError::Timeout`] or
    /// [`AgentServiceError::Transport`] when the map cannot be fetched.
    async fn token_map(&self) -> AgentServiceResult<BTreeMap<TokenId, AgentId>>;
}

/// Errors returned by agent service client implementations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AgentServiceError {
    /// No response arrived within the call's bound; the outcome is
    /// unknown rather than a definite failure.
    #[error("agent service call timed out after {0:?}")]
    Timeout(Duration),

    /// The call could not be completed.
    #[error("agent service transport error: {0}")]
    Transport(String),

    /// The service responded and reported a failure.
    #[error("agent service rejected the call: {0}")]
    Rejected(String),
}
