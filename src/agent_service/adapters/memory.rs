//! Scripted in-memory agent service for workflow tests.

use async_trait::async_trait;
use std::collections::{BTreeMap, VecDeque};
use std::sync::{Arc, Mutex};

use crate::agent_service::{
    domain::{AgentId, ExecutionData, ExecutionRequest, RegistrationOutcome, RegistrationRequest},
    ports::{AgentServiceClient, AgentServiceError, AgentServiceResult},
};
use crate::ledger::domain::TokenId;

/// Thread-safe scripted agent service implementing the client port.
///
/// Register and execute outcomes are consumed from queues in the order
/// they were enqueued; the token map is a settable snapshot. Every
/// request is recorded for assertions, and an exhausted queue yields a
/// transport error so a mis-scripted test fails fast.
#[derive(Debug, Clone, Default)]
pub struct ScriptedAgentService {
    state: Arc<Mutex<ScriptedServiceState>>,
}

#[derive(Debug, Default)]
struct ScriptedServiceState {
    register_outcomes: VecDeque<AgentServiceResult<RegistrationOutcome>>,
    execute_outcomes: VecDeque<AgentServiceResult<ExecutionData>>,
    token_entries: BTreeMap<TokenId, AgentId>,
    registrations: Vec<RegistrationRequest>,
    executions: Vec<(AgentId, ExecutionRequest)>,
    token_map_calls: usize,
}

impl ScriptedAgentService {
    /// Creates a service with empty scripts.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueues the outcome of the next registration call.
    pub fn enqueue_registration(&self, outcome: AgentServiceResult<RegistrationOutcome>) {
        if let Ok(mut state) = self.state.lock() {
            state.register_outcomes.push_back(outcome);
        }
    }

    /// Enqueues the outcome of the next execution call.
    pub fn enqueue_execution(&self, outcome: AgentServiceResult<ExecutionData>) {
        if let Ok(mut state) = self.state.lock() {
            state.execute_outcomes.push_back(outcome);
        }
    }

    /// Replaces the token map snapshot served to callers.
    pub fn set_token_map(&self, entries: impl IntoIterator<Item = (TokenId, AgentId)>) {
        if let Ok(mut state) = self.state.lock() {
            state.token_entries = entries.into_iter().collect();
        }
    }

    /// Returns every registration request received, in call order.
    #[must_use]
    pub fn registrations(&self) -> Vec<RegistrationRequest> {
        self.state
            .lock()
            .map(|state| state.registrations.clone())
            .unwrap_or_default()
    }

    /// Returns every execution request received, in call order.
    #[must_use]
    pub fn executions(&self) -> Vec<(AgentId, ExecutionRequest)> {
        self.state
            .lock()
            .map(|state| state.executions.clone())
            .unwrap_or_default()
    }

    /// Returns how many times the token map has been fetched.
    #[must_use]
    pub fn token_map_calls(&self) -> usize {
        self.state
            .lock()
            .map(|state| state.token_map_calls)
            .unwrap_or_default()
    }
}

#[async_trait]
impl AgentServiceClient for ScriptedAgentService {
    async fn register(
        &self,
        request: &RegistrationRequest,
    ) -> AgentServiceResult<RegistrationOutcome> {
        let mut state = self
            .state
            .lock()
            .map_err(|err| AgentServiceError::Transport(err.to_string()))?;
        state.registrations.push(request.clone());
        state.register_outcomes.pop_front().unwrap_or_else(|| {
            Err(AgentServiceError::Transport(
                "no scripted registration outcome".to_owned(),
            ))
        })
    }

    async fn execute(
        &self,
        agent_id: &AgentId,
        request: &ExecutionRequest,
    ) -> AgentServiceResult<ExecutionData> {
        let mut state = self
            .state
            .lock()
            .map_err(|err| AgentServiceError::Transport(err.to_string()))?;
        state.executions.push((agent_id.clone(), request.clone()));
        state.execute_outcomes.pop_front().unwrap_or_else(|| {
            Err(AgentServiceError::Transport(
                "no scripted execution outcome".to_owned(),
            ))
        })
    }

    async fn token_map(&self) -> AgentServiceResult<BTreeMap<TokenId, AgentId>> {
        let mut state = self
            .state
            .lock()
            .map_err(|err| AgentServiceError::Transport(err.to_string()))?;
        state.token_map_calls = state.token_map_calls.saturating_add(1);
        Ok(state.token_entries.clone())
    }
}
