//! Hire-and-execute workflow aggregate.

use super::{HireQuery, TransitionError, WorkflowError, WorkflowId};
use crate::agent_service::domain::{ExecutionData, ExecutionRequest};
use crate::ledger::domain::{
    CallerIdentity, ContractEndpoint, PricePerCall, Receipt, TokenId, TransactionHandle,
    TransactionIntent,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Hire-and-execute lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HirePhase {
    /// Waiting for a query; no external calls yet.
    Idle,
    /// The payable hire intent is being submitted.
    Tx,
    /// The hire transaction is being confirmed.
    Confirming,
    /// The backend execution call is in flight.
    Executing,
    /// The workflow settled; only a reset leaves this phase.
    Done,
}

impl HirePhase {
    /// Returns the canonical phase label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Tx => "tx",
            Self::Confirming => "confirming",
            Self::Executing => "executing",
            Self::Done => "done",
        }
    }
}

/// Settled result of the execution step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ExecutionOutcome {
    /// The agent answered.
    Completed {
        /// The decoded execution payload.
        data: ExecutionData,
    },
    /// The call failed; not retried automatically.
    Failed {
        /// The structured failure.
        error: WorkflowError,
    },
}

/// External outcome fed into the hire-and-execute state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HireEvent {
    /// The user asked to hire the agent with a query.
    HireRequested {
        /// The validated query text.
        query: HireQuery,
    },
    /// The hire intent was dispatched and produced a handle.
    HireSubmitted(TransactionHandle),
    /// Hire submission or confirmation failed.
    HireFailed(WorkflowError),
    /// The hire transaction finalized.
    HireConfirmed(Receipt),
    /// The backend execution call settled.
    ExecutionSettled(ExecutionOutcome),
    /// The user discarded the instance's state.
    Reset,
}

impl HireEvent {
    /// Returns the canonical event label.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::HireRequested { .. } => "hire_requested",
            Self::HireSubmitted(_) => "hire_submitted",
            Self::HireFailed(_) => "hire_failed",
            Self::HireConfirmed(_) => "hire_confirmed",
            Self::ExecutionSettled(_) => "execution_settled",
            Self::Reset => "reset",
        }
    }
}

/// Hire-and-execute workflow aggregate root.
///
/// One instance covers one paid invocation of one listed agent. Handles
/// never cross instances: a reset clears every transient field, and a
/// new hire starts a fresh instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HireWorkflow {
    id: WorkflowId,
    phase: HirePhase,
    token_id: TokenId,
    price: PricePerCall,
    caller: CallerIdentity,
    query: Option<HireQuery>,
    last_handle: Option<TransactionHandle>,
    last_error: Option<WorkflowError>,
    outcome: Option<ExecutionOutcome>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl HireWorkflow {
    /// Starts a new instance in the `Idle` phase.
    ///
    /// The per-call price must be known up front; the query arrives with
    /// [`HireEvent::HireRequested`].
    #[must_use]
    pub fn start(
        token_id: TokenId,
        price: PricePerCall,
        caller: CallerIdentity,
        clock: &impl Clock,
    ) -> Self {
        let timestamp = clock.utc();
        Self {
            id: WorkflowId::new(),
            phase: HirePhase::Idle,
            token_id,
            price,
            caller,
            query: None,
            last_handle: None,
            last_error: None,
            outcome: None,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Applies one event to the state machine.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError`] when the current phase does not accept
    /// the event, or when a second handle would go live while one is
    /// still unresolved.
    pub fn apply(&mut self, event: HireEvent, clock: &impl Clock) -> Result<(), TransitionError> {
        let event_name = event.name();
        match (self.phase, event) {
            (HirePhase::Idle, HireEvent::HireRequested { query }) => self.on_requested(query),
            (HirePhase::Tx, HireEvent::HireSubmitted(handle)) => {
                self.on_submitted(handle, event_name)?;
            }
            (HirePhase::Tx | HirePhase::Confirming, HireEvent::HireFailed(error)) => {
                self.on_failed(error);
            }
            (HirePhase::Confirming, HireEvent::HireConfirmed(receipt)) => {
                self.on_confirmed(receipt);
            }
            (HirePhase::Executing, HireEvent::ExecutionSettled(outcome)) => {
                self.on_settled(outcome);
            }
            (_, HireEvent::Reset) => self.on_reset(),
            (phase, _) => return Err(TransitionError::new(phase.as_str(), event_name)),
        }
        self.touch(clock);
        Ok(())
    }

    fn on_requested(&mut self, query: HireQuery) {
        self.query = Some(query);
        self.last_error = None;
        self.phase = HirePhase::Tx;
    }

    fn on_submitted(
        &mut self,
        handle: TransactionHandle,
        event_name: &'static str,
    ) -> Result<(), TransitionError> {
        if self.last_handle.is_some() {
            return Err(TransitionError::new(self.phase.as_str(), event_name));
        }
        self.last_handle = Some(handle);
        self.phase = HirePhase::Confirming;
        Ok(())
    }

    fn on_failed(&mut self, error: WorkflowError) {
        // The query is preserved so the user can retry without retyping.
        self.last_handle = None;
        self.last_error = Some(error);
        self.phase = HirePhase::Idle;
    }

    fn on_confirmed(&mut self, receipt: Receipt) {
        if let Some(reason) = receipt.failure_reason() {
            let error = WorkflowError::chain_revert(reason.to_owned());
            self.on_failed(error);
            return;
        }
        self.last_handle = None;
        self.phase = HirePhase::Executing;
    }

    fn on_settled(&mut self, outcome: ExecutionOutcome) {
        self.outcome = Some(outcome);
        self.phase = HirePhase::Done;
    }

    fn on_reset(&mut self) {
        self.phase = HirePhase::Idle;
        self.query = None;
        self.last_handle = None;
        self.last_error = None;
        self.outcome = None;
    }

    /// Updates the `updated_at` timestamp to the current clock time.
    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }

    /// Returns the instance identifier.
    #[must_use]
    pub const fn id(&self) -> WorkflowId {
        self.id
    }

    /// Returns the current phase.
    #[must_use]
    pub const fn phase(&self) -> HirePhase {
        self.phase
    }

    /// Returns the hired token identifier.
    #[must_use]
    pub const fn token_id(&self) -> TokenId {
        self.token_id
    }

    /// Returns the per-call price paid on hire.
    #[must_use]
    pub const fn price(&self) -> &PricePerCall {
        &self.price
    }

    /// Returns the caller identity.
    #[must_use]
    pub const fn caller(&self) -> &CallerIdentity {
        &self.caller
    }

    /// Returns the query, once one was requested.
    #[must_use]
    pub const fn query(&self) -> Option<&HireQuery> {
        self.query.as_ref()
    }

    /// Returns the live transaction handle, if any.
    #[must_use]
    pub const fn last_handle(&self) -> Option<&TransactionHandle> {
        self.last_handle.as_ref()
    }

    /// Returns the last structured error, if any.
    #[must_use]
    pub const fn last_error(&self) -> Option<&WorkflowError> {
        self.last_error.as_ref()
    }

    /// Returns the settled execution outcome, once done.
    #[must_use]
    pub const fn outcome(&self) -> Option<&ExecutionOutcome> {
        self.outcome.as_ref()
    }

    /// Returns the agent's answer, when execution completed.
    #[must_use]
    pub fn result(&self) -> Option<&str> {
        match self.outcome.as_ref()? {
            ExecutionOutcome::Completed { data } => Some(data.result()),
            ExecutionOutcome::Failed { .. } => None,
        }
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest transition timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Builds the payable hire intent for this instance.
    #[must_use]
    pub fn hire_intent(&self, endpoint: ContractEndpoint) -> TransactionIntent {
        TransactionIntent::hire(endpoint, self.token_id, self.price.clone())
    }

    /// Builds the backend execution request, once a query is present.
    #[must_use]
    pub fn execution_request(&self) -> Option<ExecutionRequest> {
        self.query.as_ref().map(|query| ExecutionRequest {
            query: query.as_str().to_owned(),
            wallet_address: Some(self.caller.as_str().to_owned()),
            cross_agent: None,
        })
    }
}
