//! Effect runner for the hire-and-execute workflow.

use crate::agent_service::{ports::AgentServiceClient, services::TokenMapResolver};
use crate::ledger::{
    domain::{CallerIdentity, ContractEndpoint, PricePerCall, TokenId},
    ports::{ConfirmationWatcher, TransactionSubmitter},
};
use crate::lifecycle::domain::{
    ExecutionOutcome, HireEvent, HirePhase, HireQuery, HireWorkflow, TransitionError,
};
use mockable::Clock;
use std::sync::Arc;
use tracing::{info, warn};

/// Hire-and-execute workflow orchestration service.
///
/// Sequences payment, confirmation, and invocation strictly; the hire
/// transaction fully resolves before the backend call begins. Agent
/// identifiers are resolved through a token map shared by every instance
/// this service starts, so one refresh benefits them all.
#[derive(Clone)]
pub struct HireAndExecuteService<S, W, B, C>
where
    S: TransactionSubmitter,
    W: ConfirmationWatcher,
    B: AgentServiceClient,
    C: Clock + Send + Sync,
{
    marketplace: ContractEndpoint,
    submitter: Arc<S>,
    watcher: Arc<W>,
    client: Arc<B>,
    resolver: TokenMapResolver<B>,
    clock: Arc<C>,
}

impl<S, W, B, C> HireAndExecuteService<S, W, B, C>
where
    S: TransactionSubmitter,
    W: ConfirmationWatcher,
    B: AgentServiceClient,
    C: Clock + Send + Sync,
{
    /// Creates a new hire-and-execute service.
    #[must_use]
    pub fn new(
        marketplace: ContractEndpoint,
        submitter: Arc<S>,
        watcher: Arc<W>,
        client: Arc<B>,
        clock: Arc<C>,
    ) -> Self {
        let resolver = TokenMapResolver::new(Arc::clone(&client));
        Self {
            marketplace,
            submitter,
            watcher,
            client,
            resolver,
            clock,
        }
    }

    /// Starts a new workflow instance in the `Idle` phase.
    ///
    /// The per-call price must be known up front; handles from earlier
    /// instances are never reused because every instance starts empty.
    #[must_use]
    pub fn start(
        &self,
        token_id: TokenId,
        price: PricePerCall,
        caller: CallerIdentity,
    ) -> HireWorkflow {
        HireWorkflow::start(token_id, price, caller, &*self.clock)
    }

    /// Submits the payable hire intent and waits for its confirmation.
    ///
    /// Submitter rejection or failure, a lost watch, and a reverted
    /// receipt all return the workflow to `Idle` with the query text
    /// preserved for a retry. On confirmation the workflow moves to
    /// `Executing`.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError`] when the workflow is not in `Idle`.
    pub async fn run_hire(
        &self,
        workflow: &mut HireWorkflow,
        query: HireQuery,
    ) -> Result<(), TransitionError> {
        workflow.apply(HireEvent::HireRequested { query }, &*self.clock)?;
        let intent = workflow.hire_intent(self.marketplace.clone());
        let handle = match self.submitter.submit(&intent).await {
            Ok(handle) => handle,
            Err(err) => {
                warn!(workflow = %workflow.id(), %err, "hire submission failed");
                return workflow.apply(HireEvent::HireFailed(err.into()), &*self.clock);
            }
        };
        workflow.apply(HireEvent::HireSubmitted(handle.clone()), &*self.clock)?;
        info!(workflow = %workflow.id(), %handle, "hire submitted");
        match self.watcher.watch(&handle).await {
            Ok(receipt) => workflow.apply(HireEvent::HireConfirmed(receipt), &*self.clock),
            Err(err) => {
                warn!(workflow = %workflow.id(), %err, "hire confirmation failed");
                workflow.apply(HireEvent::HireFailed(err.into()), &*self.clock)
            }
        }
    }

    /// Issues the single backend execution call for the paid hire.
    ///
    /// The agent identifier is resolved from the cached token map (with
    /// one refresh on a miss); the call is not retried automatically, and
    /// the workflow settles to `Done` carrying either the decoded payload
    /// or the structured failure.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError`] when the workflow is not in
    /// `Executing`.
    pub async fn run_execution(&self, workflow: &mut HireWorkflow) -> Result<(), TransitionError> {
        if workflow.phase() != HirePhase::Executing {
            return Err(TransitionError::new(
                workflow.phase().as_str(),
                "execution_settled",
            ));
        }
        let Some(request) = workflow.execution_request() else {
            return Err(TransitionError::new(
                workflow.phase().as_str(),
                "execution_settled",
            ));
        };
        let outcome = match self.resolver.resolve(workflow.token_id()).await {
            Ok(agent_id) => match self.client.execute(&agent_id, &request).await {
                Ok(data) => {
                    info!(workflow = %workflow.id(), %agent_id, "execution completed");
                    ExecutionOutcome::Completed { data }
                }
                Err(err) => {
                    warn!(workflow = %workflow.id(), %agent_id, %err, "execution failed");
                    ExecutionOutcome::Failed { error: err.into() }
                }
            },
            Err(err) => {
                warn!(workflow = %workflow.id(), %err, "agent resolution failed");
                ExecutionOutcome::Failed { error: err.into() }
            }
        };
        workflow.apply(HireEvent::ExecutionSettled(outcome), &*self.clock)
    }

    /// Discards the instance's state, returning it to `Idle`.
    ///
    /// The query, the result, and every transient field are cleared.
    /// Already-submitted transactions and already-sent backend calls are
    /// not retracted; any late results must be discarded by the caller.
    ///
    /// # Errors
    ///
    /// Resetting is total; this never fails in practice.
    pub fn reset(&self, workflow: &mut HireWorkflow) -> Result<(), TransitionError> {
        workflow.apply(HireEvent::Reset, &*self.clock)
    }

    /// Runs one step from the workflow's current phase.
    ///
    /// `Idle` waits for a query via [`Self::run_hire`] and `Done` is
    /// terminal, so both are no-ops here.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError`] when a transient phase has no runnable
    /// step.
    pub async fn run_pending(&self, workflow: &mut HireWorkflow) -> Result<(), TransitionError> {
        match workflow.phase() {
            HirePhase::Executing => self.run_execution(workflow).await,
            HirePhase::Idle | HirePhase::Done => Ok(()),
            phase @ (HirePhase::Tx | HirePhase::Confirming) => {
                Err(TransitionError::new(phase.as_str(), "execution_settled"))
            }
        }
    }
}
