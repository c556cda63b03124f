//! Effect runner for the create-and-list workflow.

use crate::agent_service::{
    domain::RegistrationOutcome,
    ports::{AgentServiceClient, AgentServiceError},
};
use crate::ledger::{
    domain::{CallerIdentity, ContractEndpoint, TransactionHandle},
    ports::{ConfirmationWatcher, TransactionSubmitter},
};
use crate::lifecycle::domain::{
    AgentDraft, CreateEvent, CreatePhase, CreateWorkflow, ErrorKind, TransitionError,
    WorkflowError,
};
use mockable::Clock;
use std::sync::Arc;
use tracing::{info, warn};

/// Warning recorded when the registration call times out.
///
/// A timeout is an unknown outcome, not a definite failure, so the
/// workflow proceeds and only surfaces this message.
pub const REGISTRATION_TIMEOUT_WARNING: &str =
    "Backend registration timed out; continuing without it";

/// Create-and-list workflow orchestration service.
///
/// Sequences mint, registration, and listing strictly: each step fully
/// resolves before the next begins, and at most one ledger handle is
/// live at any point. All four collaborators are injected capabilities;
/// nothing is read from ambient global state.
#[derive(Clone)]
pub struct CreateAndListService<S, W, B, C>
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
    clock: Arc<C>,
}

impl<S, W, B, C> CreateAndListService<S, W, B, C>
where
    S: TransactionSubmitter,
    W: ConfirmationWatcher,
    B: AgentServiceClient,
    C: Clock + Send + Sync,
{
    /// Creates a new create-and-list service.
    #[must_use]
    pub const fn new(
        marketplace: ContractEndpoint,
        submitter: Arc<S>,
        watcher: Arc<W>,
        client: Arc<B>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            marketplace,
            submitter,
            watcher,
            client,
            clock,
        }
    }

    /// Starts a new workflow instance in the `Form` phase.
    #[must_use]
    pub fn start(&self, draft: AgentDraft, caller: CallerIdentity) -> CreateWorkflow {
        CreateWorkflow::start(draft, caller, &*self.clock)
    }

    /// Submits the mint intent and waits for its confirmation.
    ///
    /// Submission or confirmation failure returns the workflow to `Form`
    /// with the draft intact; a reverted receipt does the same carrying
    /// the normalised revert reason. A confirmed receipt that yields no
    /// token identifier leaves the workflow in `Minting` (see
    /// [`CreateWorkflow::decode_pending`]).
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError`] when the workflow is not in `Form`.
    pub async fn run_mint(&self, workflow: &mut CreateWorkflow) -> Result<(), TransitionError> {
        workflow.apply(CreateEvent::MintRequested, &*self.clock)?;
        let intent = workflow.draft().mint_intent(self.marketplace.clone());
        let handle = match self.submitter.submit(&intent).await {
            Ok(handle) => handle,
            Err(err) => {
                warn!(workflow = %workflow.id(), %err, "mint submission failed");
                return workflow.apply(CreateEvent::MintFailed(err.into()), &*self.clock);
            }
        };
        workflow.apply(CreateEvent::MintSubmitted(handle.clone()), &*self.clock)?;
        info!(workflow = %workflow.id(), %handle, "mint submitted");
        self.confirm_mint(workflow, &handle).await
    }

    /// Watches the live mint handle again.
    ///
    /// Used when a confirmed receipt parsed without yielding a token
    /// identifier: the same handle is observed once more to pick up the
    /// identifier once the ledger exposes it.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError`] when no mint confirmation is pending.
    pub async fn resume_confirmation(
        &self,
        workflow: &mut CreateWorkflow,
    ) -> Result<(), TransitionError> {
        let Some(handle) = workflow.last_handle().cloned() else {
            return Err(TransitionError::new(
                workflow.phase().as_str(),
                "mint_confirmed",
            ));
        };
        self.confirm_mint(workflow, &handle).await
    }

    async fn confirm_mint(
        &self,
        workflow: &mut CreateWorkflow,
        handle: &TransactionHandle,
    ) -> Result<(), TransitionError> {
        match self.watcher.watch(handle).await {
            Ok(receipt) => {
                workflow.apply(CreateEvent::MintConfirmed(receipt), &*self.clock)?;
                if let Some(token) = workflow.token_id() {
                    info!(workflow = %workflow.id(), %token, "mint confirmed");
                }
                Ok(())
            }
            Err(err) => {
                warn!(workflow = %workflow.id(), %err, "mint confirmation failed");
                workflow.apply(CreateEvent::MintFailed(err.into()), &*self.clock)
            }
        }
    }

    /// Issues the single registration call for the minted agent.
    ///
    /// Registration failure never blocks progression: a server-side
    /// rejection, a timeout, or a transport fault is recorded as the
    /// workflow's registration warning and the workflow still moves to
    /// `Listing`.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError`] when the workflow is not in
    /// `Registering`.
    pub async fn run_registration(
        &self,
        workflow: &mut CreateWorkflow,
    ) -> Result<(), TransitionError> {
        if workflow.phase() != CreatePhase::Registering {
            return Err(TransitionError::new(
                workflow.phase().as_str(),
                "registration_settled",
            ));
        }
        let Some(request) = workflow.registration_request() else {
            return Err(TransitionError::new(
                workflow.phase().as_str(),
                "registration_settled",
            ));
        };
        let warning = match self.client.register(&request).await {
            Ok(RegistrationOutcome::Accepted) => {
                info!(workflow = %workflow.id(), agent_id = %request.agent_id, "agent registered");
                None
            }
            Ok(RegistrationOutcome::Rejected { message }) => {
                warn!(workflow = %workflow.id(), %message, "registration rejected");
                Some(WorkflowError::new(ErrorKind::RegistrationWarning, message))
            }
            Err(AgentServiceError::Timeout(_)) => {
                warn!(workflow = %workflow.id(), "registration timed out");
                Some(WorkflowError::new(
                    ErrorKind::Timeout,
                    REGISTRATION_TIMEOUT_WARNING,
                ))
            }
            Err(err) => {
                warn!(workflow = %workflow.id(), %err, "registration failed");
                Some(WorkflowError::new(
                    ErrorKind::RegistrationWarning,
                    err.to_string(),
                ))
            }
        };
        workflow.apply(CreateEvent::RegistrationSettled { warning }, &*self.clock)
    }

    /// Submits the list intent and waits for its confirmation.
    ///
    /// Failure keeps the workflow parked in `Listing` with the error set;
    /// calling again retries with the same token identifier and never
    /// re-submits a mint intent.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError`] when the workflow is not in `Listing`
    /// or a handle is still live.
    pub async fn run_listing(&self, workflow: &mut CreateWorkflow) -> Result<(), TransitionError> {
        if workflow.phase() != CreatePhase::Listing || workflow.last_handle().is_some() {
            return Err(TransitionError::new(
                workflow.phase().as_str(),
                "list_submitted",
            ));
        }
        let Some(intent) = workflow.list_intent(self.marketplace.clone()) else {
            return Err(TransitionError::new(
                workflow.phase().as_str(),
                "list_submitted",
            ));
        };
        let handle = match self.submitter.submit(&intent).await {
            Ok(handle) => handle,
            Err(err) => {
                warn!(workflow = %workflow.id(), %err, "list submission failed");
                return workflow.apply(CreateEvent::ListFailed(err.into()), &*self.clock);
            }
        };
        workflow.apply(CreateEvent::ListSubmitted(handle.clone()), &*self.clock)?;
        info!(workflow = %workflow.id(), %handle, "listing submitted");
        match self.watcher.watch(&handle).await {
            Ok(receipt) => {
                workflow.apply(CreateEvent::ListConfirmed(receipt), &*self.clock)?;
                if workflow.phase() == CreatePhase::Done {
                    info!(workflow = %workflow.id(), "agent listed");
                }
                Ok(())
            }
            Err(err) => {
                warn!(workflow = %workflow.id(), %err, "list confirmation failed");
                workflow.apply(CreateEvent::ListFailed(err.into()), &*self.clock)
            }
        }
    }

    /// Finishes the workflow without listing.
    ///
    /// The minted token identifier stays usable; the agent simply is not
    /// offered on the marketplace.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError`] when the workflow is not in `Listing`.
    pub fn skip_listing(&self, workflow: &mut CreateWorkflow) -> Result<(), TransitionError> {
        workflow.apply(CreateEvent::ListingSkipped, &*self.clock)
    }

    /// Discards the instance's progress, returning it to `Form`.
    ///
    /// Already-submitted transactions and already-sent backend calls are
    /// not retracted; any late results must be discarded by the caller.
    ///
    /// # Errors
    ///
    /// Resetting is total; this never fails in practice.
    pub fn reset(&self, workflow: &mut CreateWorkflow) -> Result<(), TransitionError> {
        workflow.apply(CreateEvent::Reset, &*self.clock)
    }

    /// Runs one step from the workflow's current phase.
    ///
    /// `Done` is a no-op, so a caller may loop on `advance` until the
    /// phase stops changing and then inspect the state for parked errors.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError`] when the current phase has no runnable
    /// step (for example `Minting` with no pending confirmation).
    pub async fn advance(&self, workflow: &mut CreateWorkflow) -> Result<(), TransitionError> {
        match workflow.phase() {
            CreatePhase::Form => self.run_mint(workflow).await,
            CreatePhase::Minting => self.resume_confirmation(workflow).await,
            CreatePhase::Registering => self.run_registration(workflow).await,
            CreatePhase::Listing => self.run_listing(workflow).await,
            CreatePhase::Done => Ok(()),
        }
    }
}
