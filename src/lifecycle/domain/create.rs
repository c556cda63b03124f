//! Create-and-list workflow aggregate.

use super::{AgentDraft, TransitionError, WorkflowError, WorkflowId};
use crate::agent_service::domain::{AgentId, RegistrationRequest};
use crate::ledger::domain::{
    CallerIdentity, ContractEndpoint, Receipt, TokenId, TransactionHandle, TransactionIntent,
    decode_token_id,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Event names that may carry the minted token identifier.
pub const MINT_EVENT_NAMES: [&str; 2] = ["Transfer", "AgentMinted"];

/// Create-and-list lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreatePhase {
    /// Draft fields are being collected; no external calls yet.
    Form,
    /// The mint intent is being submitted and confirmed.
    Minting,
    /// The agent's executable identity is being registered.
    Registering,
    /// The list intent is being submitted and confirmed.
    Listing,
    /// The workflow completed; only a full reset leaves this phase.
    Done,
}

impl CreatePhase {
    /// Returns the canonical phase label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Form => "form",
            Self::Minting => "minting",
            Self::Registering => "registering",
            Self::Listing => "listing",
            Self::Done => "done",
        }
    }
}

/// External outcome fed into the create-and-list state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateEvent {
    /// The user asked to mint the drafted agent.
    MintRequested,
    /// The mint intent was dispatched and produced a handle.
    MintSubmitted(TransactionHandle),
    /// Mint submission or confirmation failed.
    MintFailed(WorkflowError),
    /// The mint transaction finalized.
    MintConfirmed(Receipt),
    /// The registration call settled, possibly with a warning.
    RegistrationSettled {
        /// Non-fatal registration failure, when one occurred.
        warning: Option<WorkflowError>,
    },
    /// The list intent was dispatched and produced a handle.
    ListSubmitted(TransactionHandle),
    /// List submission or confirmation failed.
    ListFailed(WorkflowError),
    /// The list transaction finalized.
    ListConfirmed(Receipt),
    /// The user chose to finish without listing.
    ListingSkipped,
    /// The user discarded the instance's progress.
    Reset,
}

impl CreateEvent {
    /// Returns the canonical event label.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::MintRequested => "mint_requested",
            Self::MintSubmitted(_) => "mint_submitted",
            Self::MintFailed(_) => "mint_failed",
            Self::MintConfirmed(_) => "mint_confirmed",
            Self::RegistrationSettled { .. } => "registration_settled",
            Self::ListSubmitted(_) => "list_submitted",
            Self::ListFailed(_) => "list_failed",
            Self::ListConfirmed(_) => "list_confirmed",
            Self::ListingSkipped => "listing_skipped",
            Self::Reset => "reset",
        }
    }
}

/// Create-and-list workflow aggregate root.
///
/// Holds the current phase, the one live handle, the last receipt, the
/// derived token identifier, and the last structured error. Mutated only
/// through [`CreateWorkflow::apply`]; the effect runner performs the one
/// external call each phase requires and feeds the outcome back in as an
/// event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateWorkflow {
    id: WorkflowId,
    phase: CreatePhase,
    draft: AgentDraft,
    caller: CallerIdentity,
    last_handle: Option<TransactionHandle>,
    last_receipt: Option<Receipt>,
    token_id: Option<TokenId>,
    registration_warning: Option<WorkflowError>,
    last_error: Option<WorkflowError>,
    listed: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CreateWorkflow {
    /// Starts a new instance in the `Form` phase.
    ///
    /// Starting requires a validated draft (non-empty name) and a
    /// connected caller identity; both are enforced by their types.
    #[must_use]
    pub fn start(draft: AgentDraft, caller: CallerIdentity, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: WorkflowId::new(),
            phase: CreatePhase::Form,
            draft,
            caller,
            last_handle: None,
            last_receipt: None,
            token_id: None,
            registration_warning: None,
            last_error: None,
            listed: false,
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
    pub fn apply(&mut self, event: CreateEvent, clock: &impl Clock) -> Result<(), TransitionError> {
        let event_name = event.name();
        match (self.phase, event) {
            (CreatePhase::Form, CreateEvent::MintRequested) => self.on_mint_requested(),
            (CreatePhase::Minting, CreateEvent::MintSubmitted(handle)) => {
                self.on_submitted(handle, event_name)?;
            }
            (CreatePhase::Minting, CreateEvent::MintFailed(error)) => self.on_mint_failed(error),
            (CreatePhase::Minting, CreateEvent::MintConfirmed(receipt)) => {
                self.on_mint_confirmed(receipt);
            }
            (CreatePhase::Registering, CreateEvent::RegistrationSettled { warning }) => {
                self.on_registration_settled(warning);
            }
            (CreatePhase::Listing, CreateEvent::ListSubmitted(handle)) => {
                self.on_submitted(handle, event_name)?;
            }
            (CreatePhase::Listing, CreateEvent::ListFailed(error)) => self.on_list_failed(error),
            (CreatePhase::Listing, CreateEvent::ListConfirmed(receipt)) => {
                self.on_list_confirmed(receipt);
            }
            (CreatePhase::Listing, CreateEvent::ListingSkipped) => self.on_listing_skipped(),
            (_, CreateEvent::Reset) => self.on_reset(),
            (phase, _) => return Err(TransitionError::new(phase.as_str(), event_name)),
        }
        self.touch(clock);
        Ok(())
    }

    fn on_mint_requested(&mut self) {
        self.last_error = None;
        self.phase = CreatePhase::Minting;
    }

    fn on_submitted(
        &mut self,
        handle: TransactionHandle,
        event_name: &'static str,
    ) -> Result<(), TransitionError> {
        if self.last_handle.is_some() {
            return Err(TransitionError::new(self.phase.as_str(), event_name));
        }
        self.last_error = None;
        self.last_handle = Some(handle);
        Ok(())
    }

    fn on_mint_failed(&mut self, error: WorkflowError) {
        self.last_handle = None;
        self.last_receipt = None;
        self.last_error = Some(error);
        self.phase = CreatePhase::Form;
    }

    fn on_mint_confirmed(&mut self, receipt: Receipt) {
        if let Some(reason) = receipt.failure_reason() {
            let error = WorkflowError::chain_revert(reason.to_owned());
            self.on_mint_failed(error);
            return;
        }
        if self.token_id.is_none() {
            self.token_id = decode_token_id(&receipt, &MINT_EVENT_NAMES);
        }
        self.last_receipt = Some(receipt);
        if self.token_id.is_some() {
            self.last_handle = None;
            self.last_error = None;
            self.phase = CreatePhase::Registering;
        }
        // Otherwise the receipt parsed but no identifier is available
        // yet: stay in Minting with the handle live for a re-watch.
    }

    fn on_registration_settled(&mut self, warning: Option<WorkflowError>) {
        self.registration_warning = warning;
        self.phase = CreatePhase::Listing;
    }

    fn on_list_failed(&mut self, error: WorkflowError) {
        self.last_handle = None;
        self.last_error = Some(error);
    }

    fn on_list_confirmed(&mut self, receipt: Receipt) {
        if let Some(reason) = receipt.failure_reason() {
            let error = WorkflowError::chain_revert(reason.to_owned());
            self.on_list_failed(error);
            return;
        }
        self.last_handle = None;
        self.last_error = None;
        self.last_receipt = Some(receipt);
        self.listed = true;
        self.phase = CreatePhase::Done;
    }

    fn on_listing_skipped(&mut self) {
        self.last_handle = None;
        self.last_error = None;
        self.listed = false;
        self.phase = CreatePhase::Done;
    }

    fn on_reset(&mut self) {
        self.phase = CreatePhase::Form;
        self.last_handle = None;
        self.last_receipt = None;
        self.token_id = None;
        self.registration_warning = None;
        self.last_error = None;
        self.listed = false;
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
    pub const fn phase(&self) -> CreatePhase {
        self.phase
    }

    /// Returns the draft fields.
    #[must_use]
    pub const fn draft(&self) -> &AgentDraft {
        &self.draft
    }

    /// Returns the caller identity.
    #[must_use]
    pub const fn caller(&self) -> &CallerIdentity {
        &self.caller
    }

    /// Returns the live transaction handle, if any.
    #[must_use]
    pub const fn last_handle(&self) -> Option<&TransactionHandle> {
        self.last_handle.as_ref()
    }

    /// Returns the most recent receipt, if any.
    #[must_use]
    pub const fn last_receipt(&self) -> Option<&Receipt> {
        self.last_receipt.as_ref()
    }

    /// Returns the derived token identifier, once minted.
    #[must_use]
    pub const fn token_id(&self) -> Option<TokenId> {
        self.token_id
    }

    /// Returns the non-fatal registration warning, if one was recorded.
    #[must_use]
    pub const fn registration_warning(&self) -> Option<&WorkflowError> {
        self.registration_warning.as_ref()
    }

    /// Returns the last structured error, if any.
    #[must_use]
    pub const fn last_error(&self) -> Option<&WorkflowError> {
        self.last_error.as_ref()
    }

    /// Returns whether the agent was listed before completion.
    #[must_use]
    pub const fn is_listed(&self) -> bool {
        self.listed
    }

    /// Returns whether a mint receipt parsed without yielding a token
    /// identifier yet.
    #[must_use]
    pub const fn decode_pending(&self) -> bool {
        matches!(self.phase, CreatePhase::Minting)
            && self.last_receipt.is_some()
            && self.token_id.is_none()
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

    /// Returns the deterministic agent identifier, once minted.
    #[must_use]
    pub fn agent_id(&self) -> Option<AgentId> {
        self.token_id
            .map(|token| AgentId::derive(self.draft.name().as_str(), token))
    }

    /// Builds the registration request for the minted token.
    #[must_use]
    pub fn registration_request(&self) -> Option<RegistrationRequest> {
        self.token_id
            .map(|token| self.draft.registration_request(token))
    }

    /// Builds the list intent re-using the existing token identifier.
    #[must_use]
    pub fn list_intent(&self, endpoint: ContractEndpoint) -> Option<TransactionIntent> {
        self.token_id.map(|token| {
            TransactionIntent::list(endpoint, token, self.draft.price_per_call().clone())
        })
    }
}
