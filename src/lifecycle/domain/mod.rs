//! Domain model for workflow lifecycle state.
//!
//! Workflow aggregates are mutated only through their `apply` transition
//! functions; every external outcome reaches the state machine as an
//! explicit event, and phase gating enforces the one-live-handle
//! discipline without any locking.

mod create;
mod draft;
mod error;
mod hire;
mod ids;

pub use create::{CreateEvent, CreatePhase, CreateWorkflow, MINT_EVENT_NAMES};
pub use draft::{AgentDraft, AgentName, HireQuery};
pub use error::{ErrorKind, LifecycleDomainError, TransitionError, WorkflowError};
pub use hire::{ExecutionOutcome, HireEvent, HirePhase, HireWorkflow};
pub use ids::WorkflowId;
