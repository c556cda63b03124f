//! Domain model for agent registration and execution.
//!
//! These types mirror the agent service's JSON wire shapes; the
//! loosely-typed `data` payload of an execution response is decided once
//! at the boundary into [`ExecutionData`] and consumed as a tagged union
//! thereafter.

mod agent_id;
mod execution;
mod registration;

pub use agent_id::AgentId;
pub use execution::{ConsensusProof, ExecutionData, ExecutionRequest};
pub use registration::{RegistrationOutcome, RegistrationRequest};
