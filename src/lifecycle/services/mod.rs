//! Effect-runner services for the workflow state machines.
//!
//! Each service performs the single external call its workflow's current
//! phase requires and feeds the outcome back into the state machine as
//! an event. External failures are folded into workflow state; only a
//! phase-gating violation surfaces as an error.

mod create;
mod hire;

pub use create::{CreateAndListService, REGISTRATION_TIMEOUT_WARNING};
pub use hire::HireAndExecuteService;
