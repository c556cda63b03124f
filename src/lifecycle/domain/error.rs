//! Error types for workflow state and transitions.

use crate::agent_service::{ports::AgentServiceError, services::TokenResolutionError};
use crate::ledger::ports::{SubmitError, WatchError};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors returned while constructing lifecycle domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LifecycleDomainError {
    /// The agent name is empty after trimming.
    #[error("agent name must not be empty")]
    EmptyAgentName,

    /// The hire query is empty after trimming.
    #[error("hire query must not be empty")]
    EmptyHireQuery,
}

/// Classification of a workflow failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The signer declined the write; always recoverable.
    RejectedByUser,
    /// The write could not reach the ledger.
    Submission,
    /// The ledger link was lost while watching a handle.
    Watch,
    /// The transaction finalized but reverted.
    ChainRevert,
    /// A backend call exceeded its bound; the outcome is unknown.
    Timeout,
    /// The backend rejected a registration; never blocks progression.
    RegistrationWarning,
    /// No agent identifier could be resolved for a token, even after a
    /// map refresh; fatal for that call only.
    UnknownTokenId,
    /// The backend reported that an execution failed.
    ExecutionFailed,
}

impl ErrorKind {
    /// Returns the canonical presentation label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RejectedByUser => "rejected_by_user",
            Self::Submission => "submission",
            Self::Watch => "watch",
            Self::ChainRevert => "chain_revert",
            Self::Timeout => "timeout",
            Self::RegistrationWarning => "registration_warning",
            Self::UnknownTokenId => "unknown_token_id",
            Self::ExecutionFailed => "execution_failed",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured workflow failure surfaced to the presentation layer.
///
/// Failures are folded into workflow state as data (a kind plus a
/// human-readable message), never raised as uncaught faults.
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
#[error("{kind}: {message}")]
pub struct WorkflowError {
    kind: ErrorKind,
    message: String,
}

impl WorkflowError {
    /// Creates a workflow error from a kind and message.
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Returns the failure classification.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Creates a chain-revert error from a normalised revert reason.
    #[must_use]
    pub fn chain_revert(reason: impl Into<String>) -> Self {
        Self::new(ErrorKind::ChainRevert, reason)
    }
}

impl From<SubmitError> for WorkflowError {
    fn from(err: SubmitError) -> Self {
        match &err {
            SubmitError::RejectedByUser => Self::new(ErrorKind::RejectedByUser, err.to_string()),
            SubmitError::Submission(_) => Self::new(ErrorKind::Submission, err.to_string()),
        }
    }
}

impl From<WatchError> for WorkflowError {
    fn from(err: WatchError) -> Self {
        Self::new(ErrorKind::Watch, err.to_string())
    }
}

impl From<AgentServiceError> for WorkflowError {
    fn from(err: AgentServiceError) -> Self {
        match &err {
            AgentServiceError::Timeout(_) => Self::new(ErrorKind::Timeout, err.to_string()),
            AgentServiceError::Transport(_) | AgentServiceError::Rejected(_) => {
                Self::new(ErrorKind::ExecutionFailed, err.to_string())
            }
        }
    }
}

impl From<TokenResolutionError> for WorkflowError {
    fn from(err: TokenResolutionError) -> Self {
        match err {
            TokenResolutionError::UnknownTokenId(_) => {
                Self::new(ErrorKind::UnknownTokenId, err.to_string())
            }
            TokenResolutionError::Service(service_err) => service_err.into(),
        }
    }
}

/// Error returned when an event is applied in a phase that does not
/// accept it.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("event '{event}' is not valid in phase '{phase}'")]
pub struct TransitionError {
    phase: &'static str,
    event: &'static str,
}

impl TransitionError {
    /// Creates a transition error for the given phase and event labels.
    #[must_use]
    pub const fn new(phase: &'static str, event: &'static str) -> Self {
        Self { phase, event }
    }

    /// Returns the phase the workflow was in.
    #[must_use]
    pub const fn phase(&self) -> &'static str {
        self.phase
    }

    /// Returns the rejected event label.
    #[must_use]
    pub const fn event(&self) -> &'static str {
        self.event
    }
}
