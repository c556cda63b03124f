//! Port contracts for the agent service.

mod client;

pub use client::{AgentServiceClient, AgentServiceError, AgentServiceResult};
