//! Orchestration services for the agent service context.

mod token_map;

pub use token_map::{TokenMapResolver, TokenResolutionError, TokenResolutionResult};
