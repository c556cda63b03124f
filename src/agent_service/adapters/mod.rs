//! Adapter implementations of the agent service port.

pub mod http;
pub mod memory;
