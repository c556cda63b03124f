//! Off-chain agent service integration for Agora.
//!
//! This module covers the backend that holds each agent's executable
//! identity: registration after mint, pay-per-call execution, and the
//! token-to-agent identifier map. The module follows hexagonal
//! architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
