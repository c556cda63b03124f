//! Agora: lifecycle orchestration for a tokenized-agent marketplace.
//!
//! This crate sequences the external operations behind two user-facing
//! flows as resumable state machines: minting, registering, and listing
//! an AI agent, and paying for and invoking one. Ledger writes,
//! confirmation watches, and agent-service HTTP calls are all fallible
//! collaborators reached through ports; the lifecycle services perform
//! exactly one external call per phase and fold every outcome back into
//! explicit workflow state.
//!
//! # Architecture
//!
//! Agora follows hexagonal architecture principles:
//!
//! - **Domain**: Pure state machines and value objects with no
//!   infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for the ledger and the agent
//!   service
//! - **Adapters**: Concrete implementations of ports (HTTP, scripted
//!   in-memory doubles)
//!
//! # Modules
//!
//! - [`ledger`]: Write intents, handles, receipts, and event decoding
//! - [`agent_service`]: Registration, execution, and token-map
//!   resolution against the off-chain agent service
//! - [`lifecycle`]: The create-and-list and hire-and-execute workflow
//!   state machines and their effect runners

pub mod agent_service;
pub mod ledger;
pub mod lifecycle;
