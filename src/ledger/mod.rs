//! Ledger interaction for Agora.
//!
//! This module owns everything that touches the ledger: write intents,
//! pending transaction handles, finalized receipts, and the decoding of
//! emitted events into domain identifiers. The module follows hexagonal
//! architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]

pub mod adapters;
pub mod domain;
pub mod ports;

#[cfg(test)]
mod tests;
