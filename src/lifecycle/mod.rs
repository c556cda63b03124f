//! Workflow lifecycle orchestration for Agora.
//!
//! This is the core of the crate: the state machines that sequence the
//! heterogeneous external calls of the two user-facing flows,
//! **create-and-list** (mint, register, list) and **hire-and-execute**
//! (pay, confirm, invoke), tolerating partial failure at every step and
//! exposing enough state for a caller to render progress and recover.
//!
//! The machines are pure transition functions over explicit events; the
//! services in [`services`] are the effect runners that perform the one
//! external call each phase requires and feed the result back in.
//!
//! - Domain types in [`domain`]
//! - Orchestration services in [`services`]

pub mod domain;
pub mod services;

#[cfg(test)]
mod tests;
