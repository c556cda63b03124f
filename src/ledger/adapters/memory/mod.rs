//! In-memory scripted adapters for ledger ports.

mod scripted_ledger;

pub use scripted_ledger::ScriptedLedger;
