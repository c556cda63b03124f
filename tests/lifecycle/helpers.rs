//! Shared fixtures for workflow integration tests.

use std::sync::Arc;

use agora::agent_service::adapters::memory::ScriptedAgentService;
use agora::ledger::adapters::memory::ScriptedLedger;
use agora::ledger::domain::{
    CallerIdentity, ContractEndpoint, EventRecord, PricePerCall, Receipt, TransactionHandle,
};
use agora::lifecycle::domain::{AgentDraft, AgentName, HireQuery};
use agora::lifecycle::services::{CreateAndListService, HireAndExecuteService};
use mockable::DefaultClock;

/// Create-and-list service wired to scripted doubles.
pub type TestCreateService =
    CreateAndListService<ScriptedLedger, ScriptedLedger, ScriptedAgentService, DefaultClock>;

/// Hire-and-execute service wired to scripted doubles.
pub type TestHireService =
    HireAndExecuteService<ScriptedLedger, ScriptedLedger, ScriptedAgentService, DefaultClock>;

/// Scripted collaborators plus the services under test.
pub struct Harness {
    /// Scripted ledger shared by submitter and watcher roles.
    pub ledger: ScriptedLedger,
    /// Scripted agent service.
    pub agent_service: ScriptedAgentService,
    /// Create-and-list service under test.
    pub create: TestCreateService,
    /// Hire-and-execute service under test.
    pub hire: TestHireService,
}

/// Builds a harness around fresh scripted doubles.
pub fn harness() -> Harness {
    let ledger = ScriptedLedger::new();
    let agent_service = ScriptedAgentService::new();
    let ledger_arc = Arc::new(ledger.clone());
    let service_arc = Arc::new(agent_service.clone());
    let create = CreateAndListService::new(
        marketplace(),
        Arc::clone(&ledger_arc),
        Arc::clone(&ledger_arc),
        Arc::clone(&service_arc),
        Arc::new(DefaultClock),
    );
    let hire = HireAndExecuteService::new(
        marketplace(),
        Arc::clone(&ledger_arc),
        ledger_arc,
        service_arc,
        Arc::new(DefaultClock),
    );
    Harness {
        ledger,
        agent_service,
        create,
        hire,
    }
}

/// Marketplace contract endpoint used throughout the tests.
pub fn marketplace() -> ContractEndpoint {
    ContractEndpoint::new("0xmarketplace").expect("valid endpoint")
}

/// Draft for a small portfolio-analysis agent.
pub fn draft() -> AgentDraft {
    AgentDraft::new(
        AgentName::new("Portfolio Analyzer").expect("valid name"),
        price(),
    )
    .with_description("Analyzes portfolio risk")
    .with_system_prompt("You analyze portfolios.")
    .with_capabilities(vec!["risk".to_owned()])
    .with_token_uri("ipfs://agent-meta")
    .with_x402_enabled(true)
}

/// Connected caller identity.
pub fn caller() -> CallerIdentity {
    CallerIdentity::new("0xc0ffee").expect("valid caller")
}

/// Standard per-call price.
pub fn price() -> PricePerCall {
    PricePerCall::new("0.001").expect("valid price")
}

/// Standard hire query.
pub fn query() -> HireQuery {
    HireQuery::new("Analyze 60% ETH / 40% USDC").expect("valid query")
}

/// Validated handle fixture.
pub fn handle(value: &str) -> TransactionHandle {
    TransactionHandle::new(value).expect("valid handle")
}

/// Successful receipt carrying a `Transfer` event with the given token.
pub fn mint_receipt(tx: &str, token: u64) -> Receipt {
    let args = serde_json::json!({"tokenId": token})
        .as_object()
        .cloned()
        .unwrap_or_default();
    Receipt::succeeded(handle(tx), vec![EventRecord::new("Transfer", args)])
}

/// Successful receipt with no decodable events.
pub fn empty_receipt(tx: &str) -> Receipt {
    Receipt::succeeded(handle(tx), Vec::new())
}
