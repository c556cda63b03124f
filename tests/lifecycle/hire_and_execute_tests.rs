//! In-memory integration tests for the hire-and-execute workflow.

use agora::agent_service::domain::{AgentId, ConsensusProof, ExecutionData};
use agora::agent_service::ports::AgentServiceError;
use agora::ledger::domain::{Receipt, TokenId};
use agora::ledger::ports::SubmitError;
use agora::lifecycle::domain::{ErrorKind, ExecutionOutcome, HirePhase, WorkflowError};
use rstest::{fixture, rstest};
use std::time::Duration;

use super::helpers::{Harness, caller, empty_receipt, handle, harness, price, query};

#[fixture]
fn fixture() -> Harness {
    harness()
}

fn agent_id() -> AgentId {
    AgentId::derive("Portfolio Analyzer", TokenId::new(7))
}

/// Scripts a confirmed hire payment and a resolvable agent identifier.
fn script_paid_hire(fixture: &Harness) {
    fixture.ledger.enqueue_submission(Ok(handle("0xhire")));
    fixture.ledger.enqueue_receipt(Ok(empty_receipt("0xhire")));
    fixture
        .agent_service
        .set_token_map([(TokenId::new(7), agent_id())]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn paid_hire_executes_and_exposes_structured_result(fixture: Harness) {
    script_paid_hire(&fixture);
    fixture
        .agent_service
        .enqueue_execution(Ok(ExecutionData::Structured {
            result: "Risk 7.2/10".to_owned(),
            hedera_proof: Some(ConsensusProof {
                hcs_messages: vec!["0.0.123@1".to_owned(), "0.0.123@2".to_owned()],
            }),
        }));

    let mut workflow = fixture.hire.start(TokenId::new(7), price(), caller());
    fixture
        .hire
        .run_hire(&mut workflow, query())
        .await
        .expect("hire should be accepted");
    assert_eq!(workflow.phase(), HirePhase::Executing);
    fixture
        .hire
        .run_execution(&mut workflow)
        .await
        .expect("execution should be accepted");

    assert_eq!(workflow.phase(), HirePhase::Done);
    assert_eq!(workflow.result(), Some("Risk 7.2/10"));
    match workflow.outcome() {
        Some(ExecutionOutcome::Completed { data }) => {
            let proof = data.proof().expect("proof should be present");
            assert_eq!(
                proof.hcs_messages,
                vec!["0.0.123@1".to_owned(), "0.0.123@2".to_owned()]
            );
        }
        other => panic!("expected completed outcome, got {other:?}"),
    }

    // The invocation carried the resolved identifier, the query, and
    // the caller's identity.
    let executions = fixture.agent_service.executions();
    assert_eq!(executions.len(), 1);
    if let Some((executed_id, request)) = executions.first() {
        assert_eq!(executed_id, &agent_id());
        assert_eq!(request.query, "Analyze 60% ETH / 40% USDC");
        assert_eq!(request.wallet_address.as_deref(), Some("0xc0ffee"));
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn plain_execution_payload_is_exposed_verbatim(fixture: Harness) {
    script_paid_hire(&fixture);
    fixture
        .agent_service
        .enqueue_execution(Ok(ExecutionData::Plain("all clear".to_owned())));

    let mut workflow = fixture.hire.start(TokenId::new(7), price(), caller());
    fixture
        .hire
        .run_hire(&mut workflow, query())
        .await
        .expect("hire should be accepted");
    fixture
        .hire
        .run_pending(&mut workflow)
        .await
        .expect("pending step should be accepted");

    assert_eq!(workflow.result(), Some("all clear"));
    assert_eq!(workflow.phase(), HirePhase::Done);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn signer_rejection_reverts_to_idle_with_query(fixture: Harness) {
    fixture
        .ledger
        .enqueue_submission(Err(SubmitError::RejectedByUser));

    let mut workflow = fixture.hire.start(TokenId::new(7), price(), caller());
    fixture
        .hire
        .run_hire(&mut workflow, query())
        .await
        .expect("hire should be accepted");

    assert_eq!(workflow.phase(), HirePhase::Idle);
    assert_eq!(
        workflow.query().map(|q| q.as_str().to_owned()),
        Some("Analyze 60% ETH / 40% USDC".to_owned())
    );
    assert_eq!(
        workflow.last_error().map(WorkflowError::kind),
        Some(ErrorKind::RejectedByUser)
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reverted_payment_reverts_to_idle(fixture: Harness) {
    fixture.ledger.enqueue_submission(Ok(handle("0xhire")));
    fixture.ledger.enqueue_receipt(Ok(Receipt::reverted(
        handle("0xhire"),
        "execution reverted: insufficient value",
    )));

    let mut workflow = fixture.hire.start(TokenId::new(7), price(), caller());
    fixture
        .hire
        .run_hire(&mut workflow, query())
        .await
        .expect("hire should be accepted");

    assert_eq!(workflow.phase(), HirePhase::Idle);
    assert_eq!(
        workflow.last_error().map(WorkflowError::message),
        Some("insufficient value")
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn execution_timeout_settles_as_unknown_outcome(fixture: Harness) {
    script_paid_hire(&fixture);
    fixture
        .agent_service
        .enqueue_execution(Err(AgentServiceError::Timeout(Duration::from_secs(60))));

    let mut workflow = fixture.hire.start(TokenId::new(7), price(), caller());
    fixture
        .hire
        .run_hire(&mut workflow, query())
        .await
        .expect("hire should be accepted");
    fixture
        .hire
        .run_execution(&mut workflow)
        .await
        .expect("execution should be accepted");

    assert_eq!(workflow.phase(), HirePhase::Done);
    match workflow.outcome() {
        Some(ExecutionOutcome::Failed { error }) => {
            assert_eq!(error.kind(), ErrorKind::Timeout);
        }
        other => panic!("expected failed outcome, got {other:?}"),
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_token_fails_that_call_only(fixture: Harness) {
    fixture.ledger.enqueue_submission(Ok(handle("0xhire")));
    fixture.ledger.enqueue_receipt(Ok(empty_receipt("0xhire")));
    // Token map stays empty: resolution refreshes once, then fails.

    let mut workflow = fixture.hire.start(TokenId::new(9), price(), caller());
    fixture
        .hire
        .run_hire(&mut workflow, query())
        .await
        .expect("hire should be accepted");
    fixture
        .hire
        .run_execution(&mut workflow)
        .await
        .expect("execution should be accepted");

    assert_eq!(workflow.phase(), HirePhase::Done);
    match workflow.outcome() {
        Some(ExecutionOutcome::Failed { error }) => {
            assert_eq!(error.kind(), ErrorKind::UnknownTokenId);
        }
        other => panic!("expected failed outcome, got {other:?}"),
    }
    assert_eq!(fixture.agent_service.token_map_calls(), 1);
    assert!(fixture.agent_service.executions().is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn server_reported_failure_settles_to_done(fixture: Harness) {
    script_paid_hire(&fixture);
    fixture
        .agent_service
        .enqueue_execution(Err(AgentServiceError::Rejected(
            "model unavailable".to_owned(),
        )));

    let mut workflow = fixture.hire.start(TokenId::new(7), price(), caller());
    fixture
        .hire
        .run_hire(&mut workflow, query())
        .await
        .expect("hire should be accepted");
    fixture
        .hire
        .run_execution(&mut workflow)
        .await
        .expect("execution should be accepted");

    match workflow.outcome() {
        Some(ExecutionOutcome::Failed { error }) => {
            assert_eq!(error.kind(), ErrorKind::ExecutionFailed);
        }
        other => panic!("expected failed outcome, got {other:?}"),
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reset_clears_everything_for_a_fresh_instance(fixture: Harness) {
    script_paid_hire(&fixture);
    fixture
        .agent_service
        .enqueue_execution(Ok(ExecutionData::Plain("done".to_owned())));

    let mut workflow = fixture.hire.start(TokenId::new(7), price(), caller());
    fixture
        .hire
        .run_hire(&mut workflow, query())
        .await
        .expect("hire should be accepted");
    fixture
        .hire
        .run_execution(&mut workflow)
        .await
        .expect("execution should be accepted");
    fixture
        .hire
        .reset(&mut workflow)
        .expect("reset should be accepted");

    assert_eq!(workflow.phase(), HirePhase::Idle);
    assert!(workflow.query().is_none());
    assert!(workflow.outcome().is_none());
    assert!(workflow.last_handle().is_none());

    // A fresh instance shares nothing with the reset one.
    let fresh = fixture.hire.start(TokenId::new(7), price(), caller());
    assert!(fresh.last_handle().is_none());
    assert_ne!(fresh.id(), workflow.id());
}
