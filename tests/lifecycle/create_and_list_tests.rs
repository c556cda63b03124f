//! In-memory integration tests for the create-and-list workflow.

use agora::agent_service::{domain::RegistrationOutcome, ports::AgentServiceError};
use agora::ledger::domain::{Receipt, TransactionCall};
use agora::ledger::ports::{SubmitError, WatchError};
use agora::lifecycle::domain::{CreatePhase, ErrorKind, WorkflowError};
use agora::lifecycle::services::REGISTRATION_TIMEOUT_WARNING;
use rstest::{fixture, rstest};
use std::time::Duration;

use super::helpers::{Harness, caller, draft, empty_receipt, handle, harness, mint_receipt};

#[fixture]
fn fixture() -> Harness {
    harness()
}

/// Scripts a clean mint confirmation yielding token 7.
fn script_mint(fixture: &Harness) {
    fixture.ledger.enqueue_submission(Ok(handle("0xmint")));
    fixture.ledger.enqueue_receipt(Ok(mint_receipt("0xmint", 7)));
}

/// Scripts a clean list confirmation.
fn script_list(fixture: &Harness) {
    fixture.ledger.enqueue_submission(Ok(handle("0xlist")));
    fixture
        .ledger
        .enqueue_receipt(Ok(empty_receipt("0xlist")));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn full_flow_reaches_done_listed(fixture: Harness) {
    script_mint(&fixture);
    fixture
        .agent_service
        .enqueue_registration(Ok(RegistrationOutcome::Accepted));
    script_list(&fixture);

    let mut workflow = fixture.create.start(draft(), caller());
    while workflow.phase() != CreatePhase::Done {
        fixture
            .create
            .advance(&mut workflow)
            .await
            .expect("advance should be accepted");
    }

    assert!(workflow.is_listed());
    assert_eq!(workflow.token_id().map(|t| t.into_inner()), Some(7));
    assert!(workflow.registration_warning().is_none());
    assert!(workflow.last_error().is_none());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn registration_rejection_still_reaches_done(fixture: Harness) {
    script_mint(&fixture);
    fixture
        .agent_service
        .enqueue_registration(Ok(RegistrationOutcome::Rejected {
            message: "db unavailable".to_owned(),
        }));
    script_list(&fixture);

    let mut workflow = fixture.create.start(draft(), caller());
    while workflow.phase() != CreatePhase::Done {
        fixture
            .create
            .advance(&mut workflow)
            .await
            .expect("advance should be accepted");
    }

    assert!(workflow.is_listed());
    assert_eq!(
        workflow.registration_warning().map(WorkflowError::message),
        Some("db unavailable")
    );
    assert_eq!(
        workflow.registration_warning().map(WorkflowError::kind),
        Some(ErrorKind::RegistrationWarning)
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn registration_timeout_warns_and_proceeds(fixture: Harness) {
    script_mint(&fixture);
    fixture
        .agent_service
        .enqueue_registration(Err(AgentServiceError::Timeout(Duration::from_secs(30))));

    let mut workflow = fixture.create.start(draft(), caller());
    fixture
        .create
        .run_mint(&mut workflow)
        .await
        .expect("mint should be accepted");
    fixture
        .create
        .run_registration(&mut workflow)
        .await
        .expect("registration should be accepted");

    assert_eq!(workflow.phase(), CreatePhase::Listing);
    assert_eq!(
        workflow.registration_warning().map(WorkflowError::message),
        Some(REGISTRATION_TIMEOUT_WARNING)
    );

    // The single issued call used the deterministic registration key.
    let registrations = fixture.agent_service.registrations();
    assert_eq!(registrations.len(), 1);
    assert_eq!(
        registrations
            .first()
            .map(|request| request.agent_id.as_str().to_owned()),
        Some("portfolio_analyzer_t7".to_owned())
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn signer_rejection_returns_to_form(fixture: Harness) {
    fixture
        .ledger
        .enqueue_submission(Err(SubmitError::RejectedByUser));

    let mut workflow = fixture.create.start(draft(), caller());
    fixture
        .create
        .run_mint(&mut workflow)
        .await
        .expect("mint should be accepted");

    assert_eq!(workflow.phase(), CreatePhase::Form);
    assert_eq!(
        workflow.last_error().map(WorkflowError::kind),
        Some(ErrorKind::RejectedByUser)
    );
    assert_eq!(workflow.draft().name().as_str(), "Portfolio Analyzer");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn lost_watch_returns_to_form_for_retry(fixture: Harness) {
    fixture.ledger.enqueue_submission(Ok(handle("0xmint")));
    fixture
        .ledger
        .enqueue_receipt(Err(WatchError("ledger link lost".to_owned())));

    let mut workflow = fixture.create.start(draft(), caller());
    fixture
        .create
        .run_mint(&mut workflow)
        .await
        .expect("mint should be accepted");

    assert_eq!(workflow.phase(), CreatePhase::Form);
    assert_eq!(
        workflow.last_error().map(WorkflowError::kind),
        Some(ErrorKind::Watch)
    );

    // The preserved draft supports an immediate retry.
    script_mint(&fixture);
    fixture
        .create
        .run_mint(&mut workflow)
        .await
        .expect("retry should be accepted");
    assert_eq!(workflow.phase(), CreatePhase::Registering);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn listing_revert_parks_and_retries_without_reminting(
    fixture: Harness,
) -> Result<(), eyre::Report> {
    script_mint(&fixture);
    fixture
        .agent_service
        .enqueue_registration(Ok(RegistrationOutcome::Accepted));
    fixture.ledger.enqueue_submission(Ok(handle("0xlist")));
    fixture.ledger.enqueue_receipt(Ok(Receipt::reverted(
        handle("0xlist"),
        "execution reverted: price mismatch",
    )));

    let mut workflow = fixture.create.start(draft(), caller());
    fixture.create.run_mint(&mut workflow).await?;
    fixture.create.run_registration(&mut workflow).await?;
    fixture.create.run_listing(&mut workflow).await?;

    assert_eq!(workflow.phase(), CreatePhase::Listing);
    assert_eq!(
        workflow.last_error().map(WorkflowError::kind),
        Some(ErrorKind::ChainRevert)
    );
    assert_eq!(
        workflow.last_error().map(WorkflowError::message),
        Some("price mismatch")
    );

    script_list(&fixture);
    fixture.create.run_listing(&mut workflow).await?;
    assert_eq!(workflow.phase(), CreatePhase::Done);

    // One mint intent and two list intents; a listing retry never
    // re-submits a mint.
    let submitted = fixture.ledger.submitted();
    let mints = submitted
        .iter()
        .filter(|intent| matches!(intent.call(), TransactionCall::Mint { .. }))
        .count();
    let lists = submitted
        .iter()
        .filter(|intent| matches!(intent.call(), TransactionCall::List { .. }))
        .count();
    eyre::ensure!(mints == 1, "expected exactly one mint intent, found {mints}");
    eyre::ensure!(lists == 2, "expected two list intents, found {lists}");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn skip_listing_finishes_with_usable_token(fixture: Harness) {
    script_mint(&fixture);
    fixture
        .agent_service
        .enqueue_registration(Ok(RegistrationOutcome::Accepted));
    fixture.ledger.enqueue_submission(Ok(handle("0xlist")));
    fixture.ledger.enqueue_receipt(Ok(Receipt::reverted(
        handle("0xlist"),
        "execution reverted: listing closed",
    )));

    let mut workflow = fixture.create.start(draft(), caller());
    fixture
        .create
        .run_mint(&mut workflow)
        .await
        .expect("mint should be accepted");
    fixture
        .create
        .run_registration(&mut workflow)
        .await
        .expect("registration should be accepted");
    fixture
        .create
        .run_listing(&mut workflow)
        .await
        .expect("listing should be accepted");
    fixture
        .create
        .skip_listing(&mut workflow)
        .expect("skip should be accepted");

    assert_eq!(workflow.phase(), CreatePhase::Done);
    assert!(!workflow.is_listed());
    assert_eq!(workflow.token_id().map(|t| t.into_inner()), Some(7));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn pending_decode_resumes_when_events_appear(fixture: Harness) {
    fixture.ledger.enqueue_submission(Ok(handle("0xmint")));
    fixture.ledger.enqueue_receipt(Ok(empty_receipt("0xmint")));

    let mut workflow = fixture.create.start(draft(), caller());
    fixture
        .create
        .run_mint(&mut workflow)
        .await
        .expect("mint should be accepted");

    assert_eq!(workflow.phase(), CreatePhase::Minting);
    assert!(workflow.decode_pending());

    fixture.ledger.enqueue_receipt(Ok(mint_receipt("0xmint", 9)));
    fixture
        .create
        .resume_confirmation(&mut workflow)
        .await
        .expect("resume should be accepted");

    assert_eq!(workflow.phase(), CreatePhase::Registering);
    assert_eq!(workflow.token_id().map(|t| t.into_inner()), Some(9));
    // Both observations targeted the single live handle.
    assert_eq!(
        fixture.ledger.watched(),
        vec![handle("0xmint"), handle("0xmint")]
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reset_returns_to_initial_form(fixture: Harness) {
    script_mint(&fixture);
    fixture
        .agent_service
        .enqueue_registration(Ok(RegistrationOutcome::Accepted));

    let mut workflow = fixture.create.start(draft(), caller());
    fixture
        .create
        .run_mint(&mut workflow)
        .await
        .expect("mint should be accepted");
    fixture
        .create
        .run_registration(&mut workflow)
        .await
        .expect("registration should be accepted");
    fixture
        .create
        .reset(&mut workflow)
        .expect("reset should be accepted");

    assert_eq!(workflow.phase(), CreatePhase::Form);
    assert!(workflow.token_id().is_none());
    assert!(workflow.last_receipt().is_none());
    assert!(workflow.registration_warning().is_none());
}
