//! End-to-end reservation flow tests over the Store runtime.
//!
//! Drives the flow the way a UI would: commands in, effect-produced events
//! observed through `send_and_wait_for`, state read between steps.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;
use studio_booking_core::availability::{AvailabilityCalendar, SlotCatalog, TimeSlot};
use studio_booking_core::gateway::SubmissionError;
use studio_booking_core::types::ReservationDraft;
use studio_booking_engine::flow::{
    FlowAction, FlowEnvironment, FlowError, FlowReducer, FlowState, Step, SubmissionPhase,
};
use studio_booking_engine::store::Store;
use studio_booking_testing::mocks::{InMemoryCatalog, MockSubmissionGateway};
use studio_booking_testing::{fixtures, test_clock};

type FlowStore = Store<FlowState, FlowAction, FlowEnvironment, FlowReducer>;

const WAIT: Duration = Duration::from_secs(1);

fn store_with(gateway: &MockSubmissionGateway) -> FlowStore {
    let env = FlowEnvironment::new(
        Arc::new(test_clock()),
        Arc::new(InMemoryCatalog::new(
            vec![fixtures::service(), fixtures::evening_service()],
            vec![fixtures::formation()],
        )),
        gateway.clone().shared(),
        AvailabilityCalendar::new(SlotCatalog::business_default()),
    );
    Store::new(FlowState::default(), FlowReducer::new(), env)
}

async fn load_catalog(store: &FlowStore) {
    let loaded = store
        .send_and_wait_for(
            FlowAction::LoadCatalog,
            |a| matches!(a, FlowAction::CatalogLoaded { .. } | FlowAction::CatalogFailed { .. }),
            WAIT,
        )
        .await
        .unwrap();
    assert!(matches!(loaded, FlowAction::CatalogLoaded { .. }));
}

/// Walks the flow up to the confirm step with the bridal service fixture.
async fn walk_to_confirm(store: &FlowStore) {
    load_catalog(store).await;

    store
        .send(FlowAction::SelectService {
            id: fixtures::service().id,
        })
        .await;
    // Saturday 2025-06-14; 10:00 is an even catalog index, open on Saturdays.
    store
        .send(FlowAction::ChooseDateTime {
            date: "2025-06-14".parse().unwrap(),
            slot: TimeSlot::parse("10:00").unwrap(),
        })
        .await;
    store
        .send(FlowAction::SubmitContact {
            contact: fixtures::contact(),
        })
        .await;

    assert_eq!(store.state(|s| s.step).await, Step::Confirm);
    assert_eq!(store.state(|s| s.last_error.clone()).await, None);
}

async fn submit_and_wait(store: &FlowStore) -> FlowAction {
    store
        .send_and_wait_for(
            FlowAction::Submit,
            |a| {
                matches!(
                    a,
                    FlowAction::SubmissionSucceeded { .. } | FlowAction::SubmissionFailed { .. }
                )
            },
            WAIT,
        )
        .await
        .unwrap()
}

#[tokio::test]
async fn happy_path_reaches_success_with_derived_price_and_duration() {
    let gateway = MockSubmissionGateway::succeeding();
    let store = store_with(&gateway);

    walk_to_confirm(&store).await;
    let outcome = submit_and_wait(&store).await;
    assert!(matches!(outcome, FlowAction::SubmissionSucceeded { .. }));

    // The gateway saw the finalized draft with the derived amounts.
    let requests = gateway.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].draft.price().cents(), 25_000);
    assert_eq!(requests[0].draft.duration_minutes(), 120);
    assert_eq!(requests[0].draft.contact.first_name, "Marie");

    assert_eq!(store.state(|s| s.step).await, Step::Success);
    assert!(store.state(|s| s.confirmation.is_some()).await);
}

#[tokio::test]
async fn gateway_failure_keeps_the_flow_at_confirm_and_allows_retry() {
    let gateway = MockSubmissionGateway::succeeding()
        .with_scripted([Err(SubmissionError::Network {
            message: "connection reset".to_string(),
        })]);
    let store = store_with(&gateway);

    walk_to_confirm(&store).await;
    let draft_before = store.state(|s| s.draft.clone()).await;

    let outcome = submit_and_wait(&store).await;
    assert!(matches!(outcome, FlowAction::SubmissionFailed { .. }));

    // No silent advance: still at Confirm, error surfaced, draft intact.
    assert_eq!(store.state(|s| s.step).await, Step::Confirm);
    assert!(matches!(
        store.state(|s| s.last_error.clone()).await,
        Some(FlowError::Submission(_))
    ));
    assert_eq!(store.state(|s| s.draft.clone()).await, draft_before);

    // The retry succeeds and reuses the idempotency key.
    let outcome = submit_and_wait(&store).await;
    assert!(matches!(outcome, FlowAction::SubmissionSucceeded { .. }));
    assert_eq!(store.state(|s| s.step).await, Step::Success);

    let requests = gateway.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].idempotency_key, requests[1].idempotency_key);
    assert_eq!(requests[0].draft, requests[1].draft);
}

#[tokio::test]
async fn start_over_resets_the_draft_and_returns_to_step_one() {
    let gateway = MockSubmissionGateway::succeeding();
    let store = store_with(&gateway);

    walk_to_confirm(&store).await;
    submit_and_wait(&store).await;
    assert_eq!(store.state(|s| s.step).await, Step::Success);

    store.send(FlowAction::StartOver).await;

    assert_eq!(store.state(|s| s.step).await, Step::SelectOffering);
    assert_eq!(
        store.state(|s| s.draft.clone()).await,
        ReservationDraft::default()
    );
    assert_eq!(store.state(|s| s.idempotency_key).await, None);
    assert!(store.state(|s| s.confirmation.is_none()).await);
    // The catalog survives; the visitor does not need to reload it.
    assert!(store.state(|s| s.catalog.is_some()).await);

    // A fresh draft gets a fresh idempotency key.
    walk_to_confirm(&store).await;
    submit_and_wait(&store).await;
    let requests = gateway.requests();
    assert_eq!(requests.len(), 2);
    assert_ne!(requests[0].idempotency_key, requests[1].idempotency_key);
}

#[tokio::test]
async fn forward_transitions_are_refused_out_of_order() {
    let gateway = MockSubmissionGateway::succeeding();
    let store = store_with(&gateway);
    load_catalog(&store).await;

    // Step 2 input at step 1.
    store
        .send(FlowAction::ChooseDateTime {
            date: "2025-06-14".parse().unwrap(),
            slot: TimeSlot::parse("10:00").unwrap(),
        })
        .await;
    assert_eq!(store.state(|s| s.step).await, Step::SelectOffering);
    assert!(matches!(
        store.state(|s| s.last_error.clone()).await,
        Some(FlowError::WrongStep { .. })
    ));

    // Submit at step 1.
    store.send(FlowAction::Submit).await;
    assert_eq!(store.state(|s| s.step).await, Step::SelectOffering);
    assert!(gateway.requests().is_empty());
}

#[tokio::test]
async fn double_submit_sends_a_single_request() {
    let gateway =
        MockSubmissionGateway::succeeding().with_latency(Duration::from_millis(100));
    let store = store_with(&gateway);

    walk_to_confirm(&store).await;

    let first = store.send(FlowAction::Submit).await;
    store.send(FlowAction::Submit).await;
    assert_eq!(
        store.state(|s| s.last_error.clone()).await,
        Some(FlowError::SubmissionInFlight)
    );

    let mut first = first;
    first.wait_with_timeout(WAIT).await.unwrap();
    assert_eq!(store.state(|s| s.step).await, Step::Success);
    assert_eq!(gateway.requests().len(), 1);
}

#[tokio::test]
async fn back_navigation_walks_to_the_first_step() {
    let gateway = MockSubmissionGateway::succeeding();
    let store = store_with(&gateway);

    walk_to_confirm(&store).await;

    for expected in [Step::EnterContact, Step::SelectDateTime, Step::SelectOffering] {
        store.send(FlowAction::Back).await;
        assert_eq!(store.state(|s| s.step).await, expected);
    }

    // Back at step 1 stays put; leaving the flow is the embedding page's move.
    store.send(FlowAction::Back).await;
    assert_eq!(store.state(|s| s.step).await, Step::SelectOffering);
}

#[tokio::test]
async fn cancelled_attempt_is_dropped_even_when_the_gateway_answers() {
    let gateway =
        MockSubmissionGateway::succeeding().with_latency(Duration::from_millis(100));
    let store = store_with(&gateway);

    walk_to_confirm(&store).await;

    let handle = store.send(FlowAction::Submit).await;
    store.send(FlowAction::CancelSubmission).await;
    assert_eq!(
        store.state(|s| s.submission.clone()).await,
        SubmissionPhase::Idle
    );

    // Let the in-flight answer arrive: it belongs to the cancelled attempt
    // and must not move the flow.
    let mut handle = handle;
    handle.wait_with_timeout(WAIT).await.unwrap();
    assert_eq!(store.state(|s| s.step).await, Step::Confirm);
    assert!(store.state(|s| s.confirmation.is_none()).await);

    // Resubmission works and reuses the draft's idempotency key.
    let outcome = submit_and_wait(&store).await;
    assert!(matches!(outcome, FlowAction::SubmissionSucceeded { .. }));
    let requests = gateway.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].idempotency_key, requests[1].idempotency_key);
}

#[tokio::test]
async fn selecting_a_different_offering_clears_the_stale_slot() {
    let gateway = MockSubmissionGateway::succeeding();
    let store = store_with(&gateway);
    load_catalog(&store).await;

    store
        .send(FlowAction::SelectService {
            id: fixtures::service().id,
        })
        .await;
    store
        .send(FlowAction::ChooseDateTime {
            date: "2025-06-14".parse().unwrap(),
            slot: TimeSlot::parse("10:00").unwrap(),
        })
        .await;

    // Back to the first step and over to a formation.
    store.send(FlowAction::Back).await;
    store.send(FlowAction::Back).await;
    store
        .send(FlowAction::SelectFormation {
            id: fixtures::formation().id,
        })
        .await;

    assert_eq!(store.state(|s| s.step).await, Step::SelectDateTime);
    assert_eq!(store.state(|s| s.draft.date_time).await, None);
    assert_eq!(
        store.state(|s| s.draft.duration_minutes()).await,
        3 * 60
    );
}
