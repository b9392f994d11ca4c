//! Integration tests for the selection store: hierarchy propagation,
//! replacement semantics, and the stale-fetch guard.

mod store_harness;

use std::time::Duration;

use celebra::prelude::*;
use store_harness::*;

#[tokio::test]
async fn test_package_selection_cascades_to_service_and_event() {
    let session = build_session(seeded_api().await).await;
    let selection = session.selection();

    let outcome = selection
        .select_package(&EntityId::from("P1"))
        .await
        .unwrap();
    assert_eq!(outcome, SelectOutcome::Applied);

    let package = selection.active_package().await.unwrap();
    let service = selection.active_service().await.unwrap();
    let event = selection.active_event().await.unwrap();
    assert_eq!(package.id.as_str(), "P1");
    assert_eq!(service.id.as_str(), "S1");
    assert_eq!(event.id.as_str(), "E1");
}

#[tokio::test]
async fn test_second_package_replaces_ancestry_without_residue() {
    let session = build_session(seeded_api().await).await;
    let selection = session.selection();

    selection.select_package(&EntityId::from("P1")).await.unwrap();
    selection.select_package(&EntityId::from("P2")).await.unwrap();

    assert_eq!(selection.active_package().await.unwrap().id.as_str(), "P2");
    assert_eq!(selection.active_service().await.unwrap().id.as_str(), "S2");
    assert_eq!(selection.active_event().await.unwrap().id.as_str(), "E2");
}

#[tokio::test]
async fn test_unknown_package_preserves_previous_selection() {
    let session = build_session(seeded_api().await).await;
    let selection = session.selection();

    selection.select_package(&EntityId::from("P1")).await.unwrap();
    let err = selection
        .select_package(&EntityId::from("P-unknown"))
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(err.error_code(), "NOT_FOUND");
    assert_eq!(selection.active_package().await.unwrap().id.as_str(), "P1");
    assert_eq!(selection.active_event().await.unwrap().id.as_str(), "E1");
}

#[tokio::test]
async fn test_slow_fetch_is_superseded_by_newer_selection() {
    let api = seeded_api().await;
    api.seed_package(sample_package("P-slow", "Slow Package", "E2", "S2"))
        .await;
    api.set_latency(EntityId::from("P-slow"), Duration::from_millis(150))
        .await;
    let session = build_session(api).await;
    let selection = session.selection().clone();

    let slow = tokio::spawn({
        let selection = selection.clone();
        async move { selection.select_package(&EntityId::from("P-slow")).await }
    });

    // Let the slow selection claim its ticket and suspend in the fetch.
    tokio::time::sleep(Duration::from_millis(30)).await;

    let fast = selection
        .select_package(&EntityId::from("P1"))
        .await
        .unwrap();
    assert_eq!(fast, SelectOutcome::Applied);

    let slow = slow.await.unwrap().unwrap();
    assert_eq!(slow, SelectOutcome::Superseded);

    // The newer selection stands; the stale result never landed.
    assert_eq!(selection.active_package().await.unwrap().id.as_str(), "P1");
    assert_eq!(selection.active_event().await.unwrap().id.as_str(), "E1");
}

#[tokio::test]
async fn test_superseded_selection_publishes_nothing() {
    let api = seeded_api().await;
    api.seed_package(sample_package("P-slow", "Slow Package", "E2", "S2"))
        .await;
    api.set_latency(EntityId::from("P-slow"), Duration::from_millis(150))
        .await;
    let session = build_session(api).await;
    let selection = session.selection().clone();
    let mut sub = session.subscribe();

    let slow = tokio::spawn({
        let selection = selection.clone();
        async move { selection.select_package(&EntityId::from("P-slow")).await }
    });
    tokio::time::sleep(Duration::from_millis(30)).await;

    selection.select_package(&EntityId::from("P2")).await.unwrap();
    slow.await.unwrap().unwrap();

    // Exactly one PackageSelected envelope: the fast request's.
    let event = next_event(&mut sub).await;
    match event {
        ChangeEvent::Selection(SelectionEvent::PackageSelected { id, .. }) => {
            assert_eq!(id.as_str(), "P2");
        }
        other => panic!("expected a package selection event, got {other:?}"),
    }
    assert_no_event(&mut sub).await;
}

#[tokio::test]
async fn test_selection_events_carry_the_cascade() {
    let session = build_session(seeded_api().await).await;
    let mut sub = session.subscribe();

    session
        .selection()
        .select_package(&EntityId::from("P1"))
        .await
        .unwrap();

    match next_event(&mut sub).await {
        ChangeEvent::Selection(SelectionEvent::PackageSelected {
            id,
            service_id,
            event_id,
        }) => {
            assert_eq!(id.as_str(), "P1");
            assert_eq!(service_id.unwrap().as_str(), "S1");
            assert_eq!(event_id.unwrap().as_str(), "E1");
        }
        other => panic!("expected a package selection event, got {other:?}"),
    }
}

#[tokio::test]
async fn test_failed_selection_publishes_nothing() {
    let session = build_session(seeded_api().await).await;
    let mut sub = session.subscribe();

    let err = session
        .selection()
        .select_event(&EntityId::from("E-unknown"))
        .await
        .unwrap_err();
    assert!(err.is_not_found());

    assert_no_event(&mut sub).await;
}

#[tokio::test]
async fn test_event_and_service_selection_stay_independent() {
    let session = build_session(seeded_api().await).await;
    let selection = session.selection();

    selection.select_event(&EntityId::from("E1")).await.unwrap();
    selection.select_service(&EntityId::from("S2")).await.unwrap();

    // Service selection does not touch the event level and vice versa.
    assert_eq!(selection.active_event().await.unwrap().id.as_str(), "E1");
    assert_eq!(selection.active_service().await.unwrap().id.as_str(), "S2");
    assert!(selection.active_package().await.is_none());
}
