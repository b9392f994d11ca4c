//! Shared test harness for the store integration tests
//!
//! Provides fixture constructors for the domain records, a pre-seeded
//! `InMemoryApi` with a small two-branch catalog, and helpers for asserting
//! on change-bus traffic.
//!
//! # Usage
//!
//! From any integration test file in `tests/`:
//! ```rust,ignore
//! mod store_harness;
//! use store_harness::*;
//! ```

#![allow(dead_code)]

use std::sync::Once;
use std::time::Duration;

use celebra::prelude::*;

// ---------------------------------------------------------------------------
// Tracing
// ---------------------------------------------------------------------------

static TRACING: Once = Once::new();

/// Install a test tracing subscriber once per test binary.
///
/// Honors `RUST_LOG`; defaults to debug output from the crate so discard and
/// rollback paths are visible when a test fails.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("celebra=debug"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

// ---------------------------------------------------------------------------
// Fixture constructors
// ---------------------------------------------------------------------------

pub fn sample_event(id: &str, name: &str) -> Event {
    Event {
        id: EntityId::from(id),
        name: name.to_string(),
        image_url: None,
    }
}

pub fn sample_service(id: &str, name: &str, event_id: &str) -> Service {
    Service {
        id: EntityId::from(id),
        name: name.to_string(),
        event_id: Some(EntityId::from(event_id)),
    }
}

pub fn sample_package(id: &str, name: &str, event_id: &str, service_id: &str) -> Package {
    Package {
        id: EntityId::from(id),
        name: name.to_string(),
        price: Some(150_000),
        details: None,
        event_id: Some(EntityId::from(event_id)),
        service_id: Some(EntityId::from(service_id)),
    }
}

pub fn sample_booking(id: &str, status: BookingStatus) -> Booking {
    Booking {
        id: EntityId::from(id),
        status,
        package_id: EntityId::from("P1"),
        service_id: Some(EntityId::from("S1")),
        event_id: Some(EntityId::from("E1")),
        customer_id: EntityId::from("U1"),
        created_at: Utc::now(),
    }
}

pub fn sample_partner(id: &str, status: PartnerStatus) -> ServicePartner {
    ServicePartner {
        id: EntityId::from(id),
        status,
        name: format!("Partner {id}"),
        craft: Some("photographer".to_string()),
        email: Some(format!("{id}@partners.example")),
        phone: None,
        joined_at: Utc::now(),
    }
}

pub fn sample_profile(id: &str, wishlist: &[&str]) -> UserProfile {
    UserProfile {
        id: EntityId::from(id),
        name: format!("User {id}"),
        wishlist: wishlist
            .iter()
            .map(|pkg| PackageSummary {
                id: EntityId::from(*pkg),
                name: format!("Package {pkg}"),
                price: Some(99_000),
            })
            .collect(),
    }
}

// ---------------------------------------------------------------------------
// Seeded API and session wiring
// ---------------------------------------------------------------------------

/// An `InMemoryApi` seeded with a small two-branch catalog:
///
/// - Event `E1` (wedding) with service `S1` (photography) and package `P1`
/// - Event `E2` (birthday) with service `S2` (catering) and package `P2`
pub async fn seeded_api() -> InMemoryApi {
    let api = InMemoryApi::new();
    api.seed_event(sample_event("E1", "Garden Wedding")).await;
    api.seed_event(sample_event("E2", "Birthday Bash")).await;
    api.seed_service(sample_service("S1", "Photography", "E1"))
        .await;
    api.seed_service(sample_service("S2", "Catering", "E2")).await;
    api.seed_package(sample_package("P1", "Full Day Shoot", "E1", "S1"))
        .await;
    api.seed_package(sample_package("P2", "Buffet Deluxe", "E2", "S2"))
        .await;
    api
}

/// Build a session over the given API with default config.
pub async fn build_session(api: InMemoryApi) -> Session {
    init_tracing();
    Session::builder()
        .with_api(api)
        .build()
        .await
        .expect("session should build")
}

// ---------------------------------------------------------------------------
// Change-bus helpers
// ---------------------------------------------------------------------------

/// Receive the next change event, or panic after a generous timeout.
pub async fn next_event(sub: &mut Subscription) -> ChangeEvent {
    tokio::time::timeout(Duration::from_secs(1), sub.recv())
        .await
        .expect("timed out waiting for a change event")
        .expect("change bus closed")
        .event
}

/// Assert the bus stays quiet for a short window.
pub async fn assert_no_event(sub: &mut Subscription) {
    let outcome = tokio::time::timeout(Duration::from_millis(50), sub.recv()).await;
    assert!(
        outcome.is_err(),
        "expected no change event, got {:?}",
        outcome.unwrap().map(|envelope| envelope.event)
    );
}

// ---------------------------------------------------------------------------
// Id extraction helpers
// ---------------------------------------------------------------------------

pub fn booking_ids(bookings: &[Booking]) -> Vec<String> {
    bookings.iter().map(|b| b.id.to_string()).collect()
}

pub fn partner_ids(partners: &[ServicePartner]) -> Vec<String> {
    partners.iter().map(|p| p.id.to_string()).collect()
}

pub fn id_strings(ids: &[EntityId]) -> Vec<String> {
    ids.iter().map(|id| id.to_string()).collect()
}
