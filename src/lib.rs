//! # Celebra Store
//!
//! Client-side domain state stores for event-services booking apps.
//!
//! The crate is the in-memory state layer between a booking backend and the
//! UI: it tracks what the user is looking at, what they have wishlisted, and
//! the cached booking/partner collections, and it keeps the derived views
//! over those consistent by construction.
//!
//! ## Features
//!
//! - **Selection hierarchy**: active Event -> Service -> Package with
//!   automatic upward propagation when a package is selected
//! - **Stale-fetch guard**: rapid navigation cannot commit an out-of-date
//!   fetch over a newer selection
//! - **Wishlist set**: ordered, duplicate-free membership with optimistic
//!   add/remove and compensating rollback on remote failure
//! - **Derived views**: booking status filtering and partner lifecycle
//!   buckets are pure functions of the cached collections
//! - **Change bus**: every committed mutation publishes one typed event on a
//!   broadcast channel; views subscribe instead of polling
//! - **Explicit lifecycle**: stores live in an injected [`Session`]
//!   (create / reset), never in ambient global state
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use celebra::prelude::*;
//!
//! let session = Session::builder()
//!     .with_config(StoreConfig::from_yaml_file("stores.yaml")?)
//!     .with_api(backend_client)
//!     .build()
//!     .await?;
//!
//! // React to store changes
//! let mut changes = session.subscribe();
//! tokio::spawn(async move {
//!     while let Some(envelope) = changes.recv().await {
//!         tracing::info!(kind = envelope.event.kind(), "store changed");
//!     }
//! });
//!
//! // Selecting a package cascades to its parent service and event
//! session.selection().select_package(&"pkg-42".into()).await?;
//! let event = session.selection().active_event().await;
//! ```
//!
//! [`Session`]: crate::session::Session

pub mod client;
pub mod config;
pub mod core;
pub mod session;
pub mod stores;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core Types ===
    pub use crate::core::{
        entity::{
            Booking, BookingFilter, BookingStatus, Event, Package, PackageSummary, PartnerBucket,
            PartnerStatus, Service, ServicePartner, UserProfile,
        },
        error::{FetchError, StoreError, StoreResult},
        events::{
            BookingEvent, ChangeBus, ChangeEvent, EventEnvelope, PartnerEvent, SelectionEvent,
            Subscription, WishlistEvent,
        },
        id::EntityId,
        load::LoadPhase,
    };

    // === Stores ===
    pub use crate::stores::{
        BookingStore, BucketCounts, PartnerBuckets, PartnerStore, SelectOutcome, SelectionStore,
        WishlistStore, filter_bookings,
    };

    // === Session ===
    pub use crate::session::{Session, SessionBuilder};

    // === Collaborators ===
    pub use crate::client::{
        Api, BookingApi, CatalogApi, Endpoint, FetchResult, InMemoryApi, PartnerApi, WishlistApi,
    };

    // === Config ===
    pub use crate::config::StoreConfig;

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, Utc};
    pub use serde::{Deserialize, Serialize};
    pub use uuid::Uuid;
}
