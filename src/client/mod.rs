//! Transport collaborators the stores fetch through
//!
//! The stores never talk to a backend directly. They depend on these traits,
//! so production code can plug in an HTTP client while tests plug in
//! [`InMemoryApi`]. Every method returns a [`FetchResult`]; the stores convert
//! failures into [`StoreError`](crate::core::StoreError) at their boundary.

pub mod in_memory;

pub use in_memory::{Endpoint, InMemoryApi};

use async_trait::async_trait;

use crate::core::entity::{Booking, Event, Package, Service, ServicePartner};
use crate::core::error::FetchError;
use crate::core::id::EntityId;

/// Result type for transport calls
pub type FetchResult<T> = Result<T, FetchError>;

/// Catalog lookups by identifier
///
/// A successful call with an unknown identifier returns `Ok(None)`; `Err` is
/// reserved for transport trouble.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Fetch one event by id
    async fn fetch_event(&self, id: &EntityId) -> FetchResult<Option<Event>>;

    /// Fetch one service by id
    async fn fetch_service(&self, id: &EntityId) -> FetchResult<Option<Service>>;

    /// Fetch one package by id
    async fn fetch_package(&self, id: &EntityId) -> FetchResult<Option<Package>>;
}

/// Booking collection fetch
#[async_trait]
pub trait BookingApi: Send + Sync {
    /// Fetch the caller's bookings, in the order the backend returns them
    async fn fetch_all_bookings(&self) -> FetchResult<Vec<Booking>>;
}

/// Service partner collection fetch
#[async_trait]
pub trait PartnerApi: Send + Sync {
    /// Fetch all service partners, in the order the backend returns them
    async fn fetch_all_partners(&self) -> FetchResult<Vec<ServicePartner>>;
}

/// Remote wishlist mutations
///
/// These confirm or reject a membership change; reads come from the user's
/// profile payload instead, so there is no fetch here.
#[async_trait]
pub trait WishlistApi: Send + Sync {
    /// Record that `package_id` is on `user_id`'s wishlist
    async fn add_item(&self, user_id: &EntityId, package_id: &EntityId) -> FetchResult<()>;

    /// Record that `package_id` left `user_id`'s wishlist
    async fn remove_item(&self, user_id: &EntityId, package_id: &EntityId) -> FetchResult<()>;
}

/// One object implementing every transport concern the stores need.
///
/// Blanket-implemented, so any type carrying the four traits (like
/// [`InMemoryApi`]) is an [`Api`] automatically.
pub trait Api: CatalogApi + BookingApi + PartnerApi + WishlistApi {}

impl<T: CatalogApi + BookingApi + PartnerApi + WishlistApi> Api for T {}
