//! In-memory transport implementation for testing and development

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::client::{BookingApi, CatalogApi, FetchResult, PartnerApi, WishlistApi};
use crate::core::entity::{Booking, Event, Package, Service, ServicePartner};
use crate::core::error::FetchError;
use crate::core::id::EntityId;

/// Transport endpoints that can be made to fail on demand
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Event,
    Service,
    Package,
    Bookings,
    Partners,
    WishlistAdd,
    WishlistRemove,
}

#[derive(Default)]
struct ApiState {
    events: HashMap<EntityId, Event>,
    services: HashMap<EntityId, Service>,
    packages: HashMap<EntityId, Package>,
    bookings: Vec<Booking>,
    partners: Vec<ServicePartner>,
    wishlists: HashMap<EntityId, Vec<EntityId>>,
    fail_queue: Vec<Endpoint>,
    latency: HashMap<EntityId, Duration>,
}

impl ApiState {
    /// Consume one queued failure for this endpoint, if any.
    fn take_failure(&mut self, endpoint: Endpoint) -> bool {
        if let Some(pos) = self.fail_queue.iter().position(|e| *e == endpoint) {
            self.fail_queue.remove(pos);
            true
        } else {
            false
        }
    }
}

/// In-memory transport backed by seeded fixtures
///
/// Useful for tests and development. Collections keep their seeded order, the
/// same order a backend response would carry. Failures are injected per call
/// with [`fail_next`](Self::fail_next), and per-record latency with
/// [`set_latency`](Self::set_latency) lets tests interleave slow and fast
/// responses.
#[derive(Clone)]
pub struct InMemoryApi {
    state: Arc<RwLock<ApiState>>,
}

impl InMemoryApi {
    /// Create an empty in-memory transport
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(ApiState::default())),
        }
    }

    /// Seed one event
    pub async fn seed_event(&self, event: Event) {
        let mut state = self.state.write().await;
        state.events.insert(event.id.clone(), event);
    }

    /// Seed one service
    pub async fn seed_service(&self, service: Service) {
        let mut state = self.state.write().await;
        state.services.insert(service.id.clone(), service);
    }

    /// Seed one package
    pub async fn seed_package(&self, package: Package) {
        let mut state = self.state.write().await;
        state.packages.insert(package.id.clone(), package);
    }

    /// Replace the booking collection, preserving the given order
    pub async fn seed_bookings(&self, bookings: Vec<Booking>) {
        let mut state = self.state.write().await;
        state.bookings = bookings;
    }

    /// Replace the partner collection, preserving the given order
    pub async fn seed_partners(&self, partners: Vec<ServicePartner>) {
        let mut state = self.state.write().await;
        state.partners = partners;
    }

    /// Replace one user's remote wishlist
    pub async fn seed_wishlist(&self, user_id: EntityId, package_ids: Vec<EntityId>) {
        let mut state = self.state.write().await;
        state.wishlists.insert(user_id, package_ids);
    }

    /// Queue one failure for the next call hitting `endpoint`.
    ///
    /// Each queued failure is consumed by exactly one call; queue twice to
    /// fail twice.
    pub async fn fail_next(&self, endpoint: Endpoint) {
        let mut state = self.state.write().await;
        state.fail_queue.push(endpoint);
    }

    /// Delay catalog fetches for `id` by `delay`.
    ///
    /// Lets a test make an earlier request resolve after a later one.
    pub async fn set_latency(&self, id: EntityId, delay: Duration) {
        let mut state = self.state.write().await;
        state.latency.insert(id, delay);
    }

    /// Snapshot one user's remote wishlist, for assertions
    pub async fn remote_wishlist(&self, user_id: &EntityId) -> Vec<EntityId> {
        let state = self.state.read().await;
        state.wishlists.get(user_id).cloned().unwrap_or_default()
    }
}

impl Default for InMemoryApi {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CatalogApi for InMemoryApi {
    async fn fetch_event(&self, id: &EntityId) -> FetchResult<Option<Event>> {
        let (delay, found) = {
            let mut state = self.state.write().await;
            if state.take_failure(Endpoint::Event) {
                return Err(FetchError::network("injected failure: event fetch"));
            }
            (state.latency.get(id).copied(), state.events.get(id).cloned())
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        Ok(found)
    }

    async fn fetch_service(&self, id: &EntityId) -> FetchResult<Option<Service>> {
        let (delay, found) = {
            let mut state = self.state.write().await;
            if state.take_failure(Endpoint::Service) {
                return Err(FetchError::network("injected failure: service fetch"));
            }
            (
                state.latency.get(id).copied(),
                state.services.get(id).cloned(),
            )
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        Ok(found)
    }

    async fn fetch_package(&self, id: &EntityId) -> FetchResult<Option<Package>> {
        let (delay, found) = {
            let mut state = self.state.write().await;
            if state.take_failure(Endpoint::Package) {
                return Err(FetchError::network("injected failure: package fetch"));
            }
            (
                state.latency.get(id).copied(),
                state.packages.get(id).cloned(),
            )
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        Ok(found)
    }
}

#[async_trait]
impl BookingApi for InMemoryApi {
    async fn fetch_all_bookings(&self) -> FetchResult<Vec<Booking>> {
        let mut state = self.state.write().await;
        if state.take_failure(Endpoint::Bookings) {
            return Err(FetchError::network("injected failure: bookings fetch"));
        }
        Ok(state.bookings.clone())
    }
}

#[async_trait]
impl PartnerApi for InMemoryApi {
    async fn fetch_all_partners(&self) -> FetchResult<Vec<ServicePartner>> {
        let mut state = self.state.write().await;
        if state.take_failure(Endpoint::Partners) {
            return Err(FetchError::network("injected failure: partners fetch"));
        }
        Ok(state.partners.clone())
    }
}

#[async_trait]
impl WishlistApi for InMemoryApi {
    async fn add_item(&self, user_id: &EntityId, package_id: &EntityId) -> FetchResult<()> {
        let mut state = self.state.write().await;
        if state.take_failure(Endpoint::WishlistAdd) {
            return Err(FetchError::network("injected failure: wishlist add"));
        }
        let items = state.wishlists.entry(user_id.clone()).or_default();
        if !items.contains(package_id) {
            items.push(package_id.clone());
        }
        Ok(())
    }

    async fn remove_item(&self, user_id: &EntityId, package_id: &EntityId) -> FetchResult<()> {
        let mut state = self.state.write().await;
        if state.take_failure(Endpoint::WishlistRemove) {
            return Err(FetchError::network("injected failure: wishlist remove"));
        }
        if let Some(items) = state.wishlists.get_mut(user_id) {
            items.retain(|id| id != package_id);
        }
        Ok(())
    }
}
