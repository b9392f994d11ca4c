//! Session container owning the stores, the bus, and the API wiring
//!
//! The stores are deliberately not ambient globals. A [`Session`] is built
//! once per application (or per test), owns one instance of each store plus
//! the shared [`ChangeBus`], and is handed to consumers by reference or Arc.
//! Every consumer observes the same mutations; a fresh `Session` is complete
//! isolation.

use std::sync::Arc;

use anyhow::Result;

use crate::client::{Api, BookingApi, CatalogApi, PartnerApi, WishlistApi};
use crate::config::StoreConfig;
use crate::core::events::{ChangeBus, Subscription};
use crate::stores::{BookingStore, PartnerStore, SelectionStore, WishlistStore};

/// Builder for wiring a [`Session`]
///
/// # Example
///
/// ```ignore
/// let session = Session::builder()
///     .with_config(StoreConfig::from_yaml_file("stores.yaml")?)
///     .with_api(InMemoryApi::new())
///     .build()
///     .await?;
/// ```
pub struct SessionBuilder {
    config: StoreConfig,
    catalog: Option<Arc<dyn CatalogApi>>,
    booking_api: Option<Arc<dyn BookingApi>>,
    partner_api: Option<Arc<dyn PartnerApi>>,
    wishlist_api: Option<Arc<dyn WishlistApi>>,
}

impl SessionBuilder {
    pub fn new() -> Self {
        Self {
            config: StoreConfig::default(),
            catalog: None,
            booking_api: None,
            partner_api: None,
            wishlist_api: None,
        }
    }

    /// Set the store configuration (optional; defaults apply otherwise)
    pub fn with_config(mut self, config: StoreConfig) -> Self {
        self.config = config;
        self
    }

    /// Wire one collaborator into every API slot.
    ///
    /// This is the normal case: a single client object carries the whole
    /// transport surface.
    pub fn with_api(mut self, api: impl Api + 'static) -> Self {
        let api = Arc::new(api);
        self.catalog = Some(api.clone());
        self.booking_api = Some(api.clone());
        self.partner_api = Some(api.clone());
        self.wishlist_api = Some(api);
        self
    }

    /// Set only the catalog collaborator
    pub fn with_catalog(mut self, api: impl CatalogApi + 'static) -> Self {
        self.catalog = Some(Arc::new(api));
        self
    }

    /// Set only the booking collaborator
    pub fn with_booking_api(mut self, api: impl BookingApi + 'static) -> Self {
        self.booking_api = Some(Arc::new(api));
        self
    }

    /// Set only the partner collaborator
    pub fn with_partner_api(mut self, api: impl PartnerApi + 'static) -> Self {
        self.partner_api = Some(Arc::new(api));
        self
    }

    /// Set only the wishlist collaborator
    pub fn with_wishlist_api(mut self, api: impl WishlistApi + 'static) -> Self {
        self.wishlist_api = Some(Arc::new(api));
        self
    }

    /// Build the session.
    ///
    /// Fails if any API slot is missing. Applies the configured partner home
    /// bucket, so the partner store comes up showing the right tab.
    pub async fn build(self) -> Result<Session> {
        let catalog = self
            .catalog
            .ok_or_else(|| anyhow::anyhow!("CatalogApi is required. Call .with_api() or .with_catalog()"))?;
        let booking_api = self
            .booking_api
            .ok_or_else(|| anyhow::anyhow!("BookingApi is required. Call .with_api() or .with_booking_api()"))?;
        let partner_api = self
            .partner_api
            .ok_or_else(|| anyhow::anyhow!("PartnerApi is required. Call .with_api() or .with_partner_api()"))?;
        let wishlist_api = self
            .wishlist_api
            .ok_or_else(|| anyhow::anyhow!("WishlistApi is required. Call .with_api() or .with_wishlist_api()"))?;

        let bus = ChangeBus::new(self.config.channel_capacity);
        let selection = SelectionStore::new(catalog, bus.clone());
        let wishlist = WishlistStore::new(wishlist_api, bus.clone());
        let bookings = BookingStore::new(booking_api, bus.clone());
        let partners = PartnerStore::new(partner_api, bus.clone());

        if let Some(bucket) = self.config.partner_home_bucket {
            partners.set_bucket(bucket).await;
        }

        tracing::debug!(
            capacity = self.config.channel_capacity,
            home_bucket = ?self.config.partner_home_bucket,
            "session built"
        );

        Ok(Session {
            config: self.config,
            bus,
            selection,
            wishlist,
            bookings,
            partners,
        })
    }
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// One application session's worth of store state
pub struct Session {
    config: StoreConfig,
    bus: ChangeBus,
    selection: SelectionStore,
    wishlist: WishlistStore,
    bookings: BookingStore,
    partners: PartnerStore,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Session {
    pub fn builder() -> SessionBuilder {
        SessionBuilder::new()
    }

    pub fn selection(&self) -> &SelectionStore {
        &self.selection
    }

    pub fn wishlist(&self) -> &WishlistStore {
        &self.wishlist
    }

    pub fn bookings(&self) -> &BookingStore {
        &self.bookings
    }

    pub fn partners(&self) -> &PartnerStore {
        &self.partners
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn bus(&self) -> &ChangeBus {
        &self.bus
    }

    /// Subscribe to every store's change events
    pub fn subscribe(&self) -> Subscription {
        self.bus.subscribe()
    }

    /// Return every store to the state [`build`](SessionBuilder::build)
    /// produced.
    ///
    /// Selections unset, wishlist signed out, collections dropped back to
    /// `Uninitialized`, the configured partner home bucket re-applied. The
    /// bus and its subscriptions stay alive; each store that actually had
    /// state publishes its `Cleared` event.
    pub async fn reset(&self) {
        tracing::debug!("resetting session stores");
        self.selection.clear().await;
        self.wishlist.clear_user().await;
        self.bookings.reset().await;
        self.partners.reset().await;

        if let Some(bucket) = self.config.partner_home_bucket {
            self.partners.set_bucket(bucket).await;
        }
    }
}
