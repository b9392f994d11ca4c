//! Active catalog selection with hierarchy propagation
//!
//! The store keeps the "active" Event, Service, and Package a user navigated
//! to. The essential algorithm lives in [`SelectionStore::select_package`]:
//! selecting a package is never just a package selection, it cascades upward
//! through the parent links embedded in the fetched record, so the three
//! levels stay mutually consistent.
//!
//! Selections survive until the next selection overwrites them. Rapid
//! navigation is the one race worth guarding: a slow fetch kicked off by an
//! earlier selection can resolve after a newer selection already committed.
//! Each level carries a request ticket for this; a result whose ticket is no
//! longer the latest for its level is discarded as [`SelectOutcome::Superseded`]
//! and publishes nothing.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::client::CatalogApi;
use crate::core::entity::{Event, Package, Service};
use crate::core::error::{StoreError, StoreResult};
use crate::core::events::{ChangeBus, ChangeEvent, SelectionEvent};
use crate::core::id::EntityId;

/// What became of a committed-or-not selection request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    /// The fetched entity was committed and a change event published
    Applied,
    /// A newer selection for this level started while this fetch was in
    /// flight; the result was discarded and nothing was published
    Superseded,
}

impl SelectOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, SelectOutcome::Applied)
    }
}

#[derive(Default)]
struct SelectionState {
    active_event: Option<Event>,
    active_service: Option<Service>,
    active_package: Option<Package>,
    // Per-level request tickets. A selection claims the next ticket before
    // suspending and may only commit while its ticket is still the latest.
    event_ticket: u64,
    service_ticket: u64,
    package_ticket: u64,
}

/// Store of the active Event/Service/Package selection
#[derive(Clone)]
pub struct SelectionStore {
    state: Arc<RwLock<SelectionState>>,
    catalog: Arc<dyn CatalogApi>,
    bus: ChangeBus,
}

impl SelectionStore {
    pub fn new(catalog: Arc<dyn CatalogApi>, bus: ChangeBus) -> Self {
        Self {
            state: Arc::new(RwLock::new(SelectionState::default())),
            catalog,
            bus,
        }
    }

    /// Fetch the event and make it the active one.
    ///
    /// The service and package levels are left alone; event selection is
    /// independent. On `NotFound` or a transport failure the previous active
    /// event is preserved.
    pub async fn select_event(&self, id: &EntityId) -> StoreResult<SelectOutcome> {
        let ticket = {
            let mut state = self.state.write().await;
            state.event_ticket += 1;
            state.event_ticket
        };

        let fetched = self.catalog.fetch_event(id).await?;
        let event = fetched.ok_or_else(|| StoreError::not_found("event", id.clone()))?;

        let mut state = self.state.write().await;
        if state.event_ticket != ticket {
            tracing::debug!(id = %id, "discarding superseded event selection");
            return Ok(SelectOutcome::Superseded);
        }
        state.active_event = Some(event);
        drop(state);

        self.bus
            .publish(ChangeEvent::Selection(SelectionEvent::EventSelected {
                id: id.clone(),
            }));
        Ok(SelectOutcome::Applied)
    }

    /// Fetch the service and make it the active one.
    ///
    /// Independent of the event level, same contract as
    /// [`select_event`](Self::select_event).
    pub async fn select_service(&self, id: &EntityId) -> StoreResult<SelectOutcome> {
        let ticket = {
            let mut state = self.state.write().await;
            state.service_ticket += 1;
            state.service_ticket
        };

        let fetched = self.catalog.fetch_service(id).await?;
        let service = fetched.ok_or_else(|| StoreError::not_found("service", id.clone()))?;

        let mut state = self.state.write().await;
        if state.service_ticket != ticket {
            tracing::debug!(id = %id, "discarding superseded service selection");
            return Ok(SelectOutcome::Superseded);
        }
        state.active_service = Some(service);
        drop(state);

        self.bus
            .publish(ChangeEvent::Selection(SelectionEvent::ServiceSelected {
                id: id.clone(),
            }));
        Ok(SelectOutcome::Applied)
    }

    /// Fetch the package, make it active, and cascade the selection upward.
    ///
    /// The active service and event are recomputed from the parent links
    /// embedded in the fetched package, replacing whatever was active before;
    /// no residue of the previous package's ancestry survives. A parent link
    /// that is absent or blank, or a parent fetch that fails, unsets that
    /// level instead of blocking the package itself.
    pub async fn select_package(&self, id: &EntityId) -> StoreResult<SelectOutcome> {
        let ticket = {
            let mut state = self.state.write().await;
            state.package_ticket += 1;
            state.package_ticket
        };

        let fetched = self.catalog.fetch_package(id).await?;
        let package = fetched.ok_or_else(|| StoreError::not_found("package", id.clone()))?;

        // Resolve both parents before committing, so the cascade lands as one
        // mutation and one published event.
        let service = match package.parent_service_id() {
            Some(service_id) => self.resolve_parent_service(service_id).await,
            None => None,
        };
        let event = match package.parent_event_id() {
            Some(event_id) => self.resolve_parent_event(event_id).await,
            None => None,
        };

        let mut state = self.state.write().await;
        if state.package_ticket != ticket {
            tracing::debug!(id = %id, "discarding superseded package selection");
            return Ok(SelectOutcome::Superseded);
        }
        let service_id = service.as_ref().map(|s| s.id.clone());
        let event_id = event.as_ref().map(|e| e.id.clone());
        tracing::debug!(
            package = %id,
            service = ?service_id,
            event = ?event_id,
            "committing package selection cascade"
        );
        state.active_package = Some(package);
        state.active_service = service;
        state.active_event = event;
        drop(state);

        self.bus
            .publish(ChangeEvent::Selection(SelectionEvent::PackageSelected {
                id: id.clone(),
                service_id,
                event_id,
            }));
        Ok(SelectOutcome::Applied)
    }

    async fn resolve_parent_service(&self, id: &EntityId) -> Option<Service> {
        match self.catalog.fetch_service(id).await {
            Ok(Some(service)) => Some(service),
            Ok(None) => {
                tracing::warn!(id = %id, "parent service did not resolve, leaving level unset");
                None
            }
            Err(err) => {
                tracing::warn!(id = %id, error = %err, "parent service fetch failed, leaving level unset");
                None
            }
        }
    }

    async fn resolve_parent_event(&self, id: &EntityId) -> Option<Event> {
        match self.catalog.fetch_event(id).await {
            Ok(Some(event)) => Some(event),
            Ok(None) => {
                tracing::warn!(id = %id, "parent event did not resolve, leaving level unset");
                None
            }
            Err(err) => {
                tracing::warn!(id = %id, error = %err, "parent event fetch failed, leaving level unset");
                None
            }
        }
    }

    /// The active event, cloned
    pub async fn active_event(&self) -> Option<Event> {
        self.state.read().await.active_event.clone()
    }

    /// The active service, cloned
    pub async fn active_service(&self) -> Option<Service> {
        self.state.read().await.active_service.clone()
    }

    /// The active package, cloned
    pub async fn active_package(&self) -> Option<Package> {
        self.state.read().await.active_package.clone()
    }

    /// Unset all three levels and invalidate in-flight selections.
    ///
    /// Publishes one `Cleared` event if anything was actually set.
    pub async fn clear(&self) {
        let mut state = self.state.write().await;
        let had_any = state.active_event.is_some()
            || state.active_service.is_some()
            || state.active_package.is_some();
        state.active_event = None;
        state.active_service = None;
        state.active_package = None;
        // In-flight fetches must not resurrect a selection after a clear.
        state.event_ticket += 1;
        state.service_ticket += 1;
        state.package_ticket += 1;
        drop(state);

        if had_any {
            self.bus
                .publish(ChangeEvent::Selection(SelectionEvent::Cleared));
        }
    }
}
