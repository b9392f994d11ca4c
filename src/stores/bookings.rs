//! Cached booking collection with a pure status filter

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::client::BookingApi;
use crate::core::entity::{Booking, BookingFilter};
use crate::core::error::StoreResult;
use crate::core::events::{BookingEvent, ChangeBus, ChangeEvent};
use crate::core::load::LoadPhase;

/// Stable status filter over a booking slice.
///
/// `All` keeps everything; a concrete status keeps the matching subsequence.
/// The input order is preserved either way, so the canonical server order
/// survives filtering.
pub fn filter_bookings(bookings: &[Booking], filter: BookingFilter) -> Vec<Booking> {
    bookings
        .iter()
        .filter(|booking| filter.matches(booking.status))
        .cloned()
        .collect()
}

#[derive(Default)]
struct BookingState {
    bookings: Vec<Booking>,
    filter: BookingFilter,
    phase: LoadPhase,
}

/// Store of the full booking collection and the active status filter
///
/// The collection is fetched whole and cached until the next
/// [`refresh`](Self::refresh); there is no automatic invalidation. The
/// filtered view is always derived from (cache, filter) on read, never stored
/// separately, so it cannot drift from the cache.
#[derive(Clone)]
pub struct BookingStore {
    state: Arc<RwLock<BookingState>>,
    api: Arc<dyn BookingApi>,
    bus: ChangeBus,
}

impl BookingStore {
    pub fn new(api: Arc<dyn BookingApi>, bus: ChangeBus) -> Self {
        Self {
            state: Arc::new(RwLock::new(BookingState::default())),
            api,
            bus,
        }
    }

    /// Fetch the whole collection, replacing the cache.
    ///
    /// On success returns the fetched count and publishes one `Loaded` event.
    /// On failure the previous cache is kept so the UI can keep rendering
    /// stale data: the phase returns to `Ready` when a cache exists and only
    /// falls to `Failed` when there is nothing cached at all.
    pub async fn refresh(&self) -> StoreResult<usize> {
        {
            let mut state = self.state.write().await;
            state.phase = LoadPhase::Loading;
        }

        match self.api.fetch_all_bookings().await {
            Ok(bookings) => {
                let total = bookings.len();
                let mut state = self.state.write().await;
                state.bookings = bookings;
                state.phase = LoadPhase::Ready;
                drop(state);

                self.bus
                    .publish(ChangeEvent::Bookings(BookingEvent::Loaded { total }));
                Ok(total)
            }
            Err(err) => {
                let mut state = self.state.write().await;
                state.phase = LoadPhase::after_failure(!state.bookings.is_empty());
                Err(err.into())
            }
        }
    }

    /// Select which slice [`filtered`](Self::filtered) derives. No refetch.
    ///
    /// Publishes a `FilterChanged` event only when the filter actually moved.
    pub async fn set_filter(&self, filter: BookingFilter) {
        let mut state = self.state.write().await;
        if state.filter == filter {
            return;
        }
        state.filter = filter;
        drop(state);

        let status = match filter {
            BookingFilter::All => None,
            BookingFilter::Status(status) => Some(status),
        };
        self.bus
            .publish(ChangeEvent::Bookings(BookingEvent::FilterChanged {
                status,
            }));
    }

    /// The cached collection narrowed by the active filter
    pub async fn filtered(&self) -> Vec<Booking> {
        let state = self.state.read().await;
        filter_bookings(&state.bookings, state.filter)
    }

    /// The full cached collection, unfiltered
    pub async fn all(&self) -> Vec<Booking> {
        self.state.read().await.bookings.clone()
    }

    pub async fn phase(&self) -> LoadPhase {
        self.state.read().await.phase
    }

    pub async fn filter(&self) -> BookingFilter {
        self.state.read().await.filter
    }

    /// Drop the cache, the filter, and the phase back to their initial state.
    pub async fn reset(&self) {
        let mut state = self.state.write().await;
        let pristine = state.bookings.is_empty()
            && state.filter == BookingFilter::All
            && state.phase == LoadPhase::Uninitialized;
        if pristine {
            return;
        }
        *state = BookingState::default();
        drop(state);

        self.bus
            .publish(ChangeEvent::Bookings(BookingEvent::Cleared));
    }
}
