//! Change notifications for store subscribers
//!
//! The ChangeBus is how UI layers hear about store mutations. It uses
//! `tokio::sync::broadcast` to decouple the stores (which publish) from
//! views (which subscribe), so a store never knows who is listening.
//!
//! # Architecture
//!
//! ```text
//! SelectionStore ──┐
//! WishlistStore  ──┼──▶ ChangeBus::publish() ──▶ broadcast channel ──▶ view subscribers
//! BookingStore   ──┤
//! PartnerStore   ──┘
//! ```
//!
//! Every published event is wrapped in an [`EventEnvelope`] carrying a unique
//! id and timestamp; a store publishes an event exactly once per completed
//! mutation, so subscribers can count envelopes to count mutations.
//!
//! # Usage
//!
//! ```rust,ignore
//! let bus = ChangeBus::new(1024);
//!
//! // Subscribe to store changes
//! let mut sub = bus.subscribe();
//!
//! // Publish a change (non-blocking, fire-and-forget)
//! bus.publish(ChangeEvent::Selection(SelectionEvent::Cleared));
//!
//! // Receive changes
//! while let Some(envelope) = sub.recv().await {
//!     println!("store changed: {:?}", envelope.event);
//! }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use uuid::Uuid;

use crate::core::entity::{BookingStatus, PartnerBucket};
use crate::core::id::EntityId;

/// Changes to the active catalog selection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum SelectionEvent {
    /// An event became the active one
    EventSelected { id: EntityId },
    /// A service became the active one (independent of the event level)
    ServiceSelected { id: EntityId },
    /// A package became the active one, pulling both parents along
    PackageSelected {
        id: EntityId,
        service_id: Option<EntityId>,
        event_id: Option<EntityId>,
    },
    /// The whole selection was cleared
    Cleared,
}

/// Changes to the signed-in user's wishlist
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum WishlistEvent {
    /// A user's wishlist was (re)hydrated from their profile
    Loaded { user_id: EntityId, items: usize },
    /// A package entered the wishlist
    Added {
        user_id: EntityId,
        package_id: EntityId,
    },
    /// A package left the wishlist
    Removed {
        user_id: EntityId,
        package_id: EntityId,
    },
    /// The user signed out and the wishlist emptied
    Cleared,
}

/// Changes to the booking collection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum BookingEvent {
    /// A refresh committed a fresh collection
    Loaded { total: usize },
    /// The active filter changed (`None` means show everything)
    FilterChanged { status: Option<BookingStatus> },
    /// The store was reset to empty
    Cleared,
}

/// Changes to the service partner collection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum PartnerEvent {
    /// A refresh committed fresh buckets; `discarded` counts records dropped
    /// for carrying a status this client does not know
    Loaded {
        pending: usize,
        active: usize,
        inactive: usize,
        discarded: usize,
    },
    /// The viewed bucket changed (`None` means no bucket selected)
    BucketChanged { bucket: Option<PartnerBucket> },
    /// The store was reset to empty
    Cleared,
}

/// Top-level change event wrapping the per-store event families
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChangeEvent {
    /// A selection change
    Selection(SelectionEvent),
    /// A wishlist change
    Wishlist(WishlistEvent),
    /// A booking collection change
    Bookings(BookingEvent),
    /// A partner collection change
    Partners(PartnerEvent),
}

impl ChangeEvent {
    /// Which store family this event belongs to
    pub fn kind(&self) -> &str {
        match self {
            ChangeEvent::Selection(_) => "selection",
            ChangeEvent::Wishlist(_) => "wishlist",
            ChangeEvent::Bookings(_) => "bookings",
            ChangeEvent::Partners(_) => "partners",
        }
    }

    /// The action name within the family (selected, loaded, cleared, ...)
    pub fn action(&self) -> &str {
        match self {
            ChangeEvent::Selection(e) => match e {
                SelectionEvent::EventSelected { .. } => "event_selected",
                SelectionEvent::ServiceSelected { .. } => "service_selected",
                SelectionEvent::PackageSelected { .. } => "package_selected",
                SelectionEvent::Cleared => "cleared",
            },
            ChangeEvent::Wishlist(e) => match e {
                WishlistEvent::Loaded { .. } => "loaded",
                WishlistEvent::Added { .. } => "added",
                WishlistEvent::Removed { .. } => "removed",
                WishlistEvent::Cleared => "cleared",
            },
            ChangeEvent::Bookings(e) => match e {
                BookingEvent::Loaded { .. } => "loaded",
                BookingEvent::FilterChanged { .. } => "filter_changed",
                BookingEvent::Cleared => "cleared",
            },
            ChangeEvent::Partners(e) => match e {
                PartnerEvent::Loaded { .. } => "loaded",
                PartnerEvent::BucketChanged { .. } => "bucket_changed",
                PartnerEvent::Cleared => "cleared",
            },
        }
    }
}

/// Envelope wrapping a change event with metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    /// Unique event ID
    pub id: Uuid,
    /// When the change was published
    pub timestamp: DateTime<Utc>,
    /// The actual event
    pub event: ChangeEvent,
}

impl EventEnvelope {
    /// Create a new event envelope
    pub fn new(event: ChangeEvent) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            event,
        }
    }
}

/// Broadcast-based change bus shared by all stores
///
/// Uses `tokio::sync::broadcast` which allows multiple receivers and is
/// designed for exactly this kind of pub/sub pattern.
///
/// The bus is cheap to clone (Arc internally) and can be shared across tasks.
#[derive(Debug, Clone)]
pub struct ChangeBus {
    sender: broadcast::Sender<EventEnvelope>,
}

impl ChangeBus {
    /// Create a new ChangeBus with the given channel capacity
    ///
    /// The capacity determines how many events can be buffered before
    /// slow receivers start losing events (lagged).
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all subscribers
    ///
    /// This is non-blocking and will never fail. If there are no subscribers,
    /// the event is simply dropped.
    ///
    /// Returns the number of receivers at publish time.
    pub fn publish(&self, event: ChangeEvent) -> usize {
        let envelope = EventEnvelope::new(event);
        // send() returns Err only if there are no receivers, which is fine
        self.sender.send(envelope).unwrap_or(0)
    }

    /// Subscribe to store changes
    ///
    /// Returns a subscription that will see all future events published to
    /// the bus. Events published before this call are not received.
    pub fn subscribe(&self) -> Subscription {
        Subscription {
            receiver: self.sender.subscribe(),
        }
    }

    /// Get the current number of active subscribers
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for ChangeBus {
    fn default() -> Self {
        Self::new(1024)
    }
}

/// A subscriber's handle on the change bus
///
/// Wraps the raw broadcast receiver so slow subscribers skip over lagged
/// stretches instead of erroring out of their receive loop.
pub struct Subscription {
    receiver: broadcast::Receiver<EventEnvelope>,
}

impl Subscription {
    /// Receive the next change, or `None` once the bus is gone.
    ///
    /// Lagging is survivable: if this subscriber fell behind the channel
    /// capacity, the skipped stretch is logged and receiving resumes at the
    /// oldest event still buffered.
    pub async fn recv(&mut self) -> Option<EventEnvelope> {
        loop {
            match self.receiver.recv().await {
                Ok(envelope) => return Some(envelope),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!("change subscriber lagged, skipped {} events", skipped);
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Convert into a `Stream` of envelopes for `StreamExt` pipelines.
    ///
    /// Unlike [`recv`](Self::recv), lagged stretches surface as stream errors.
    pub fn into_stream(self) -> BroadcastStream<EventEnvelope> {
        BroadcastStream::new(self.receiver)
    }
}
