//! Domain records flowing through the stores
//!
//! These are the shapes the transport hands back and the stores cache. The
//! catalog hierarchy is Event -> Service -> Package; bookings and service
//! partners are flat collections with a status axis each.
//!
//! Parent links are modeled as `Option<EntityId>` at rest, and the accessor
//! methods additionally treat a blank identifier as absent. A record with a
//! missing parent link still renders at its own level; only the upward
//! propagation is skipped.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::id::EntityId;

/// A bookable occasion (wedding, corporate party, birthday).
///
/// Root of the selection hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// A service category offered under an event (catering, photography, decor).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: EntityId,
    pub name: String,
    /// Link to the owning event. May be absent or blank on degraded payloads.
    #[serde(default)]
    pub event_id: Option<EntityId>,
}

impl Service {
    /// Parent event link, with blank identifiers treated as absent.
    pub fn parent_event_id(&self) -> Option<&EntityId> {
        EntityId::filter_valid(self.event_id.as_ref())
    }
}

/// A concrete purchasable offering under a service.
///
/// Leaf of the selection hierarchy. Carries both parent links so selecting a
/// package can cascade upward without extra lookups of the link chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Package {
    pub id: EntityId,
    pub name: String,
    /// Price in minor currency units (cents).
    #[serde(default)]
    pub price: Option<i64>,
    #[serde(default)]
    pub details: Option<String>,
    /// Link to the owning event. May be absent or blank on degraded payloads.
    #[serde(default)]
    pub event_id: Option<EntityId>,
    /// Link to the owning service. May be absent or blank on degraded payloads.
    #[serde(default)]
    pub service_id: Option<EntityId>,
}

impl Package {
    /// Parent event link, with blank identifiers treated as absent.
    pub fn parent_event_id(&self) -> Option<&EntityId> {
        EntityId::filter_valid(self.event_id.as_ref())
    }

    /// Parent service link, with blank identifiers treated as absent.
    pub fn parent_service_id(&self) -> Option<&EntityId> {
        EntityId::filter_valid(self.service_id.as_ref())
    }
}

/// Lifecycle states of a booking, in the order the work advances.
///
/// The set is closed: the backend sends exactly these five values, and the
/// wire format is the lowercase snake_case name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Booked,
    InProgress,
    DeliverablesReady,
    Completed,
    Cancelled,
}

impl BookingStatus {
    /// All statuses in lifecycle order.
    pub const ALL: [BookingStatus; 5] = [
        BookingStatus::Booked,
        BookingStatus::InProgress,
        BookingStatus::DeliverablesReady,
        BookingStatus::Completed,
        BookingStatus::Cancelled,
    ];

    /// Human-readable label for tabs and headings.
    pub fn label(&self) -> &'static str {
        match self {
            BookingStatus::Booked => "Booked",
            BookingStatus::InProgress => "In Progress",
            BookingStatus::DeliverablesReady => "Deliverables Ready",
            BookingStatus::Completed => "Completed",
            BookingStatus::Cancelled => "Cancelled",
        }
    }
}

/// Which slice of the booking collection a view wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BookingFilter {
    /// Every booking, regardless of status.
    #[default]
    All,
    /// Only bookings in the given status.
    Status(BookingStatus),
}

impl BookingFilter {
    pub fn matches(&self, status: BookingStatus) -> bool {
        match self {
            BookingFilter::All => true,
            BookingFilter::Status(wanted) => *wanted == status,
        }
    }
}

/// A customer's booking of a package.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: EntityId,
    pub status: BookingStatus,
    pub package_id: EntityId,
    #[serde(default)]
    pub service_id: Option<EntityId>,
    #[serde(default)]
    pub event_id: Option<EntityId>,
    pub customer_id: EntityId,
    pub created_at: DateTime<Utc>,
}

/// Membership states of a service partner.
///
/// Unlike [`BookingStatus`] this set is open on the wire: the backend grows
/// new states ahead of client releases, so anything unknown deserializes to
/// [`PartnerStatus::Unrecognized`] instead of failing the whole payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartnerStatus {
    Pending,
    Active,
    Inactive,
    #[serde(other)]
    Unrecognized,
}

impl PartnerStatus {
    /// The display bucket this status belongs to, or `None` for statuses the
    /// client does not know how to present.
    pub fn bucket(&self) -> Option<PartnerBucket> {
        match self {
            PartnerStatus::Pending => Some(PartnerBucket::Pending),
            PartnerStatus::Active => Some(PartnerBucket::Active),
            PartnerStatus::Inactive => Some(PartnerBucket::Inactive),
            PartnerStatus::Unrecognized => None,
        }
    }
}

/// The three partner tabs an admin view renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartnerBucket {
    Pending,
    Active,
    Inactive,
}

impl PartnerBucket {
    pub const ALL: [PartnerBucket; 3] = [
        PartnerBucket::Pending,
        PartnerBucket::Active,
        PartnerBucket::Inactive,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PartnerBucket::Pending => "Pending",
            PartnerBucket::Active => "Active",
            PartnerBucket::Inactive => "Inactive",
        }
    }
}

/// A vendor providing services through the platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServicePartner {
    pub id: EntityId,
    pub status: PartnerStatus,
    pub name: String,
    /// Trade the partner practices (caterer, florist, photographer).
    #[serde(default)]
    pub craft: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    pub joined_at: DateTime<Utc>,
}

/// Compact package shape carried in wishlist payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageSummary {
    pub id: EntityId,
    pub name: String,
    /// Price in minor currency units (cents).
    #[serde(default)]
    pub price: Option<i64>,
}

/// The signed-in customer, as the wishlist store sees them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub wishlist: Vec<PackageSummary>,
}
