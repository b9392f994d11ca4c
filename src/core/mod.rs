//! Core module containing the domain records, errors, and change bus

pub mod entity;
pub mod error;
pub mod events;
pub mod id;
pub mod load;

pub use entity::{
    Booking, BookingFilter, BookingStatus, Event, Package, PackageSummary, PartnerBucket,
    PartnerStatus, Service, ServicePartner, UserProfile,
};
pub use error::{FetchError, StoreError, StoreResult};
pub use events::{
    BookingEvent, ChangeBus, ChangeEvent, EventEnvelope, PartnerEvent, SelectionEvent,
    Subscription, WishlistEvent,
};
pub use id::EntityId;
pub use load::LoadPhase;
