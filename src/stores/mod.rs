//! The four domain stores

pub mod bookings;
pub mod partners;
pub mod selection;
pub mod wishlist;

pub use bookings::{BookingStore, filter_bookings};
pub use partners::{BucketCounts, PartnerBuckets, PartnerStore};
pub use selection::{SelectOutcome, SelectionStore};
pub use wishlist::WishlistStore;
