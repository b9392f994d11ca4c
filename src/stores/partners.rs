//! Service partners partitioned into lifecycle buckets

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::client::PartnerApi;
use crate::core::entity::{PartnerBucket, ServicePartner};
use crate::core::error::StoreResult;
use crate::core::events::{ChangeBus, ChangeEvent, PartnerEvent};
use crate::core::load::LoadPhase;

/// The partner collection split by lifecycle status.
///
/// The three buckets partition the recognized partners of one fetch: every
/// recognized partner lands in exactly one bucket, and the buckets' union is
/// the recognized subset in fetch order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartnerBuckets {
    pub pending: Vec<ServicePartner>,
    pub active: Vec<ServicePartner>,
    pub inactive: Vec<ServicePartner>,
}

impl PartnerBuckets {
    pub fn get(&self, bucket: PartnerBucket) -> &[ServicePartner] {
        match bucket {
            PartnerBucket::Pending => &self.pending,
            PartnerBucket::Active => &self.active,
            PartnerBucket::Inactive => &self.inactive,
        }
    }

    pub fn counts(&self) -> BucketCounts {
        BucketCounts {
            pending: self.pending.len(),
            active: self.active.len(),
            inactive: self.inactive.len(),
        }
    }

    fn is_empty(&self) -> bool {
        self.pending.is_empty() && self.active.is_empty() && self.inactive.is_empty()
    }
}

/// Per-bucket sizes, for tab badges
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BucketCounts {
    pub pending: usize,
    pub active: usize,
    pub inactive: usize,
}

impl BucketCounts {
    pub fn total(&self) -> usize {
        self.pending + self.active + self.inactive
    }
}

/// Split fetched partners into buckets by status.
///
/// A partner whose status has no bucket is logged and discarded; it must not
/// silently join a wrong bucket. Returns the buckets and the discard count.
fn partition(partners: Vec<ServicePartner>) -> (PartnerBuckets, usize) {
    let mut buckets = PartnerBuckets::default();
    let mut discarded = 0;
    for partner in partners {
        match partner.status.bucket() {
            Some(PartnerBucket::Pending) => buckets.pending.push(partner),
            Some(PartnerBucket::Active) => buckets.active.push(partner),
            Some(PartnerBucket::Inactive) => buckets.inactive.push(partner),
            None => {
                tracing::warn!(id = %partner.id, "discarding partner with unrecognized status");
                discarded += 1;
            }
        }
    }
    (buckets, discarded)
}

#[derive(Default)]
struct PartnerState {
    buckets: PartnerBuckets,
    selected: Option<PartnerBucket>,
    phase: LoadPhase,
}

/// Store of partitioned service partners and the viewed bucket
///
/// Partitioning happens once at fetch time; bucket selection afterwards is a
/// pure choice between the precomputed buckets, never a re-partition. Same
/// cache lifecycle as the booking store: fetched whole, kept until the next
/// refresh, stale on failure rather than blanked.
#[derive(Clone)]
pub struct PartnerStore {
    state: Arc<RwLock<PartnerState>>,
    api: Arc<dyn PartnerApi>,
    bus: ChangeBus,
}

impl PartnerStore {
    pub fn new(api: Arc<dyn PartnerApi>, bus: ChangeBus) -> Self {
        Self {
            state: Arc::new(RwLock::new(PartnerState::default())),
            api,
            bus,
        }
    }

    /// Fetch all partners and partition them, replacing the buckets.
    ///
    /// On success returns the per-bucket counts and publishes one `Loaded`
    /// event (which also carries how many records were discarded for an
    /// unrecognized status). On failure the previous buckets survive; the
    /// phase falls to `Failed` only when they were empty.
    pub async fn refresh(&self) -> StoreResult<BucketCounts> {
        {
            let mut state = self.state.write().await;
            state.phase = LoadPhase::Loading;
        }

        match self.api.fetch_all_partners().await {
            Ok(partners) => {
                let (buckets, discarded) = partition(partners);
                let counts = buckets.counts();
                let mut state = self.state.write().await;
                state.buckets = buckets;
                state.phase = LoadPhase::Ready;
                drop(state);

                self.bus
                    .publish(ChangeEvent::Partners(PartnerEvent::Loaded {
                        pending: counts.pending,
                        active: counts.active,
                        inactive: counts.inactive,
                        discarded,
                    }));
                Ok(counts)
            }
            Err(err) => {
                let mut state = self.state.write().await;
                state.phase = LoadPhase::after_failure(!state.buckets.is_empty());
                Err(err.into())
            }
        }
    }

    /// Choose which precomputed bucket the UI renders. No refetch.
    pub async fn set_bucket(&self, bucket: PartnerBucket) {
        let mut state = self.state.write().await;
        if state.selected == Some(bucket) {
            return;
        }
        state.selected = Some(bucket);
        drop(state);

        self.bus
            .publish(ChangeEvent::Partners(PartnerEvent::BucketChanged {
                bucket: Some(bucket),
            }));
    }

    /// Deselect the bucket; [`active_bucket_partners`](Self::active_bucket_partners)
    /// goes empty.
    pub async fn clear_bucket(&self) {
        let mut state = self.state.write().await;
        if state.selected.is_none() {
            return;
        }
        state.selected = None;
        drop(state);

        self.bus
            .publish(ChangeEvent::Partners(PartnerEvent::BucketChanged {
                bucket: None,
            }));
    }

    /// The selected bucket's partners, or empty when none is selected
    pub async fn active_bucket_partners(&self) -> Vec<ServicePartner> {
        let state = self.state.read().await;
        match state.selected {
            Some(bucket) => state.buckets.get(bucket).to_vec(),
            None => Vec::new(),
        }
    }

    /// All three buckets, cloned
    pub async fn buckets(&self) -> PartnerBuckets {
        self.state.read().await.buckets.clone()
    }

    /// Per-bucket sizes, derived on read
    pub async fn counts(&self) -> BucketCounts {
        self.state.read().await.buckets.counts()
    }

    pub async fn selected_bucket(&self) -> Option<PartnerBucket> {
        self.state.read().await.selected
    }

    pub async fn phase(&self) -> LoadPhase {
        self.state.read().await.phase
    }

    /// Drop the buckets, the selection, and the phase back to initial state.
    pub async fn reset(&self) {
        let mut state = self.state.write().await;
        let pristine = state.buckets.is_empty()
            && state.selected.is_none()
            && state.phase == LoadPhase::Uninitialized;
        if pristine {
            return;
        }
        *state = PartnerState::default();
        drop(state);

        self.bus
            .publish(ChangeEvent::Partners(PartnerEvent::Cleared));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{Endpoint, InMemoryApi};
    use crate::core::entity::PartnerStatus;
    use crate::core::id::EntityId;
    use chrono::Utc;

    fn partner(id: &str, status: PartnerStatus) -> ServicePartner {
        ServicePartner {
            id: EntityId::from(id),
            status,
            name: format!("partner {id}"),
            craft: Some("caterer".to_string()),
            email: None,
            phone: None,
            joined_at: Utc::now(),
        }
    }

    fn store() -> (PartnerStore, InMemoryApi) {
        let api = InMemoryApi::new();
        let store = PartnerStore::new(Arc::new(api.clone()), ChangeBus::new(64));
        (store, api)
    }

    #[tokio::test]
    async fn test_partition_is_exhaustive_over_recognized_statuses() {
        let (store, api) = store();
        api.seed_partners(vec![
            partner("p-1", PartnerStatus::Active),
            partner("p-2", PartnerStatus::Pending),
            partner("p-3", PartnerStatus::Active),
            partner("p-4", PartnerStatus::Inactive),
        ])
        .await;

        let counts = store.refresh().await.unwrap();

        assert_eq!(counts.pending, 1);
        assert_eq!(counts.active, 2);
        assert_eq!(counts.inactive, 1);
        assert_eq!(counts.total(), 4);

        // Buckets keep fetch order within themselves.
        let buckets = store.buckets().await;
        let active_ids: Vec<&str> = buckets.active.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(active_ids, vec!["p-1", "p-3"]);
    }

    #[tokio::test]
    async fn test_unrecognized_status_is_discarded_not_misfiled() {
        let (store, api) = store();
        api.seed_partners(vec![
            partner("p-1", PartnerStatus::Active),
            partner("p-2", PartnerStatus::Unrecognized),
            partner("p-3", PartnerStatus::Pending),
        ])
        .await;

        let counts = store.refresh().await.unwrap();

        assert_eq!(counts.total(), 2);
        let buckets = store.buckets().await;
        assert!(
            !PartnerBucket::ALL
                .iter()
                .any(|b| buckets.get(*b).iter().any(|p| p.id.as_str() == "p-2"))
        );
    }

    #[tokio::test]
    async fn test_bucket_selection_is_pure_and_defaults_empty() {
        let (store, api) = store();
        api.seed_partners(vec![
            partner("p-1", PartnerStatus::Active),
            partner("p-2", PartnerStatus::Pending),
        ])
        .await;
        store.refresh().await.unwrap();

        // No bucket selected yet.
        assert!(store.active_bucket_partners().await.is_empty());

        store.set_bucket(PartnerBucket::Active).await;
        let shown = store.active_bucket_partners().await;
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].id.as_str(), "p-1");

        store.clear_bucket().await;
        assert!(store.active_bucket_partners().await.is_empty());
        assert!(store.selected_bucket().await.is_none());
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_previous_buckets() {
        let (store, api) = store();
        api.seed_partners(vec![partner("p-1", PartnerStatus::Active)]).await;
        store.refresh().await.unwrap();

        api.fail_next(Endpoint::Partners).await;
        assert!(store.refresh().await.is_err());

        assert_eq!(store.phase().await, LoadPhase::Ready);
        assert_eq!(store.counts().await.active, 1);
    }

    #[tokio::test]
    async fn test_failed_refresh_from_empty_is_failed() {
        let (store, api) = store();
        api.fail_next(Endpoint::Partners).await;

        assert!(store.refresh().await.is_err());
        assert_eq!(store.phase().await, LoadPhase::Failed);
    }

    #[tokio::test]
    async fn test_reset_returns_to_initial_state() {
        let (store, api) = store();
        api.seed_partners(vec![partner("p-1", PartnerStatus::Active)]).await;
        store.refresh().await.unwrap();
        store.set_bucket(PartnerBucket::Active).await;

        store.reset().await;

        assert_eq!(store.phase().await, LoadPhase::Uninitialized);
        assert!(store.selected_bucket().await.is_none());
        assert_eq!(store.counts().await.total(), 0);
    }
}
