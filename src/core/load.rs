//! Load lifecycle shared by the collection stores

use serde::{Deserialize, Serialize};

/// Where a collection store is in its fetch lifecycle.
///
/// The phases move `Uninitialized -> Loading -> Ready | Failed`. A refresh
/// from `Ready` goes back through `Loading`, and a refresh that fails while
/// a cache exists lands back in `Ready`: the stale cache keeps rendering and
/// the failure is reported through the operation's return value instead.
/// `Failed` is only reachable when there is nothing cached to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadPhase {
    /// No fetch attempted yet.
    #[default]
    Uninitialized,
    /// A fetch is in flight.
    Loading,
    /// Data is available (possibly stale after a failed refresh).
    Ready,
    /// The last fetch failed and there is no cache to fall back on.
    Failed,
}

impl LoadPhase {
    pub fn is_ready(&self) -> bool {
        matches!(self, LoadPhase::Ready)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, LoadPhase::Loading)
    }

    /// Phase to adopt after a failed fetch, given whether a cache survives.
    pub(crate) fn after_failure(has_cache: bool) -> LoadPhase {
        if has_cache {
            LoadPhase::Ready
        } else {
            LoadPhase::Failed
        }
    }
}
