//! Wishlist membership for the signed-in user
//!
//! The wishlist is semantically a set: no duplicates, membership is the only
//! meaningful query. It arrives as a sequence of package summaries on the
//! user's profile and is kept as an `IndexSet` so display order survives the
//! set semantics.
//!
//! Mutations are optimistic. `add` and `remove` commit locally first, then
//! confirm with the remote collaborator; the failure branch applies the
//! compensating inverse (remove what was added, re-insert what was removed at
//! its original position) and returns the error, so the set never stays
//! inconsistent with the server.

use std::sync::Arc;

use indexmap::IndexSet;
use tokio::sync::RwLock;

use crate::client::WishlistApi;
use crate::core::entity::UserProfile;
use crate::core::error::{StoreError, StoreResult};
use crate::core::events::{ChangeBus, ChangeEvent, WishlistEvent};
use crate::core::id::EntityId;

#[derive(Default)]
struct WishlistState {
    user_id: Option<EntityId>,
    items: IndexSet<EntityId>,
}

/// Store of the authenticated user's wishlist set
#[derive(Clone)]
pub struct WishlistStore {
    state: Arc<RwLock<WishlistState>>,
    api: Arc<dyn WishlistApi>,
    bus: ChangeBus,
}

impl WishlistStore {
    pub fn new(api: Arc<dyn WishlistApi>, bus: ChangeBus) -> Self {
        Self {
            state: Arc::new(RwLock::new(WishlistState::default())),
            api,
            bus,
        }
    }

    /// Populate from a fetched user profile (login or re-fetch).
    ///
    /// Duplicates in the payload collapse, blank identifiers are dropped, and
    /// the payload's order is kept.
    pub async fn set_user(&self, profile: &UserProfile) {
        let mut state = self.state.write().await;
        state.user_id = Some(profile.id.clone());
        state.items = profile
            .wishlist
            .iter()
            .filter(|summary| !summary.id.is_blank())
            .map(|summary| summary.id.clone())
            .collect();
        let items = state.items.len();
        drop(state);

        self.bus
            .publish(ChangeEvent::Wishlist(WishlistEvent::Loaded {
                user_id: profile.id.clone(),
                items,
            }));
    }

    /// Drop the user and their wishlist (sign-out).
    pub async fn clear_user(&self) {
        let mut state = self.state.write().await;
        if state.user_id.is_none() {
            return;
        }
        state.user_id = None;
        state.items.clear();
        drop(state);

        self.bus
            .publish(ChangeEvent::Wishlist(WishlistEvent::Cleared));
    }

    /// Pure membership test; `false` when no user is signed in.
    pub async fn is_wishlisted(&self, package_id: &EntityId) -> bool {
        let state = self.state.read().await;
        state.user_id.is_some() && state.items.contains(package_id)
    }

    /// Add a package to the wishlist.
    ///
    /// Inserts locally, then confirms remotely; a remote failure rolls the
    /// insertion back and returns the error. Adding a package that is already
    /// a member is a no-op that skips the remote call. With no signed-in user
    /// this is `Err(StoreError::SignedOut)`.
    pub async fn add(&self, package_id: &EntityId) -> StoreResult<()> {
        let user_id = {
            let mut state = self.state.write().await;
            let user_id = state.user_id.clone().ok_or(StoreError::SignedOut)?;
            if !state.items.insert(package_id.clone()) {
                return Ok(());
            }
            user_id
        };

        match self.api.add_item(&user_id, package_id).await {
            Ok(()) => {
                self.bus
                    .publish(ChangeEvent::Wishlist(WishlistEvent::Added {
                        user_id,
                        package_id: package_id.clone(),
                    }));
                Ok(())
            }
            Err(err) => {
                tracing::warn!(package = %package_id, error = %err, "wishlist add rejected, rolling back");
                let mut state = self.state.write().await;
                // Only compensate if the same user still owns the set.
                if state.user_id.as_ref() == Some(&user_id) {
                    state.items.shift_remove(package_id);
                }
                Err(err.into())
            }
        }
    }

    /// Remove a package from the wishlist.
    ///
    /// Removes locally, then confirms remotely; a remote failure re-inserts
    /// the package at its original position. Removing a non-member is a no-op
    /// `Ok`. With no signed-in user this is `Err(StoreError::SignedOut)`.
    pub async fn remove(&self, package_id: &EntityId) -> StoreResult<()> {
        let (user_id, index) = {
            let mut state = self.state.write().await;
            let user_id = state.user_id.clone().ok_or(StoreError::SignedOut)?;
            match state.items.shift_remove_full(package_id) {
                Some((index, _)) => (user_id, index),
                None => return Ok(()),
            }
        };

        match self.api.remove_item(&user_id, package_id).await {
            Ok(()) => {
                self.bus
                    .publish(ChangeEvent::Wishlist(WishlistEvent::Removed {
                        user_id,
                        package_id: package_id.clone(),
                    }));
                Ok(())
            }
            Err(err) => {
                tracing::warn!(package = %package_id, error = %err, "wishlist remove rejected, rolling back");
                let mut state = self.state.write().await;
                if state.user_id.as_ref() == Some(&user_id) {
                    // The set may have shrunk while the call was out.
                    let index = index.min(state.items.len());
                    state.items.shift_insert(index, package_id.clone());
                }
                Err(err.into())
            }
        }
    }

    /// The wishlisted package ids, in display order
    pub async fn items(&self) -> Vec<EntityId> {
        self.state.read().await.items.iter().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.items.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.read().await.items.is_empty()
    }

    /// The signed-in user's id, if any
    pub async fn user_id(&self) -> Option<EntityId> {
        self.state.read().await.user_id.clone()
    }
}
