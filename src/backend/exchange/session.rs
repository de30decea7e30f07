//! In-memory user session
//!
//! Holds one user's hydrated state between HTTP requests: the profile, the
//! state document, the pending swipe deck and the sync driver that persists
//! mutations. Mutations are applied synchronously under the state lock and
//! are immediately visible to the session; persistence is debounced.

use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::backend::exchange::swipe::SwipeSession;
use crate::backend::exchange::sync::SyncDriver;
use crate::backend::store::{StateStore, StoreError};
use crate::shared::types::{ClothingItem, ProfilePatch, UserAppState, UserProfile};

pub struct UserSession {
    user_id: Uuid,
    store: Arc<dyn StateStore>,
    profile: RwLock<UserProfile>,
    state: Arc<Mutex<UserAppState>>,
    sync: SyncDriver,
    swipe: StdMutex<Option<SwipeSession>>,
}

impl UserSession {
    pub fn new(
        store: Arc<dyn StateStore>,
        profile: UserProfile,
        state: UserAppState,
        debounce: Duration,
    ) -> Arc<Self> {
        let user_id = profile.id;
        let state = Arc::new(Mutex::new(state));
        let sync = SyncDriver::new(user_id, store.clone(), state.clone(), debounce);
        Arc::new(Self {
            user_id,
            store,
            profile: RwLock::new(profile),
            state,
            sync,
            swipe: StdMutex::new(None),
        })
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn store(&self) -> &Arc<dyn StateStore> {
        &self.store
    }

    pub async fn profile(&self) -> UserProfile {
        self.profile.read().await.clone()
    }

    /// Apply a profile patch and persist it immediately; profile writes are
    /// not debounced.
    pub async fn update_profile(&self, patch: &ProfilePatch) -> Result<UserProfile, StoreError> {
        let updated = {
            let mut profile = self.profile.write().await;
            profile.apply(patch);
            profile.clone()
        };
        self.store.save_profile(self.user_id, patch).await?;
        Ok(updated)
    }

    pub async fn snapshot(&self) -> UserAppState {
        self.state.lock().await.clone()
    }

    /// Read the state without scheduling a save.
    pub async fn peek<R>(&self, f: impl FnOnce(&UserAppState) -> R) -> R {
        let state = self.state.lock().await;
        f(&state)
    }

    /// Mutate the state and arm the debounced save.
    pub async fn mutate<R>(&self, f: impl FnOnce(&mut UserAppState) -> R) -> R {
        let result = {
            let mut state = self.state.lock().await;
            f(&mut state)
        };
        self.sync.schedule();
        result
    }

    /// Persist the current state now.
    pub async fn flush(&self) {
        self.sync.flush().await;
    }

    /// Drop any pending debounced save; called on logout.
    pub fn cancel_pending_save(&self) {
        self.sync.cancel();
    }

    // --- swipe deck ---

    /// Install a freshly-built deck, restarting the swipe cursor.
    pub fn set_deck(&self, deck: Vec<ClothingItem>) {
        *self.swipe.lock().unwrap() = Some(SwipeSession::new(deck));
    }

    /// Run `f` against the active swipe session, if a deck has been built.
    pub fn with_swipe<R>(&self, f: impl FnOnce(&mut SwipeSession) -> R) -> Option<R> {
        self.swipe.lock().unwrap().as_mut().map(f)
    }
}
