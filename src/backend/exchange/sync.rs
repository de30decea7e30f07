//! Replication/sync driver
//!
//! Debounced push of the full local state snapshot to the backing store:
//! rapid mutations coalesce into one write after a quiet period. Readers of
//! the store (the counterparty, a second device) may observe a stale
//! snapshot until the debounce fires. A pending save can be cancelled when
//! the session ends so nothing is written after teardown, or flushed to
//! persist immediately.

use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::backend::store::StateStore;
use crate::shared::types::UserAppState;

#[derive(Clone)]
pub struct SyncDriver {
    inner: Arc<SyncInner>,
}

struct SyncInner {
    user_id: Uuid,
    store: Arc<dyn StateStore>,
    state: Arc<Mutex<UserAppState>>,
    debounce: Duration,
    pending: StdMutex<Option<JoinHandle<()>>>,
}

impl SyncDriver {
    pub fn new(
        user_id: Uuid,
        store: Arc<dyn StateStore>,
        state: Arc<Mutex<UserAppState>>,
        debounce: Duration,
    ) -> Self {
        Self {
            inner: Arc::new(SyncInner { user_id, store, state, debounce, pending: StdMutex::new(None) }),
        }
    }

    /// (Re)arm the debounce timer. Any previously pending save is dropped so
    /// rapid mutations coalesce into the single write that fires after the
    /// quiet period.
    pub fn schedule(&self) {
        let inner = Arc::clone(&self.inner);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(inner.debounce).await;
            push(&inner).await;
        });
        let mut pending = self.inner.pending.lock().unwrap();
        if let Some(previous) = pending.replace(handle) {
            previous.abort();
        }
    }

    /// Persist now, cancelling any pending debounced save first.
    pub async fn flush(&self) {
        self.cancel();
        push(&self.inner).await;
    }

    /// Drop a pending save without writing. Used on logout so nothing lands
    /// after teardown.
    pub fn cancel(&self) {
        if let Some(handle) = self.inner.pending.lock().unwrap().take() {
            handle.abort();
        }
    }
}

/// Snapshot the state under the lock, then write outside it. Write failures
/// are logged and dropped, not retried.
async fn push(inner: &SyncInner) {
    let snapshot = inner.state.lock().await.clone();
    match inner.store.save_state(inner.user_id, &snapshot).await {
        Ok(()) => {
            tracing::debug!("[Sync] persisted state for {}", inner.user_id);
        }
        Err(e) => {
            tracing::warn!("[Sync] failed to persist state for {}: {}", inner.user_id, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::store::MemoryStore;

    fn driver(debounce_ms: u64) -> (SyncDriver, Arc<MemoryStore>, Uuid, Arc<Mutex<UserAppState>>) {
        let store = Arc::new(MemoryStore::new());
        let user_id = Uuid::new_v4();
        let state = Arc::new(Mutex::new(UserAppState::default()));
        let driver = SyncDriver::new(
            user_id,
            store.clone() as Arc<dyn StateStore>,
            state.clone(),
            Duration::from_millis(debounce_ms),
        );
        (driver, store, user_id, state)
    }

    #[tokio::test]
    async fn test_debounce_coalesces_mutations() {
        let (driver, store, user_id, state) = driver(50);

        for _ in 0..5 {
            state.lock().await.mark_seen(Uuid::new_v4());
            driver.schedule();
        }
        // Nothing persisted inside the quiet period.
        assert!(store.get_state(user_id).await.unwrap().is_none());

        tokio::time::sleep(Duration::from_millis(150)).await;
        let stored = store.get_state(user_id).await.unwrap().unwrap();
        assert_eq!(stored.seen_item_ids.len(), 5);
    }

    #[tokio::test]
    async fn test_cancel_drops_pending_save() {
        let (driver, store, user_id, state) = driver(50);

        state.lock().await.mark_seen(Uuid::new_v4());
        driver.schedule();
        driver.cancel();

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert!(store.get_state(user_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_flush_writes_immediately() {
        let (driver, store, user_id, state) = driver(10_000);

        state.lock().await.mark_seen(Uuid::new_v4());
        driver.schedule();
        driver.flush().await;

        let stored = store.get_state(user_id).await.unwrap().unwrap();
        assert_eq!(stored.seen_item_ids.len(), 1);
    }
}
