//! Deck builder
//!
//! Builds the swipeable candidate list. Two strategies, both valid: filter a
//! preloaded local pool, or sample a bounded number of other users' state
//! documents from the store and flatten their closets. Either way the deck
//! never contains the caller's own items or anything already in the
//! seen-set, and ordering follows pool/sample order (not stable across
//! rebuilds if the underlying pool changed).

use std::collections::BTreeSet;
use uuid::Uuid;

use crate::backend::store::{StateStore, StoreError};
use crate::shared::types::ClothingItem;

/// Local strategy: filter a preloaded candidate pool.
pub fn deck_from_pool(
    pool: &[ClothingItem],
    my_user_id: Uuid,
    seen: &BTreeSet<Uuid>,
) -> Vec<ClothingItem> {
    pool.iter()
        .filter(|item| item.user_id != my_user_id && !seen.contains(&item.id))
        .cloned()
        .collect()
}

/// Remote strategy: sample up to `cap` other users (arbitrary store order)
/// and flatten their closets. The cap bounds cost; it is not a coverage
/// guarantee.
pub async fn build_deck(
    store: &dyn StateStore,
    my_user_id: Uuid,
    seen: &BTreeSet<Uuid>,
    cap: usize,
) -> Result<Vec<ClothingItem>, StoreError> {
    let sample = store.sample_states(my_user_id, cap).await?;
    let mut deck = Vec::new();
    for (_, state) in sample {
        deck.extend(state.my_closet);
    }
    tracing::debug!("[Deck] sampled {} candidate items for {}", deck.len(), my_user_id);
    Ok(deck
        .into_iter()
        .filter(|item| item.user_id != my_user_id && !seen.contains(&item.id))
        .collect())
}
