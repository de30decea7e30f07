//! Exchange engine
//!
//! The matching and per-user state model: deck building, the swipe state
//! machine, request/swap negotiation, handoff transactions, the debounced
//! replication driver and the replica reconciliation sweep.
//!
//! # Consistency model
//!
//! Mutations apply to the in-memory session state synchronously and are
//! persisted by a debounced save. Cross-user effects (request delivery,
//! match creation, mirrored status changes) write the counterparty's
//! document directly at decision time, bypassing the debounce. The two
//! writes of a mirrored mutation are independent best-effort operations:
//! when the mirror write fails it is logged and left for the
//! reconciliation sweep, not rolled back.

pub mod bootstrap;
pub mod closet;
pub mod deck;
pub mod handlers;
pub mod negotiation;
pub mod reconcile;
pub mod session;
pub mod swipe;
pub mod sync;
pub mod transaction;

use thiserror::Error;
use uuid::Uuid;

use crate::backend::store::{StateStore, StoreError};
use crate::shared::error::SharedError;
use crate::shared::types::UserAppState;

pub use session::UserSession;
pub use swipe::{SwipeDirection, SwipeSession};

#[derive(Debug, Error)]
pub enum ExchangeError {
    /// A referenced request/match/transaction vanished, typically resolved
    /// concurrently from another device. Callers treat this as stale and
    /// refresh.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Swipe arrived with no deck built for the session.
    #[error("no active swipe deck")]
    NoDeck,

    /// Swipe past the last card. Distinct from an empty deck.
    #[error("deck exhausted")]
    DeckExhausted,

    #[error(transparent)]
    Validation(#[from] SharedError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Load-modify-save a counterparty's document, bypassing any debounce.
///
/// Returns whether the write landed. A failure leaves the replicas
/// divergent until [`reconcile`](crate::backend::exchange::reconcile)
/// repairs them; it is logged, never rolled back.
pub(crate) async fn write_counterparty<F>(
    store: &dyn StateStore,
    counterparty: Uuid,
    label: &str,
    mutate: F,
) -> bool
where
    F: FnOnce(&mut UserAppState),
{
    let mut state = match store.get_state(counterparty).await {
        Ok(state) => state.unwrap_or_default(),
        Err(e) => {
            tracing::warn!(
                "[Exchange] {}: failed to load counterparty {} document: {}",
                label,
                counterparty,
                e
            );
            return false;
        }
    };
    mutate(&mut state);
    match store.save_state(counterparty, &state).await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(
                "[Exchange] {}: mirror write to {} failed, replicas may diverge: {}",
                label,
                counterparty,
                e
            );
            false
        }
    }
}
