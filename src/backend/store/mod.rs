//! Entity store accessors
//!
//! The backing store is document-oriented: one JSON state document per user,
//! one profile document per user, and a per-match message log. There are no
//! joins and no cross-document transactions; reads and writes are
//! whole-document with last-writer-wins semantics, and a save may create the
//! document.
//!
//! Two implementations: [`MemoryStore`] for tests and local-first operation,
//! and [`PostgresStore`] for durable storage via sqlx.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::shared::types::{ChatMessage, ProfilePatch, UserAppState, UserProfile};

pub use memory::MemoryStore;
pub use postgres::PostgresStore;

/// Store I/O failures. Callers degrade rather than block: reads fall back to
/// a default state with a warning, debounced writes are logged and dropped.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Whole-document access to per-user state, profiles and chat logs.
///
/// No optimistic-concurrency token is used; the last writer wins. Profile
/// saves are merge-patches (absent fields preserved); state saves replace
/// the full document and stamp `updated_at`.
#[async_trait]
pub trait StateStore: Send + Sync {
    async fn get_state(&self, user_id: Uuid) -> Result<Option<UserAppState>, StoreError>;

    async fn save_state(&self, user_id: Uuid, state: &UserAppState) -> Result<(), StoreError>;

    async fn get_profile(&self, user_id: Uuid) -> Result<Option<UserProfile>, StoreError>;

    async fn save_profile(&self, user_id: Uuid, patch: &ProfilePatch) -> Result<(), StoreError>;

    /// A bounded sample of other users' state documents, in arbitrary store
    /// order, for deck building. Never includes `exclude`.
    async fn sample_states(
        &self,
        exclude: Uuid,
        cap: usize,
    ) -> Result<Vec<(Uuid, UserAppState)>, StoreError>;

    async fn append_message(&self, match_id: Uuid, message: &ChatMessage)
        -> Result<(), StoreError>;

    /// All messages for a match, ordered by timestamp ascending.
    async fn messages(&self, match_id: Uuid) -> Result<Vec<ChatMessage>, StoreError>;
}
