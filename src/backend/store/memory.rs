//! In-memory state store
//!
//! Backs tests and local-first operation. Mirrors the document semantics of
//! the durable store: whole-document saves, merge-patch profiles, documents
//! created on first write, `updated_at` stamped by the store.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{StateStore, StoreError};
use crate::shared::types::{ChatMessage, ProfilePatch, UserAppState, UserProfile};

#[derive(Clone, Default)]
pub struct MemoryStore {
    states: Arc<RwLock<HashMap<Uuid, UserAppState>>>,
    profiles: Arc<RwLock<HashMap<Uuid, UserProfile>>>,
    messages: Arc<RwLock<HashMap<Uuid, Vec<ChatMessage>>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StateStore for MemoryStore {
    async fn get_state(&self, user_id: Uuid) -> Result<Option<UserAppState>, StoreError> {
        Ok(self.states.read().await.get(&user_id).cloned())
    }

    async fn save_state(&self, user_id: Uuid, state: &UserAppState) -> Result<(), StoreError> {
        let mut stored = state.clone();
        stored.updated_at = Some(Utc::now());
        self.states.write().await.insert(user_id, stored);
        Ok(())
    }

    async fn get_profile(&self, user_id: Uuid) -> Result<Option<UserProfile>, StoreError> {
        Ok(self.profiles.read().await.get(&user_id).cloned())
    }

    async fn save_profile(&self, user_id: Uuid, patch: &ProfilePatch) -> Result<(), StoreError> {
        let mut profiles = self.profiles.write().await;
        let profile = profiles.entry(user_id).or_insert_with(|| UserProfile::blank(user_id));
        profile.apply(patch);
        Ok(())
    }

    async fn sample_states(
        &self,
        exclude: Uuid,
        cap: usize,
    ) -> Result<Vec<(Uuid, UserAppState)>, StoreError> {
        Ok(self
            .states
            .read()
            .await
            .iter()
            .filter(|(id, _)| **id != exclude)
            .take(cap)
            .map(|(id, state)| (*id, state.clone()))
            .collect())
    }

    async fn append_message(
        &self,
        match_id: Uuid,
        message: &ChatMessage,
    ) -> Result<(), StoreError> {
        self.messages
            .write()
            .await
            .entry(match_id)
            .or_default()
            .push(message.clone());
        Ok(())
    }

    async fn messages(&self, match_id: Uuid) -> Result<Vec<ChatMessage>, StoreError> {
        let mut messages = self
            .messages
            .read()
            .await
            .get(&match_id)
            .cloned()
            .unwrap_or_default();
        messages.sort_by_key(|m| m.timestamp);
        Ok(messages)
    }
}
