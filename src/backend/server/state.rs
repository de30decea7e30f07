/**
 * Application State Management
 *
 * This module defines the application state structure and implements the
 * `FromRef` traits for Axum state extraction.
 *
 * # Architecture
 *
 * `AppState` is the central state container:
 * - the injected configuration object
 * - the backing document store (trait object: Postgres or in-memory)
 * - the registry of hydrated user sessions
 * - per-match chat broadcast channels
 * - the optional AI tagging collaborator
 *
 * # Thread Safety
 *
 * All fields are designed for concurrent access: the store and tagger are
 * `Arc`-shared trait objects, the session registry is `Arc<RwLock<..>>`,
 * and the chat broadcast state clones cheaply.
 */

use axum::extract::FromRef;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::backend::chat::state::ChatBroadcastState;
use crate::backend::exchange::session::UserSession;
use crate::backend::store::StateStore;
use crate::backend::tagging::ItemTagger;
use crate::shared::config::AppConfig;

/// Registry of hydrated per-user sessions.
///
/// A session appears here after the user opens it (POST /api/session) and
/// leaves on logout, which also cancels its pending debounced save.
#[derive(Clone, Default)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<Uuid, Arc<UserSession>>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, user_id: Uuid) -> Option<Arc<UserSession>> {
        self.sessions.read().await.get(&user_id).cloned()
    }

    pub async fn insert(&self, session: Arc<UserSession>) {
        self.sessions.write().await.insert(session.user_id(), session);
    }

    /// Remove and return the session, if open.
    pub async fn remove(&self, user_id: Uuid) -> Option<Arc<UserSession>> {
        self.sessions.write().await.remove(&user_id)
    }
}

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Configuration built at startup; re-initialization means building a
    /// new `AppState` from a new config.
    pub config: AppConfig,

    /// Backing document store.
    pub store: Arc<dyn StateStore>,

    /// Hydrated user sessions.
    pub sessions: SessionRegistry,

    /// Per-match chat broadcast channels.
    pub chat: ChatBroadcastState,

    /// AI tagging collaborator; `None` when not configured, in which case
    /// clients always enter item fields manually.
    pub tagger: Option<Arc<dyn ItemTagger>>,
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.config.clone()
    }
}

impl FromRef<AppState> for Arc<dyn StateStore> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.store.clone()
    }
}

impl FromRef<AppState> for SessionRegistry {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.sessions.clone()
    }
}

impl FromRef<AppState> for ChatBroadcastState {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.chat.clone()
    }
}
