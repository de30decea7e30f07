//! Session bootstrap
//!
//! The authentication collaborator hands us an opaque verified identity;
//! this module turns it into a hydrated session: locate or create the
//! profile document, then pull the state document once (or seed it on first
//! login). A store failure during the pull degrades to an empty default
//! state with a warning instead of blocking the session.

use std::sync::Arc;
use uuid::Uuid;

use super::session::UserSession;
use crate::backend::store::{StateStore, StoreError};
use crate::shared::config::AppConfig;
use crate::shared::types::{ProfilePatch, UserAppState, UserProfile};

/// Verified identity supplied by the auth collaborator on session start.
#[derive(Debug, Clone)]
pub struct AuthIdentity {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub avatar: Option<String>,
}

/// Defaulting rules for a first-time login.
pub fn default_profile(identity: &AuthIdentity) -> UserProfile {
    let local_part = identity.email.split('@').next().unwrap_or("");
    let name = identity
        .name
        .clone()
        .filter(|n| !n.is_empty())
        .or_else(|| (!local_part.is_empty()).then(|| local_part.to_string()))
        .unwrap_or_else(|| "Style Seeker".to_string());

    let username: String = local_part.chars().take(15).collect();
    let avatar = identity.avatar.clone().unwrap_or_else(|| {
        format!(
            "https://ui-avatars.com/api/?name={}&background=random",
            name.replace(' ', "+")
        )
    });

    UserProfile {
        id: identity.id,
        name,
        username: format!("@{}", username),
        avatar,
        email: identity.email.clone(),
        join_date: chrono::Utc::now(),
        phone_number: None,
    }
}

/// Open a session for a verified identity: locate-or-create the profile,
/// then pull-or-seed the state document.
pub async fn open_session(
    store: Arc<dyn StateStore>,
    config: &AppConfig,
    identity: &AuthIdentity,
) -> Result<Arc<UserSession>, StoreError> {
    let profile = match store.get_profile(identity.id).await? {
        Some(profile) => profile,
        None => {
            let profile = default_profile(identity);
            store.save_profile(identity.id, &ProfilePatch::full(&profile)).await?;
            tracing::info!("[Bootstrap] created profile for {}", identity.id);
            profile
        }
    };

    let state = match store.get_state(identity.id).await {
        Ok(Some(state)) => state,
        Ok(None) => {
            // First login: seed an empty state document.
            let state = UserAppState::default();
            store.save_state(identity.id, &state).await?;
            state
        }
        Err(e) => {
            tracing::warn!(
                "[Bootstrap] failed to load state for {}, falling back to defaults: {}",
                identity.id,
                e
            );
            UserAppState::default()
        }
    };

    Ok(UserSession::new(store, profile, state, config.save_debounce))
}
