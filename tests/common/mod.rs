//! Common test utilities and helpers
//!
//! Shared fixtures for the integration suites: an in-memory store, session
//! bootstrap shortcuts and item/detail builders.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use styleswap::backend::exchange::bootstrap::{open_session, AuthIdentity};
use styleswap::backend::exchange::session::UserSession;
use styleswap::backend::store::{MemoryStore, StateStore};
use styleswap::shared::config::AppConfig;
use styleswap::shared::types::{
    ItemFields, PickupMethod, TransactionPartyDetails,
};

/// Short debounce so suites that wait for the quiet period stay fast.
pub const TEST_DEBOUNCE: Duration = Duration::from_millis(40);

pub fn test_config() -> AppConfig {
    AppConfig::builder()
        .save_debounce(TEST_DEBOUNCE)
        .deck_sample_cap(20)
        .jwt_secret("test-secret".into())
        .build()
        .expect("test config must be valid")
}

pub fn identity(name: &str) -> AuthIdentity {
    AuthIdentity {
        id: Uuid::new_v4(),
        email: format!("{}@example.com", name.to_lowercase()),
        name: Some(name.to_string()),
        avatar: Some(format!("https://i.pravatar.cc/150?u={}", name.to_lowercase())),
    }
}

pub fn memory_store() -> Arc<MemoryStore> {
    Arc::new(MemoryStore::new())
}

/// Bootstrap a session against the shared store.
pub async fn open_test_session(store: &Arc<MemoryStore>, who: &AuthIdentity) -> Arc<UserSession> {
    open_session(store.clone() as Arc<dyn StateStore>, &test_config(), who)
        .await
        .expect("session bootstrap must succeed against the memory store")
}

pub fn item_fields(category: &str, price: i64) -> ItemFields {
    ItemFields {
        image_urls: vec![format!("https://img.example/{}.jpg", category.to_lowercase())],
        category: category.to_string(),
        color: "Blue".to_string(),
        style_tags: vec!["Vintage".to_string()],
        description: None,
        estimated_price: price,
    }
}

pub fn party_details(location: &str) -> TransactionPartyDetails {
    TransactionPartyDetails {
        phone_number: "0912345678".to_string(),
        pickup_method: PickupMethod::SevenEleven,
        pickup_location: location.to_string(),
    }
}

/// Wait out the debounce window so a scheduled save has fired.
pub async fn settle() {
    tokio::time::sleep(TEST_DEBOUNCE * 3).await;
}
