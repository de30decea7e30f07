/**
 * Server Initialization
 *
 * Builds the Axum application from an injected `AppConfig`: backing store,
 * session registry, chat broadcast channels, the optional tagging
 * collaborator, and the router.
 *
 * # Error Handling
 *
 * Initialization is resilient: a missing database degrades to the
 * in-memory store, a missing tagging endpoint disables AI suggestions.
 */

use axum::Router;
use std::sync::Arc;

use crate::backend::chat::state::ChatBroadcastState;
use crate::backend::routes::router::create_router;
use crate::backend::server::config::load_store;
use crate::backend::server::state::{AppState, SessionRegistry};
use crate::backend::tagging::{HttpTagger, ItemTagger};
use crate::shared::config::AppConfig;

/// Interval between sweeps for chat channels whose last subscriber is gone.
const CHANNEL_CLEANUP_INTERVAL: std::time::Duration = std::time::Duration::from_secs(300);

/// Create and configure the Axum application
pub async fn create_app(config: AppConfig) -> Router<()> {
    tracing::info!("Initializing styleswap backend server");

    let store = load_store(&config).await;

    let tagger: Option<Arc<dyn ItemTagger>> = config.tagging_endpoint.clone().map(|endpoint| {
        tracing::info!("AI tagging collaborator configured at {}", endpoint);
        Arc::new(HttpTagger::new(endpoint, config.tagging_api_key.clone())) as Arc<dyn ItemTagger>
    });
    if tagger.is_none() {
        tracing::info!("No tagging endpoint configured; item fields are manual-entry only");
    }

    let app_state = AppState {
        config,
        store,
        sessions: SessionRegistry::new(),
        chat: ChatBroadcastState::new(),
        tagger,
    };

    let app = create_router(app_state.clone());

    // Periodically prune chat channels nobody listens to anymore.
    let cleanup_state = app_state.chat.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(CHANNEL_CLEANUP_INTERVAL);
        loop {
            interval.tick().await;
            cleanup_state.cleanup_inactive_channels();
            tracing::debug!("Cleaned up inactive chat broadcast channels");
        }
    });

    tracing::info!("Router configured with periodic cleanup task");

    app
}
