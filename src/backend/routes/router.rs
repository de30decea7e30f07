/**
 * Router Configuration
 *
 * Assembles the application router: the authenticated API plus the global
 * layers (request tracing, permissive CORS for the mobile-web client) and
 * the 404 fallback.
 */

use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::backend::routes::api_routes::configure_api_routes;
use crate::backend::server::state::AppState;

/// Create the Axum router with all routes configured
///
/// # Arguments
///
/// * `app_state` - Application state containing the store, sessions and
///   chat channels
///
/// # Returns
///
/// Configured Axum Router ready to serve requests
pub fn create_router(app_state: AppState) -> Router<()> {
    configure_api_routes(app_state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .fallback(|| async { "404 Not Found" })
}
