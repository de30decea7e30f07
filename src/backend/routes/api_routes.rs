/**
 * API Route Wiring
 *
 * Every route runs behind the bearer-token auth middleware: the identity
 * provider mints tokens, this server only verifies them.
 *
 * # Routes
 *
 * ## Session
 * - `POST /api/session` - Open (or rejoin) a session for the verified identity
 * - `DELETE /api/session` - Logout; cancels any pending debounced save
 *
 * ## Profile
 * - `GET /api/profile`
 * - `PUT /api/profile` - Merge-patch, persisted immediately
 *
 * ## Closet
 * - `GET /api/closet`
 * - `POST /api/closet`
 * - `POST /api/closet/tags` - AI field suggestion for an upload
 * - `PUT /api/closet/{item_id}`
 * - `DELETE /api/closet/{item_id}`
 *
 * ## Swiping
 * - `GET /api/deck` - Build a fresh deck and restart the cursor
 * - `POST /api/deck/swipe`
 *
 * ## Likes, requests & matches
 * - `GET /api/likes`, `DELETE /api/likes/{like_id}`
 * - `GET /api/requests`
 * - `POST /api/requests/{request_id}/proposal`
 * - `POST /api/requests/{request_id}/confirm`
 * - `POST /api/requests/{request_id}/reject`
 * - `GET /api/matches`, `POST /api/matches/{match_id}/cancel`
 * - `POST /api/reconcile` - Repair diverged match replicas
 *
 * ## Transactions
 * - `GET /api/transactions`
 * - `POST /api/matches/{match_id}/transaction`
 * - `POST /api/transactions/{transaction_id}/complete`
 * - `POST /api/transactions/{transaction_id}/cancel`
 *
 * ## Chat
 * - `GET /api/chats/{match_id}/messages`
 * - `POST /api/chats/{match_id}/messages`
 * - `GET /api/chats/{match_id}/subscribe` - SSE: history, then live tail
 */

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::backend::chat::handlers as chat;
use crate::backend::exchange::handlers as exchange;
use crate::backend::middleware::auth::auth_middleware;
use crate::backend::server::state::AppState;

/// Configure API routes behind the auth middleware.
pub fn configure_api_routes(app_state: AppState) -> Router<()> {
    Router::new()
        // Session lifecycle
        .route(
            "/api/session",
            post(exchange::open_session).delete(exchange::close_session),
        )
        // Profile
        .route(
            "/api/profile",
            get(exchange::get_profile).put(exchange::update_profile),
        )
        // Closet
        .route("/api/closet", get(exchange::get_closet).post(exchange::add_item))
        .route("/api/closet/tags", post(exchange::suggest_tags))
        .route(
            "/api/closet/{item_id}",
            put(exchange::update_item).delete(exchange::delete_item),
        )
        // Swiping
        .route("/api/deck", get(exchange::get_deck))
        .route("/api/deck/swipe", post(exchange::record_swipe))
        // Likes
        .route("/api/likes", get(exchange::get_likes))
        .route("/api/likes/{like_id}", delete(exchange::remove_like))
        // Requests & negotiation
        .route("/api/requests", get(exchange::get_requests))
        .route("/api/requests/{request_id}/proposal", post(exchange::propose_swap))
        .route("/api/requests/{request_id}/confirm", post(exchange::confirm_proposal))
        .route("/api/requests/{request_id}/reject", post(exchange::reject_request))
        // Matches
        .route("/api/matches", get(exchange::get_matches))
        .route("/api/matches/{match_id}/cancel", post(exchange::cancel_match))
        .route(
            "/api/matches/{match_id}/transaction",
            post(exchange::submit_transaction_details),
        )
        .route("/api/reconcile", post(exchange::reconcile))
        // Transactions
        .route("/api/transactions", get(exchange::get_transactions))
        .route(
            "/api/transactions/{transaction_id}/complete",
            post(exchange::complete_transaction),
        )
        .route(
            "/api/transactions/{transaction_id}/cancel",
            post(exchange::cancel_transaction),
        )
        // Chat
        .route(
            "/api/chats/{match_id}/messages",
            get(chat::list_messages).post(chat::send_message),
        )
        .route("/api/chats/{match_id}/subscribe", get(chat::subscribe))
        .layer(axum::middleware::from_fn_with_state(app_state.clone(), auth_middleware))
        .with_state(app_state)
}
