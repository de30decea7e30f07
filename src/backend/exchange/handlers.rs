//! HTTP handlers for the exchange engine
//!
//! Thin JSON adapters over the engine operations. Every route runs behind
//! the auth middleware; handlers that touch per-user state additionally
//! require an open session (created by `POST /api/session`, dropped by
//! `DELETE /api/session`).

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use super::bootstrap;
use super::closet;
use super::deck;
use super::negotiation::{self, PendingProposal};
use super::reconcile::{self, ReconcileReport};
use super::session::UserSession;
use super::swipe::{self, DeckStatus, SwipeDirection, SwipeOutcome};
use super::transaction;
use super::ExchangeError;
use crate::backend::error::BackendError;
use crate::backend::middleware::auth::AuthenticatedUser;
use crate::backend::server::state::{AppState, SessionRegistry};
use crate::backend::tagging::TagSuggestion;
use crate::shared::error::SharedError;
use crate::shared::types::{
    ClothingItem, ItemFields, LikedItem, Match, ProfilePatch, Request, Transaction,
    TransactionPartyDetails, UserAppState, UserProfile,
};

async fn require_session(
    sessions: &SessionRegistry,
    user_id: Uuid,
) -> Result<Arc<UserSession>, BackendError> {
    sessions.get(user_id).await.ok_or(BackendError::NoSession)
}

// --- session lifecycle ---

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub profile: UserProfile,
    pub state: UserAppState,
}

/// POST /api/session — open (or rejoin) a session for the verified
/// identity: locate-or-create the profile, pull-or-seed the state document.
pub async fn open_session(
    State(app): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<SessionResponse>, BackendError> {
    if let Some(session) = app.sessions.get(auth.user_id).await {
        return Ok(Json(SessionResponse {
            profile: session.profile().await,
            state: session.snapshot().await,
        }));
    }

    let session =
        bootstrap::open_session(app.store.clone(), &app.config, &auth.identity())
            .await
            .map_err(ExchangeError::from)?;
    app.sessions.insert(session.clone()).await;

    Ok(Json(SessionResponse {
        profile: session.profile().await,
        state: session.snapshot().await,
    }))
}

/// DELETE /api/session — logout. Cancels any pending debounced save so
/// nothing is written after teardown.
pub async fn close_session(
    State(sessions): State<SessionRegistry>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Json<serde_json::Value> {
    if let Some(session) = sessions.remove(auth.user_id).await {
        session.cancel_pending_save();
        tracing::info!("[Session] closed for {}", auth.user_id);
    }
    Json(serde_json::json!({ "success": true }))
}

// --- profile ---

/// GET /api/profile
pub async fn get_profile(
    State(sessions): State<SessionRegistry>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<UserProfile>, BackendError> {
    let session = require_session(&sessions, auth.user_id).await?;
    Ok(Json(session.profile().await))
}

/// PUT /api/profile — merge-patch; persisted immediately, not debounced.
pub async fn update_profile(
    State(sessions): State<SessionRegistry>,
    Extension(auth): Extension<AuthenticatedUser>,
    Json(patch): Json<ProfilePatch>,
) -> Result<Json<UserProfile>, BackendError> {
    let session = require_session(&sessions, auth.user_id).await?;
    let profile = session.update_profile(&patch).await?;
    Ok(Json(profile))
}

// --- closet ---

/// GET /api/closet
pub async fn get_closet(
    State(sessions): State<SessionRegistry>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<ClothingItem>>, BackendError> {
    let session = require_session(&sessions, auth.user_id).await?;
    Ok(Json(session.peek(|state| state.my_closet.clone()).await))
}

/// POST /api/closet
pub async fn add_item(
    State(sessions): State<SessionRegistry>,
    Extension(auth): Extension<AuthenticatedUser>,
    Json(fields): Json<ItemFields>,
) -> Result<Json<ClothingItem>, BackendError> {
    let session = require_session(&sessions, auth.user_id).await?;
    Ok(Json(closet::add_item(&session, fields).await?))
}

/// PUT /api/closet/{item_id}
pub async fn update_item(
    State(sessions): State<SessionRegistry>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(item_id): Path<Uuid>,
    Json(fields): Json<ItemFields>,
) -> Result<Json<ClothingItem>, BackendError> {
    let session = require_session(&sessions, auth.user_id).await?;
    Ok(Json(closet::update_item(&session, item_id, fields).await?))
}

/// DELETE /api/closet/{item_id}
pub async fn delete_item(
    State(sessions): State<SessionRegistry>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(item_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, BackendError> {
    let session = require_session(&sessions, auth.user_id).await?;
    closet::delete_item(&session, item_id).await?;
    Ok(Json(serde_json::json!({ "success": true })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagRequest {
    pub image_base64: String,
    pub mime_type: String,
}

/// POST /api/closet/tags — AI field suggestion for an upload. Failure maps
/// to 502 and the client falls back to manual entry.
pub async fn suggest_tags(
    State(app): State<AppState>,
    Extension(_auth): Extension<AuthenticatedUser>,
    Json(request): Json<TagRequest>,
) -> Result<Json<TagSuggestion>, BackendError> {
    let tagger = app
        .tagger
        .as_ref()
        .ok_or_else(|| BackendError::Tagging("tagging is not configured".to_string()))?;
    let suggestion = tagger
        .suggest_tags(&request.image_base64, &request.mime_type)
        .await
        .map_err(|e| {
            tracing::warn!("[Tagging] suggestion failed, client reverts to manual entry: {}", e);
            BackendError::Tagging(e.to_string())
        })?;
    Ok(Json(suggestion))
}

// --- deck & swiping ---

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckResponse {
    pub deck: Vec<ClothingItem>,
    pub position: usize,
    pub deck_len: usize,
    pub status: DeckStatus,
}

/// GET /api/deck — build a fresh deck from a bounded sample of other
/// users' closets and restart the swipe cursor.
pub async fn get_deck(
    State(app): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<DeckResponse>, BackendError> {
    let session = require_session(&app.sessions, auth.user_id).await?;

    let seen = session.peek(|state| state.seen_item_ids.clone()).await;
    let deck = deck::build_deck(
        app.store.as_ref(),
        auth.user_id,
        &seen,
        app.config.deck_sample_cap,
    )
    .await
    .map_err(ExchangeError::from)?;

    session.set_deck(deck.clone());
    let status = if deck.is_empty() { DeckStatus::Empty } else { DeckStatus::Active };
    Ok(Json(DeckResponse { deck_len: deck.len(), deck, position: 0, status }))
}

#[derive(Debug, Deserialize)]
pub struct SwipeRequest {
    pub direction: SwipeDirection,
}

/// POST /api/deck/swipe
pub async fn record_swipe(
    State(sessions): State<SessionRegistry>,
    Extension(auth): Extension<AuthenticatedUser>,
    Json(request): Json<SwipeRequest>,
) -> Result<Json<SwipeOutcome>, BackendError> {
    let session = require_session(&sessions, auth.user_id).await?;
    Ok(Json(swipe::record_swipe(&session, request.direction).await?))
}

// --- likes ---

/// GET /api/likes
pub async fn get_likes(
    State(sessions): State<SessionRegistry>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<LikedItem>>, BackendError> {
    let session = require_session(&sessions, auth.user_id).await?;
    Ok(Json(session.peek(|state| state.liked_items.clone()).await))
}

/// DELETE /api/likes/{like_id}
pub async fn remove_like(
    State(sessions): State<SessionRegistry>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(like_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, BackendError> {
    let session = require_session(&sessions, auth.user_id).await?;
    closet::remove_liked_item(&session, like_id).await?;
    Ok(Json(serde_json::json!({ "success": true })))
}

// --- requests & negotiation ---

/// GET /api/requests
pub async fn get_requests(
    State(sessions): State<SessionRegistry>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<Request>>, BackendError> {
    let session = require_session(&sessions, auth.user_id).await?;
    Ok(Json(session.peek(|state| state.requests.clone()).await))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalChoice {
    /// The requester's closet item picked in return.
    pub item_id: Uuid,
}

async fn build_proposal(
    session: &UserSession,
    request_id: Uuid,
    choice: &ProposalChoice,
) -> Result<PendingProposal, ExchangeError> {
    let request = session
        .peek(|state| state.request(request_id).cloned())
        .await
        .ok_or(ExchangeError::NotFound("request"))?;
    let requester_item = request
        .requester
        .closet
        .iter()
        .find(|item| item.id == choice.item_id)
        .cloned()
        .ok_or_else(|| {
            ExchangeError::from(SharedError::validation(
                "itemId",
                "chosen item is not in the requester's closet",
            ))
        })?;
    negotiation::propose_swap(session.user_id(), &request, requester_item)
}

/// POST /api/requests/{request_id}/proposal — pair the liked item with a
/// counter-item. Pure: nothing is persisted until confirmation.
pub async fn propose_swap(
    State(sessions): State<SessionRegistry>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(request_id): Path<Uuid>,
    Json(choice): Json<ProposalChoice>,
) -> Result<Json<PendingProposal>, BackendError> {
    let session = require_session(&sessions, auth.user_id).await?;
    Ok(Json(build_proposal(&session, request_id, &choice).await?))
}

/// POST /api/requests/{request_id}/confirm — confirm the proposal and
/// create the match in both participants' documents.
pub async fn confirm_proposal(
    State(sessions): State<SessionRegistry>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(request_id): Path<Uuid>,
    Json(choice): Json<ProposalChoice>,
) -> Result<Json<Match>, BackendError> {
    let session = require_session(&sessions, auth.user_id).await?;
    let proposal = build_proposal(&session, request_id, &choice).await?;
    Ok(Json(negotiation::confirm_proposal(&session, proposal).await?))
}

/// POST /api/requests/{request_id}/reject
pub async fn reject_request(
    State(sessions): State<SessionRegistry>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(request_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, BackendError> {
    let session = require_session(&sessions, auth.user_id).await?;
    negotiation::reject_request(&session, request_id).await?;
    Ok(Json(serde_json::json!({ "success": true })))
}

// --- matches ---

/// GET /api/matches
pub async fn get_matches(
    State(sessions): State<SessionRegistry>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<Match>>, BackendError> {
    let session = require_session(&sessions, auth.user_id).await?;
    Ok(Json(session.peek(|state| state.matches.clone()).await))
}

/// POST /api/matches/{match_id}/cancel
pub async fn cancel_match(
    State(sessions): State<SessionRegistry>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(match_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, BackendError> {
    let session = require_session(&sessions, auth.user_id).await?;
    negotiation::cancel_match(&session, match_id).await?;
    Ok(Json(serde_json::json!({ "success": true })))
}

/// POST /api/reconcile — diff this user's match copies against the
/// counterparty replicas and repair divergence.
pub async fn reconcile(
    State(sessions): State<SessionRegistry>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<ReconcileReport>, BackendError> {
    let session = require_session(&sessions, auth.user_id).await?;
    Ok(Json(reconcile::reconcile_matches(&session).await?))
}

// --- transactions ---

/// GET /api/transactions
pub async fn get_transactions(
    State(sessions): State<SessionRegistry>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<Transaction>>, BackendError> {
    let session = require_session(&sessions, auth.user_id).await?;
    Ok(Json(session.peek(|state| state.transactions.clone()).await))
}

/// POST /api/matches/{match_id}/transaction — submit the caller's pickup
/// details, opening the transaction when absent.
pub async fn submit_transaction_details(
    State(sessions): State<SessionRegistry>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(match_id): Path<Uuid>,
    Json(details): Json<TransactionPartyDetails>,
) -> Result<Json<Transaction>, BackendError> {
    let session = require_session(&sessions, auth.user_id).await?;
    Ok(Json(transaction::submit_details(&session, match_id, details).await?))
}

/// POST /api/transactions/{transaction_id}/complete
pub async fn complete_transaction(
    State(sessions): State<SessionRegistry>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(transaction_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, BackendError> {
    let session = require_session(&sessions, auth.user_id).await?;
    transaction::complete(&session, transaction_id).await?;
    Ok(Json(serde_json::json!({ "success": true })))
}

/// POST /api/transactions/{transaction_id}/cancel
pub async fn cancel_transaction(
    State(sessions): State<SessionRegistry>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(transaction_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, BackendError> {
    let session = require_session(&sessions, auth.user_id).await?;
    transaction::cancel(&session, transaction_id).await?;
    Ok(Json(serde_json::json!({ "success": true })))
}
