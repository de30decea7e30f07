//! Chat HTTP handlers
//!
//! History fetch, send, and the live SSE subscription for a match's
//! message stream. Only the two participants of a match may read or write
//! its chat, and chat closes once the match is no longer open.

use axum::{
    extract::{Path, State},
    response::sse::{Event, KeepAlive, Sse},
    Extension, Json,
};
use futures_util::stream::{self, StreamExt};
use tokio_stream::Stream;
use serde::Deserialize;
use std::convert::Infallible;
use uuid::Uuid;

use crate::backend::error::BackendError;
use crate::backend::exchange::ExchangeError;
use crate::backend::middleware::auth::AuthenticatedUser;
use crate::backend::server::state::AppState;
use crate::backend::store::StateStore;
use crate::shared::error::SharedError;
use crate::shared::types::ChatMessage;

/// Check that the caller participates in the match before touching its
/// chat. The check runs against the caller's own document copy.
async fn require_participant(
    app: &AppState,
    user_id: Uuid,
    match_id: Uuid,
) -> Result<(), BackendError> {
    let session = app.sessions.get(user_id).await.ok_or(BackendError::NoSession)?;
    let participates = session
        .peek(|state| {
            state
                .match_by_id(match_id)
                .is_some_and(|m| m.participants.contains(&user_id))
        })
        .await;
    if participates {
        Ok(())
    } else {
        Err(BackendError::Forbidden)
    }
}

/// GET /api/chats/{match_id}/messages — full history, timestamp ascending.
pub async fn list_messages(
    State(app): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(match_id): Path<Uuid>,
) -> Result<Json<Vec<ChatMessage>>, BackendError> {
    require_participant(&app, auth.user_id, match_id).await?;
    let messages = app.store.messages(match_id).await.map_err(ExchangeError::from)?;
    Ok(Json(messages))
}

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub text: String,
}

/// POST /api/chats/{match_id}/messages — persist and fan out to live
/// subscribers.
pub async fn send_message(
    State(app): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(match_id): Path<Uuid>,
    Json(request): Json<SendMessageRequest>,
) -> Result<Json<ChatMessage>, BackendError> {
    if request.text.trim().is_empty() {
        return Err(BackendError::Exchange(
            SharedError::validation("text", "message text cannot be empty").into(),
        ));
    }
    require_participant(&app, auth.user_id, match_id).await?;

    let session = app.sessions.get(auth.user_id).await.ok_or(BackendError::NoSession)?;
    let profile = session.profile().await;
    let message = ChatMessage::new(auth.user_id, request.text, profile.avatar);

    app.store
        .append_message(match_id, &message)
        .await
        .map_err(ExchangeError::from)?;
    app.chat.broadcast(match_id, message.clone());

    tracing::debug!(
        "[Chat] message {} in match {} fanned out to {} subscribers",
        message.id,
        match_id,
        app.chat.subscriber_count(match_id)
    );
    Ok(Json(message))
}

/// GET /api/chats/{match_id}/subscribe — SSE stream of the match's chat:
/// the stored history first, then live messages as they arrive. The
/// subscription ends when the client disconnects; dropping the receiver
/// unregisters the listener.
pub async fn subscribe(
    State(app): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(match_id): Path<Uuid>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, BackendError> {
    require_participant(&app, auth.user_id, match_id).await?;

    let history = match app.store.messages(match_id).await {
        Ok(messages) => messages,
        Err(e) => {
            tracing::warn!("[Chat] failed to load history for {}: {}", match_id, e);
            Vec::new() // degrade to live-only
        }
    };
    let receiver = app.chat.subscribe(match_id);
    tracing::info!(
        "[Chat] {} subscribed to match {} ({} stored messages)",
        auth.user_id,
        match_id,
        history.len()
    );

    let stream = stream::select(
        stream::iter(
            history
                .into_iter()
                .filter_map(|message| message_event(&message).map(Ok)),
        ),
        stream::unfold(receiver, |mut rx| async move {
            loop {
                match rx.recv().await {
                    Ok(message) => {
                        let Some(event) = message_event(&message) else {
                            continue;
                        };
                        return Some((Ok(event), rx));
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!("[Chat] subscriber lagged, skipped {} messages", skipped);
                        continue;
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => return None,
                }
            }
        })
        .boxed(),
    );

    Ok(Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(std::time::Duration::from_secs(30))
            .text("keep-alive"),
    ))
}

fn message_event(message: &ChatMessage) -> Option<Event> {
    match serde_json::to_string(message) {
        Ok(data) => Some(Event::default().event("message").data(data)),
        Err(e) => {
            tracing::error!("[Chat] failed to serialize message {}: {}", message.id, e);
            None
        }
    }
}
