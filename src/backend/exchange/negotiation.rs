//! Request/swap negotiation
//!
//! Converts an inbound request plus a counter-selected item into a
//! confirmed bidirectional match, or a rejection. Proposing is pure;
//! nothing is persisted until the proposal is confirmed. Confirmation
//! writes the match into both participants' documents and clears both
//! artifacts of the originating like (the recipient's request and the
//! requester's pending like), so nothing dangles on either side.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{write_counterparty, ExchangeError, UserSession};
use crate::shared::error::SharedError;
use crate::shared::types::{ClothingItem, LikedItemStatus, Match, MatchSide, MatchStatus, Request};

/// A proposal awaiting explicit confirmation. Holds everything needed to
/// build the match so confirmation does not re-read the request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingProposal {
    pub request_id: Uuid,
    /// The recipient (request owner) and their item of interest.
    pub recipient: MatchSide,
    /// The requester and the closet item the recipient picked in return.
    pub requester: MatchSide,
}

/// Pair the request's item of interest with one of the requester's closet
/// items. Pure; persisted state is untouched until confirmation.
pub fn propose_swap(
    recipient_id: Uuid,
    request: &Request,
    requester_item: ClothingItem,
) -> Result<PendingProposal, ExchangeError> {
    if requester_item.user_id != request.requester.id {
        return Err(SharedError::validation(
            "itemId",
            "chosen item is not owned by the requester",
        )
        .into());
    }
    if request.item_of_interest.user_id != recipient_id {
        return Err(SharedError::validation(
            "requestId",
            "request does not concern one of your items",
        )
        .into());
    }
    Ok(PendingProposal {
        request_id: request.id,
        recipient: MatchSide {
            user_id: recipient_id,
            clothing_item: request.item_of_interest.clone(),
        },
        requester: MatchSide {
            user_id: request.requester.id,
            clothing_item: requester_item,
        },
    })
}

/// Confirm a proposal: create the match in both participants' documents,
/// delete the originating request from the recipient's queue and clear the
/// requester's pending like for the item.
///
/// Fails with `NotFound` when the request no longer exists (resolved or
/// rejected concurrently); the caller treats that as stale and refreshes.
pub async fn confirm_proposal(
    session: &UserSession,
    proposal: PendingProposal,
) -> Result<Match, ExchangeError> {
    let matched = Match::new(proposal.recipient.clone(), proposal.requester.clone());

    let confirmed = session
        .mutate(|state| {
            state.remove_request(proposal.request_id)?;
            state.add_match(matched.clone());
            Some(())
        })
        .await;
    if confirmed.is_none() {
        return Err(ExchangeError::NotFound("request"));
    }

    let liked_item_id = proposal.recipient.clothing_item.id;
    write_counterparty(
        session.store().as_ref(),
        proposal.requester.user_id,
        "replicate match",
        |state| {
            state.add_match(matched.clone());
            // The like converted into a match; leave nothing dangling.
            state.clear_like_for_item(liked_item_id);
        },
    )
    .await;

    tracing::info!(
        "[Negotiation] match {} confirmed between {} and {}",
        matched.id,
        proposal.recipient.user_id,
        proposal.requester.user_id
    );
    Ok(matched)
}

/// Reject an inbound request: delete it from the recipient's queue and
/// transition the requester's dangling like to `Rejected`.
pub async fn reject_request(
    session: &UserSession,
    request_id: Uuid,
) -> Result<(), ExchangeError> {
    let removed = session
        .mutate(|state| state.remove_request(request_id))
        .await
        .ok_or(ExchangeError::NotFound("request"))?;

    write_counterparty(
        session.store().as_ref(),
        removed.requester.id,
        "propagate rejection",
        |state| {
            state.set_liked_status_for_item(removed.item_of_interest.id, LikedItemStatus::Rejected);
        },
    )
    .await;

    Ok(())
}

/// Cancel a match in both participants' documents. The match record stays
/// (never hard-deleted); its status transition closes chat and transaction
/// eligibility.
pub async fn cancel_match(session: &UserSession, match_id: Uuid) -> Result<(), ExchangeError> {
    let me = session.user_id();
    let counterparty = session
        .mutate(|state| {
            let counterparty = state.match_by_id(match_id)?.counterparty(me)?;
            state.set_match_status(match_id, MatchStatus::Cancelled, None);
            Some(counterparty)
        })
        .await
        .ok_or(ExchangeError::NotFound("match"))?;

    write_counterparty(session.store().as_ref(), counterparty, "propagate cancel", |state| {
        state.set_match_status(match_id, MatchStatus::Cancelled, None);
    })
    .await;

    Ok(())
}
