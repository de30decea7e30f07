//! Swipe/match engine
//!
//! A swipe session is a cursor over a built deck. Every swipe marks the
//! current card as seen (set semantics) and advances the cursor by one
//! regardless of direction; a right-swipe additionally records a pending
//! like for the swiper and mirror-writes a request into the item owner's
//! document. Matching never happens here: mutual interest is always
//! resolved through the explicit request/propose/confirm flow.

use serde::{Deserialize, Serialize};

use super::{write_counterparty, ExchangeError, UserSession};
use crate::shared::types::{ClothingItem, LikedItem, Request, Requester};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwipeDirection {
    Left,
    Right,
}

/// Deck position, distinguishing a deck that never had cards from one the
/// user swiped through. Both render the same upsell affordance, but the
/// distinction must be observable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeckStatus {
    /// No candidate items existed when the deck was built.
    Empty,
    /// A card is available at the cursor.
    Active,
    /// The cursor moved past the last card.
    Exhausted,
}

/// Per-session swipe state machine: a cursor over the deck plus the
/// transient direction of the card currently animating away.
pub struct SwipeSession {
    deck: Vec<ClothingItem>,
    active_card_index: usize,
    swiped_direction: Option<SwipeDirection>,
}

impl SwipeSession {
    pub fn new(deck: Vec<ClothingItem>) -> Self {
        Self { deck, active_card_index: 0, swiped_direction: None }
    }

    pub fn deck(&self) -> &[ClothingItem] {
        &self.deck
    }

    pub fn deck_len(&self) -> usize {
        self.deck.len()
    }

    pub fn position(&self) -> usize {
        self.active_card_index
    }

    pub fn swiped_direction(&self) -> Option<SwipeDirection> {
        self.swiped_direction
    }

    pub fn current_card(&self) -> Option<&ClothingItem> {
        self.deck.get(self.active_card_index)
    }

    pub fn status(&self) -> DeckStatus {
        if self.deck.is_empty() {
            DeckStatus::Empty
        } else if self.active_card_index >= self.deck.len() {
            DeckStatus::Exhausted
        } else {
            DeckStatus::Active
        }
    }

    /// Take the card under the cursor for a swipe, recording the transient
    /// direction for the card's exit animation.
    fn begin(&mut self, direction: SwipeDirection) -> Result<ClothingItem, ExchangeError> {
        let card = self.current_card().cloned().ok_or(ExchangeError::DeckExhausted)?;
        self.swiped_direction = Some(direction);
        Ok(card)
    }

    /// Advance the cursor by one and clear the transient direction. Always
    /// called once per swipe, whatever the branch outcome.
    fn advance(&mut self) {
        self.active_card_index += 1;
        self.swiped_direction = None;
    }
}

/// What a swipe produced, for the caller's UI.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwipeOutcome {
    pub item: ClothingItem,
    /// Present on right-swipes only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub liked: Option<LikedItem>,
    /// Whether the mirror request reached the item owner's document. A miss
    /// is logged and left for reconciliation, not retried.
    pub request_delivered: bool,
    pub deck_status: DeckStatus,
}

/// Consume one swipe decision for the session's active deck.
///
/// Left: mark seen, advance. Right: mark seen, record a pending
/// [`LikedItem`] for the swiper, mirror-create a [`Request`] (carrying the
/// swiper's identity and closet snapshot) in the item owner's document,
/// advance.
pub async fn record_swipe(
    session: &UserSession,
    direction: SwipeDirection,
) -> Result<SwipeOutcome, ExchangeError> {
    let item = session
        .with_swipe(|swipe| swipe.begin(direction))
        .ok_or(ExchangeError::NoDeck)??;

    session.mutate(|state| state.mark_seen(item.id)).await;

    let mut liked = None;
    let mut request_delivered = false;

    if direction == SwipeDirection::Right {
        let profile = session.profile().await;
        let closet = session.peek(|state| state.my_closet.clone()).await;

        let like = LikedItem::pending(item.clone(), session.user_id());
        session.mutate(|state| state.add_liked_item(like.clone())).await;

        let request = Request {
            id: uuid::Uuid::new_v4(),
            requester: Requester {
                id: profile.id,
                name: profile.name.clone(),
                avatar: profile.avatar.clone(),
                closet,
            },
            item_of_interest: item.clone(),
        };
        request_delivered = write_counterparty(
            session.store().as_ref(),
            item.user_id,
            "deliver request",
            |state| state.add_request(request),
        )
        .await;

        tracing::info!(
            "[Swipe] {} liked item {} owned by {}",
            session.user_id(),
            item.id,
            item.user_id
        );
        liked = Some(like);
    }

    let deck_status = session
        .with_swipe(|swipe| {
            swipe.advance();
            swipe.status()
        })
        .ok_or(ExchangeError::NoDeck)?;

    Ok(SwipeOutcome { item, liked, request_delivered, deck_status })
}
