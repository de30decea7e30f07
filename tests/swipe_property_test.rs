//! Property-based tests for the swipe state machine and deck builder

use proptest::prelude::*;
use std::collections::BTreeSet;
use uuid::Uuid;

use styleswap::backend::exchange::deck::deck_from_pool;
use styleswap::backend::exchange::swipe::DeckStatus;
use styleswap::shared::types::{ClothingItem, UserAppState};

fn item(owner: Uuid, id: Uuid) -> ClothingItem {
    ClothingItem {
        id,
        user_id: owner,
        user_name: "owner".to_string(),
        user_avatar: "avatar".to_string(),
        image_urls: vec![],
        category: "Shirt".to_string(),
        color: "White".to_string(),
        style_tags: vec![],
        description: None,
        estimated_price: 100,
    }
}

prop_compose! {
    fn arb_uuid()(n in any::<u128>()) -> Uuid {
        Uuid::from_u128(n)
    }
}

proptest! {
    /// For any swipe sequence, the seen-set grows monotonically and never
    /// contains an id that was not on the deck shown to the user.
    #[test]
    fn test_seen_set_monotone_and_bounded_by_deck(
        ids in prop::collection::btree_set(arb_uuid(), 0..20),
        swipes in prop::collection::vec(any::<bool>(), 0..30),
    ) {
        let owner = Uuid::from_u128(1);
        let deck: Vec<ClothingItem> = ids.iter().map(|id| item(owner, *id)).collect();
        let deck_ids: BTreeSet<Uuid> = ids;

        let mut state = UserAppState::default();
        let mut cursor = 0usize;
        let mut previous_len = 0usize;

        for _right in swipes {
            let Some(card) = deck.get(cursor) else { break };
            state.mark_seen(card.id);
            cursor += 1;

            // Monotonically non-decreasing.
            prop_assert!(state.seen_item_ids.len() >= previous_len);
            previous_len = state.seen_item_ids.len();

            // Never an id that was not on the deck.
            prop_assert!(state.seen_item_ids.iter().all(|id| deck_ids.contains(id)));
        }

        // Every swiped card is seen exactly once (set semantics).
        prop_assert_eq!(state.seen_item_ids.len(), cursor);
    }

    /// The deck never offers the caller's own items or anything already
    /// seen, and keeps pool order for what remains.
    #[test]
    fn test_deck_excludes_self_and_seen(
        pool_ids in prop::collection::vec(arb_uuid(), 0..30),
        owner_flags in prop::collection::vec(any::<bool>(), 0..30),
        seen_flags in prop::collection::vec(any::<bool>(), 0..30),
    ) {
        let me = Uuid::from_u128(42);
        let other = Uuid::from_u128(7);

        let pool: Vec<ClothingItem> = pool_ids
            .iter()
            .zip(owner_flags.iter().chain(std::iter::repeat(&false)))
            .map(|(id, mine)| item(if *mine { me } else { other }, *id))
            .collect();

        let seen: BTreeSet<Uuid> = pool_ids
            .iter()
            .zip(seen_flags.iter().chain(std::iter::repeat(&false)))
            .filter_map(|(id, seen)| seen.then_some(*id))
            .collect();

        let deck = deck_from_pool(&pool, me, &seen);

        prop_assert!(deck.iter().all(|card| card.user_id != me));
        prop_assert!(deck.iter().all(|card| !seen.contains(&card.id)));

        // Order is pool order.
        let expected: Vec<Uuid> = pool
            .iter()
            .filter(|card| card.user_id != me && !seen.contains(&card.id))
            .map(|card| card.id)
            .collect();
        let got: Vec<Uuid> = deck.iter().map(|card| card.id).collect();
        prop_assert_eq!(got, expected);
    }

    /// An empty deck reports empty, never exhausted; a non-empty deck
    /// starts active with the full length observable.
    #[test]
    fn test_fresh_deck_status(len in 0usize..10) {
        let owner = Uuid::from_u128(3);
        let deck: Vec<ClothingItem> =
            (0..len).map(|n| item(owner, Uuid::from_u128(n as u128 + 100))).collect();
        let session = styleswap::backend::exchange::swipe::SwipeSession::new(deck);

        prop_assert_eq!(session.deck_len(), len);
        prop_assert_eq!(session.position(), 0);
        if len == 0 {
            prop_assert_eq!(session.status(), DeckStatus::Empty);
            prop_assert!(session.current_card().is_none());
        } else {
            prop_assert_eq!(session.status(), DeckStatus::Active);
            prop_assert!(session.current_card().is_some());
        }
    }
}
