//! End-to-end exchange flow
//!
//! Drives the full negotiation path through the engine against the
//! in-memory store: upload, deck build, right-swipe, request delivery,
//! propose/confirm, and the rejection path.

mod common;

use assert_matches::assert_matches;
use pretty_assertions::assert_eq;

use styleswap::backend::exchange::{closet, deck, negotiation, swipe, ExchangeError};
use styleswap::backend::exchange::swipe::SwipeDirection;
use styleswap::backend::store::StateStore;
use styleswap::shared::types::{LikedItemStatus, MatchStatus};

use common::*;

#[tokio::test]
async fn test_right_swipe_creates_like_and_delivers_request() {
    let store = memory_store();
    let (alice, bob) = (identity("Alice"), identity("Bob"));

    let a = open_test_session(&store, &alice).await;
    let b = open_test_session(&store, &bob).await;

    closet::add_item(&a, item_fields("Jacket", 2500)).await.unwrap();
    let b1 = closet::add_item(&b, item_fields("Dress", 800)).await.unwrap();
    a.flush().await;
    b.flush().await;

    // Alice builds her deck; it contains exactly Bob's item.
    let seen = a.peek(|s| s.seen_item_ids.clone()).await;
    let cards = deck::build_deck(store.as_ref(), alice.id, &seen, 20).await.unwrap();
    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0].id, b1.id);
    a.set_deck(cards);

    let outcome = swipe::record_swipe(&a, SwipeDirection::Right).await.unwrap();
    assert!(outcome.request_delivered);
    let liked = outcome.liked.expect("right swipe must record a like");
    assert_eq!(liked.status, LikedItemStatus::Pending);
    assert_eq!(liked.item.id, b1.id);

    // Exactly one pending like and one seen id on Alice's side.
    let state = a.snapshot().await;
    assert_eq!(state.liked_items.len(), 1);
    assert!(state.seen_item_ids.contains(&b1.id));

    // Exactly one request in Bob's document, bypassing any debounce.
    let bob_doc = store.get_state(bob.id).await.unwrap().unwrap();
    assert_eq!(bob_doc.requests.len(), 1);
    assert_eq!(bob_doc.requests[0].requester.id, alice.id);
    assert_eq!(bob_doc.requests[0].item_of_interest.id, b1.id);
    // The requester's closet snapshot rides along for counter-selection.
    assert_eq!(bob_doc.requests[0].requester.closet.len(), 1);
}

#[tokio::test]
async fn test_full_swap_scenario() {
    let store = memory_store();
    let (alice, bob) = (identity("Alice"), identity("Bob"));

    let a = open_test_session(&store, &alice).await;
    let b = open_test_session(&store, &bob).await;
    let a1 = closet::add_item(&a, item_fields("Jacket", 2500)).await.unwrap();
    let b1 = closet::add_item(&b, item_fields("Dress", 800)).await.unwrap();
    a.flush().await;
    b.flush().await;

    let seen = a.peek(|s| s.seen_item_ids.clone()).await;
    a.set_deck(deck::build_deck(store.as_ref(), alice.id, &seen, 20).await.unwrap());
    swipe::record_swipe(&a, SwipeDirection::Right).await.unwrap();
    a.flush().await;

    // Bob's next session pulls the request.
    let b = open_test_session(&store, &bob).await;
    let request = b.peek(|s| s.requests[0].clone()).await;

    let chosen = request
        .requester
        .closet
        .iter()
        .find(|i| i.id == a1.id)
        .cloned()
        .expect("alice's closet snapshot must contain a1");
    let proposal = negotiation::propose_swap(bob.id, &request, chosen).unwrap();
    let matched = negotiation::confirm_proposal(&b, proposal).await.unwrap();
    b.flush().await;

    // Match shape: user1 = {B, b1}, user2 = {A, a1}, active, both ids.
    assert_eq!(matched.user1.user_id, bob.id);
    assert_eq!(matched.user1.clothing_item.id, b1.id);
    assert_eq!(matched.user2.user_id, alice.id);
    assert_eq!(matched.user2.clothing_item.id, a1.id);
    assert_eq!(matched.status, MatchStatus::Active);
    assert_eq!(matched.participants, [bob.id, alice.id]);

    // Present in both participants' document views.
    let bob_doc = store.get_state(bob.id).await.unwrap().unwrap();
    let alice_doc = store.get_state(alice.id).await.unwrap().unwrap();
    assert_eq!(bob_doc.matches, vec![matched.clone()]);
    assert_eq!(alice_doc.matches, vec![matched]);

    // Request resolved, and Alice's like did not dangle.
    assert!(bob_doc.requests.is_empty());
    assert!(alice_doc.liked_items.is_empty());
}

#[tokio::test]
async fn test_confirm_stale_request_is_not_found() {
    let store = memory_store();
    let (alice, bob) = (identity("Alice"), identity("Bob"));

    let a = open_test_session(&store, &alice).await;
    let b = open_test_session(&store, &bob).await;
    let a1 = closet::add_item(&a, item_fields("Jacket", 2500)).await.unwrap();
    closet::add_item(&b, item_fields("Dress", 800)).await.unwrap();
    a.flush().await;
    b.flush().await;

    let seen = a.peek(|s| s.seen_item_ids.clone()).await;
    a.set_deck(deck::build_deck(store.as_ref(), alice.id, &seen, 20).await.unwrap());
    swipe::record_swipe(&a, SwipeDirection::Right).await.unwrap();

    let b = open_test_session(&store, &bob).await;
    let request = b.peek(|s| s.requests[0].clone()).await;
    let chosen = request.requester.closet.iter().find(|i| i.id == a1.id).cloned().unwrap();
    let proposal = negotiation::propose_swap(bob.id, &request, chosen).unwrap();

    // The request resolves concurrently (rejected from another device).
    negotiation::reject_request(&b, request.id).await.unwrap();

    let result = negotiation::confirm_proposal(&b, proposal).await;
    assert_matches!(result, Err(ExchangeError::NotFound(_)));
}

#[tokio::test]
async fn test_reject_clears_queue_and_marks_like_rejected() {
    let store = memory_store();
    let (alice, bob) = (identity("Alice"), identity("Bob"));

    let a = open_test_session(&store, &alice).await;
    let b = open_test_session(&store, &bob).await;
    closet::add_item(&a, item_fields("Jacket", 2500)).await.unwrap();
    let b1 = closet::add_item(&b, item_fields("Dress", 800)).await.unwrap();
    a.flush().await;
    b.flush().await;

    let seen = a.peek(|s| s.seen_item_ids.clone()).await;
    a.set_deck(deck::build_deck(store.as_ref(), alice.id, &seen, 20).await.unwrap());
    swipe::record_swipe(&a, SwipeDirection::Right).await.unwrap();
    a.flush().await;

    let b = open_test_session(&store, &bob).await;
    let request_id = b.peek(|s| s.requests[0].id).await;
    negotiation::reject_request(&b, request_id).await.unwrap();
    b.flush().await;

    let bob_doc = store.get_state(bob.id).await.unwrap().unwrap();
    assert!(bob_doc.requests.is_empty());

    // The requester's like is not left dangling as pending.
    let alice_doc = store.get_state(alice.id).await.unwrap().unwrap();
    assert_eq!(alice_doc.liked_items.len(), 1);
    assert_eq!(alice_doc.liked_items[0].status, LikedItemStatus::Rejected);
    assert_eq!(alice_doc.liked_items[0].item.id, b1.id);
}

#[tokio::test]
async fn test_delete_item_cancels_matches_and_drops_requests() {
    let store = memory_store();
    let (alice, bob) = (identity("Alice"), identity("Bob"));

    let a = open_test_session(&store, &alice).await;
    let b = open_test_session(&store, &bob).await;
    let a1 = closet::add_item(&a, item_fields("Jacket", 2500)).await.unwrap();
    closet::add_item(&b, item_fields("Dress", 800)).await.unwrap();
    a.flush().await;
    b.flush().await;

    // Bob likes Alice's jacket; Alice receives the request.
    let seen = b.peek(|s| s.seen_item_ids.clone()).await;
    b.set_deck(deck::build_deck(store.as_ref(), bob.id, &seen, 20).await.unwrap());
    swipe::record_swipe(&b, SwipeDirection::Right).await.unwrap();
    b.flush().await;

    let a = open_test_session(&store, &alice).await;
    assert_eq!(a.peek(|s| s.requests.len()).await, 1);

    // Alice deletes the jacket before responding.
    closet::delete_item(&a, a1.id).await.unwrap();
    a.flush().await;

    let alice_doc = store.get_state(alice.id).await.unwrap().unwrap();
    assert!(alice_doc.my_closet.is_empty());
    assert!(alice_doc.requests.is_empty());

    // Bob's like for the deleted item ends rejected.
    let bob_doc = store.get_state(bob.id).await.unwrap().unwrap();
    assert_eq!(bob_doc.liked_items[0].status, LikedItemStatus::Rejected);
}

#[tokio::test]
async fn test_swiping_past_last_card_reports_exhausted_deck() {
    let store = memory_store();
    let (alice, bob) = (identity("Alice"), identity("Bob"));

    let a = open_test_session(&store, &alice).await;
    let b = open_test_session(&store, &bob).await;
    closet::add_item(&b, item_fields("Dress", 800)).await.unwrap();
    b.flush().await;

    let seen = a.peek(|s| s.seen_item_ids.clone()).await;
    a.set_deck(deck::build_deck(store.as_ref(), alice.id, &seen, 20).await.unwrap());

    let outcome = swipe::record_swipe(&a, SwipeDirection::Left).await.unwrap();
    assert_eq!(outcome.deck_status, styleswap::backend::exchange::swipe::DeckStatus::Exhausted);

    // Exhausted is a state, and further swipes are rejected as such.
    let result = swipe::record_swipe(&a, SwipeDirection::Left).await;
    assert_matches!(result, Err(ExchangeError::DeckExhausted));

    // An empty freshly-built deck is distinguishable from an exhausted one.
    a.set_deck(Vec::new());
    let empty = a.with_swipe(|s| (s.status(), s.deck_len())).unwrap();
    assert_eq!(empty, (styleswap::backend::exchange::swipe::DeckStatus::Empty, 0));
}

#[tokio::test]
async fn test_deck_excludes_seen_and_own_items() {
    let store = memory_store();
    let (alice, bob) = (identity("Alice"), identity("Bob"));

    let a = open_test_session(&store, &alice).await;
    let b = open_test_session(&store, &bob).await;
    closet::add_item(&a, item_fields("Jacket", 2500)).await.unwrap();
    let b1 = closet::add_item(&b, item_fields("Dress", 800)).await.unwrap();
    let b2 = closet::add_item(&b, item_fields("Sneakers", 1500)).await.unwrap();
    a.flush().await;
    b.flush().await;

    // First deck carries both of Bob's items; swipe one away.
    let seen = a.peek(|s| s.seen_item_ids.clone()).await;
    let cards = deck::build_deck(store.as_ref(), alice.id, &seen, 20).await.unwrap();
    assert_eq!(cards.len(), 2);
    a.set_deck(cards);
    let outcome = swipe::record_swipe(&a, SwipeDirection::Left).await.unwrap();
    let swiped_id = outcome.item.id;
    assert!(swiped_id == b1.id || swiped_id == b2.id);

    // A rebuilt deck no longer offers the seen card.
    let seen = a.peek(|s| s.seen_item_ids.clone()).await;
    let rebuilt = deck::build_deck(store.as_ref(), alice.id, &seen, 20).await.unwrap();
    assert_eq!(rebuilt.len(), 1);
    assert_ne!(rebuilt[0].id, swiped_id);
    assert!(rebuilt.iter().all(|card| card.user_id != alice.id));
}
