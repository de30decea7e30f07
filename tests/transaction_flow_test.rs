//! Transaction negotiation flows
//!
//! Two-party detail submission, reciprocal match-status propagation,
//! idempotent completion and cancellation with restart.

mod common;

use assert_matches::assert_matches;
use pretty_assertions::assert_eq;
use std::sync::Arc;
use uuid::Uuid;

use styleswap::backend::exchange::session::UserSession;
use styleswap::backend::exchange::{transaction, ExchangeError};
use styleswap::backend::store::{MemoryStore, StateStore};
use styleswap::shared::types::{
    ClothingItem, Match, MatchSide, MatchStatus, TransactionStatus,
};

use common::*;

fn closet_item(owner: Uuid, category: &str) -> ClothingItem {
    ClothingItem {
        id: Uuid::new_v4(),
        user_id: owner,
        user_name: category.to_string(),
        user_avatar: "avatar".to_string(),
        image_urls: vec![],
        category: category.to_string(),
        color: "Red".to_string(),
        style_tags: vec![],
        description: None,
        estimated_price: 1000,
    }
}

/// Two hydrated sessions sharing one active match, both replicas flushed.
async fn matched_pair(
    store: &Arc<MemoryStore>,
) -> (Arc<UserSession>, Arc<UserSession>, Match) {
    let (alice, bob) = (identity("Alice"), identity("Bob"));
    let a = open_test_session(store, &alice).await;
    let b = open_test_session(store, &bob).await;

    let matched = Match::new(
        MatchSide { user_id: alice.id, clothing_item: closet_item(alice.id, "Jacket") },
        MatchSide { user_id: bob.id, clothing_item: closet_item(bob.id, "Dress") },
    );
    a.mutate(|s| s.add_match(matched.clone())).await;
    b.mutate(|s| s.add_match(matched.clone())).await;
    a.flush().await;
    b.flush().await;
    (a, b, matched)
}

#[tokio::test]
async fn test_two_party_details_never_clobber() {
    let store = memory_store();
    let (a, b, matched) = matched_pair(&store).await;
    let (alice_id, bob_id) = (a.user_id(), b.user_id());

    // Alice initiates with her 7-11 branch.
    let txn = transaction::submit_details(&a, matched.id, party_details("台北南港門市"))
        .await
        .unwrap();
    assert_eq!(txn.status, TransactionStatus::Ongoing);
    a.flush().await;

    // Bob submits his own details from a fresh session pull.
    let bob = identity("Bob");
    let b = open_test_session(
        &store,
        &styleswap::backend::exchange::bootstrap::AuthIdentity { id: bob_id, ..bob },
    )
    .await;
    let merged = transaction::submit_details(&b, matched.id, party_details("高雄左營門市"))
        .await
        .unwrap();
    b.flush().await;

    // Same transaction, both keys populated, neither overwritten.
    assert_eq!(merged.id, txn.id);
    assert_eq!(merged.parties.len(), 2);
    assert_eq!(merged.parties[&alice_id].pickup_location, "台北南港門市");
    assert_eq!(merged.parties[&bob_id].pickup_location, "高雄左營門市");
    assert_eq!(merged.status, TransactionStatus::Ongoing);

    // Bob's mirror write merged into Alice's document without dropping her key.
    let alice_doc = store.get_state(alice_id).await.unwrap().unwrap();
    let alice_txn = alice_doc.transaction_by_match(matched.id).unwrap();
    assert_eq!(alice_txn.parties.len(), 2);
    assert_eq!(alice_txn.parties[&alice_id].pickup_location, "台北南港門市");

    // Both match replicas moved to in-transaction.
    assert_eq!(alice_doc.match_by_id(matched.id).unwrap().status, MatchStatus::InTransaction);
    let bob_doc = store.get_state(bob_id).await.unwrap().unwrap();
    assert_eq!(bob_doc.match_by_id(matched.id).unwrap().status, MatchStatus::InTransaction);
}

#[tokio::test]
async fn test_complete_is_idempotent() {
    let store = memory_store();
    let (a, _b, matched) = matched_pair(&store).await;

    let txn = transaction::submit_details(&a, matched.id, party_details("門市"))
        .await
        .unwrap();
    transaction::complete(&a, txn.id).await.unwrap();

    let first = a
        .peek(|s| s.match_by_id(matched.id).unwrap().completed_at)
        .await
        .expect("completion must stamp completed_at");

    // Second completion changes nothing observable.
    transaction::complete(&a, txn.id).await.unwrap();
    let state = a.snapshot().await;
    assert_eq!(state.transaction(txn.id).unwrap().status, TransactionStatus::Completed);
    assert_eq!(state.match_by_id(matched.id).unwrap().status, MatchStatus::Completed);
    assert_eq!(state.match_by_id(matched.id).unwrap().completed_at, Some(first));

    // The counterparty replica carries the same terminal state and stamp.
    let bob_doc = store.get_state(_b.user_id()).await.unwrap().unwrap();
    assert_eq!(bob_doc.transaction(txn.id).unwrap().status, TransactionStatus::Completed);
    assert_eq!(bob_doc.match_by_id(matched.id).unwrap().completed_at, Some(first));
}

#[tokio::test]
async fn test_cancel_reverts_match_to_active() {
    let store = memory_store();
    let (a, b, matched) = matched_pair(&store).await;

    let txn = transaction::submit_details(&a, matched.id, party_details("門市"))
        .await
        .unwrap();
    transaction::cancel(&a, txn.id).await.unwrap();

    let state = a.snapshot().await;
    assert_eq!(state.transaction(txn.id).unwrap().status, TransactionStatus::Cancelled);
    assert_eq!(state.match_by_id(matched.id).unwrap().status, MatchStatus::Active);

    // Negotiation can restart on both sides.
    let bob_doc = store.get_state(b.user_id()).await.unwrap().unwrap();
    assert_eq!(bob_doc.match_by_id(matched.id).unwrap().status, MatchStatus::Active);
}

#[tokio::test]
async fn test_submit_against_unknown_match_is_not_found() {
    let store = memory_store();
    let alice = identity("Alice");
    let a = open_test_session(&store, &alice).await;

    let result = transaction::submit_details(&a, Uuid::new_v4(), party_details("門市")).await;
    assert_matches!(result, Err(ExchangeError::NotFound(_)));
}

#[tokio::test]
async fn test_submit_rejects_malformed_phone() {
    let store = memory_store();
    let (a, _b, matched) = matched_pair(&store).await;

    let mut details = party_details("門市");
    details.phone_number = "not-a-phone".to_string();
    let result = transaction::submit_details(&a, matched.id, details).await;
    assert_matches!(result, Err(ExchangeError::Validation(_)));
}
