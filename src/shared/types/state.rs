//! Per-user application state document
//!
//! One document per user holds that user's full exchange state: closet,
//! matches, likes, inbound requests, transactions and the seen-set. The
//! store gives no cross-document guarantees, so integrity between documents
//! is an application invariant, not a storage one.
//!
//! Every embedded collection is mutated through an explicit operation on
//! this type rather than by whole-array read-modify-write at call sites;
//! callers never splice the vectors directly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

use crate::shared::types::item::ClothingItem;
use crate::shared::types::matching::{LikedItem, LikedItemStatus, Match, MatchStatus, Request};
use crate::shared::types::transaction::{
    Transaction, TransactionPartyDetails, TransactionStatus,
};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserAppState {
    #[serde(default)]
    pub my_closet: Vec<ClothingItem>,
    #[serde(default)]
    pub matches: Vec<Match>,
    #[serde(default)]
    pub liked_items: Vec<LikedItem>,
    #[serde(default)]
    pub requests: Vec<Request>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    /// Ids of items already swiped on, in either direction. Set semantics.
    #[serde(default)]
    pub seen_item_ids: BTreeSet<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl UserAppState {
    // --- closet ---

    pub fn add_closet_item(&mut self, item: ClothingItem) {
        self.my_closet.insert(0, item);
    }

    pub fn closet_item(&self, item_id: Uuid) -> Option<&ClothingItem> {
        self.my_closet.iter().find(|i| i.id == item_id)
    }

    /// Replace an existing closet item in place. Returns false when the
    /// item is not in the closet.
    pub fn update_closet_item(&mut self, item: ClothingItem) -> bool {
        match self.my_closet.iter_mut().find(|i| i.id == item.id) {
            Some(slot) => {
                *slot = item;
                true
            }
            None => false,
        }
    }

    pub fn remove_closet_item(&mut self, item_id: Uuid) -> Option<ClothingItem> {
        let idx = self.my_closet.iter().position(|i| i.id == item_id)?;
        Some(self.my_closet.remove(idx))
    }

    // --- seen set ---

    /// Record a swiped item. Idempotent; returns whether the id was new.
    pub fn mark_seen(&mut self, item_id: Uuid) -> bool {
        self.seen_item_ids.insert(item_id)
    }

    // --- matches ---

    pub fn add_match(&mut self, m: Match) {
        self.matches.insert(0, m);
    }

    pub fn match_by_id(&self, match_id: Uuid) -> Option<&Match> {
        self.matches.iter().find(|m| m.id == match_id)
    }

    pub fn match_by_id_mut(&mut self, match_id: Uuid) -> Option<&mut Match> {
        self.matches.iter_mut().find(|m| m.id == match_id)
    }

    /// Transition a match's status. `completed_at` is stamped only on the
    /// first transition to `Completed` and never re-stamped. Returns false
    /// when the match is absent from this document.
    pub fn set_match_status(
        &mut self,
        match_id: Uuid,
        status: MatchStatus,
        completed_at: Option<DateTime<Utc>>,
    ) -> bool {
        match self.match_by_id_mut(match_id) {
            Some(m) => {
                m.status = status;
                if status == MatchStatus::Completed && m.completed_at.is_none() {
                    m.completed_at = completed_at.or_else(|| Some(Utc::now()));
                }
                true
            }
            None => false,
        }
    }

    // --- likes ---

    pub fn add_liked_item(&mut self, liked: LikedItem) {
        self.liked_items.insert(0, liked);
    }

    pub fn liked_item(&self, like_id: Uuid) -> Option<&LikedItem> {
        self.liked_items.iter().find(|l| l.id == like_id)
    }

    /// Update the status of the like referencing `item_id`, if any.
    pub fn set_liked_status_for_item(&mut self, item_id: Uuid, status: LikedItemStatus) -> bool {
        match self.liked_items.iter_mut().find(|l| l.item.id == item_id) {
            Some(like) => {
                like.status = status;
                true
            }
            None => false,
        }
    }

    /// Drop the like referencing `item_id`, used when a like converts into
    /// a match and must not remain dangling.
    pub fn clear_like_for_item(&mut self, item_id: Uuid) -> Option<LikedItem> {
        let idx = self.liked_items.iter().position(|l| l.item.id == item_id)?;
        Some(self.liked_items.remove(idx))
    }

    pub fn remove_liked_item(&mut self, like_id: Uuid) -> Option<LikedItem> {
        let idx = self.liked_items.iter().position(|l| l.id == like_id)?;
        Some(self.liked_items.remove(idx))
    }

    // --- requests (inbound queue) ---

    pub fn add_request(&mut self, request: Request) {
        self.requests.insert(0, request);
    }

    pub fn request(&self, request_id: Uuid) -> Option<&Request> {
        self.requests.iter().find(|r| r.id == request_id)
    }

    pub fn remove_request(&mut self, request_id: Uuid) -> Option<Request> {
        let idx = self.requests.iter().position(|r| r.id == request_id)?;
        Some(self.requests.remove(idx))
    }

    /// Drop every inbound request targeting `item_id`, returning the removed
    /// requests so their senders can be notified. Used when the item is
    /// deleted.
    pub fn remove_requests_for_item(&mut self, item_id: Uuid) -> Vec<Request> {
        let mut removed = Vec::new();
        self.requests.retain(|r| {
            if r.item_of_interest.id == item_id {
                removed.push(r.clone());
                false
            } else {
                true
            }
        });
        removed
    }

    // --- transactions ---

    pub fn transaction(&self, transaction_id: Uuid) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id == transaction_id)
    }

    pub fn transaction_by_match(&self, match_id: Uuid) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.match_id == match_id)
    }

    /// Merge `details` under `party` into the transaction for `match_id`,
    /// creating it when absent. Only the caller's own key is touched, so
    /// concurrently-submitted counterparty details survive. When creating,
    /// `template` supplies the transaction id so both replicas agree on it.
    pub fn upsert_transaction_details(
        &mut self,
        match_id: Uuid,
        party: Uuid,
        details: TransactionPartyDetails,
        template: Option<&Transaction>,
    ) -> Transaction {
        if let Some(txn) = self.transactions.iter_mut().find(|t| t.match_id == match_id) {
            txn.parties.insert(party, details);
            return txn.clone();
        }
        let txn = match template {
            Some(t) => {
                let mut txn = t.clone();
                txn.parties.insert(party, details);
                txn
            }
            None => Transaction::open(match_id, party, details),
        };
        self.transactions.insert(0, txn.clone());
        txn
    }

    /// Transition a transaction's status; returns the linked match id so the
    /// caller can propagate the reciprocal match-status change.
    pub fn set_transaction_status(
        &mut self,
        transaction_id: Uuid,
        status: TransactionStatus,
    ) -> Option<Uuid> {
        let txn = self.transactions.iter_mut().find(|t| t.id == transaction_id)?;
        txn.status = status;
        Some(txn.match_id)
    }
}
