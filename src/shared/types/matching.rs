//! Match, like and request records
//!
//! A match is the confirmed pairing of two items owned by two different
//! users. The record is physically duplicated: one copy is embedded in each
//! participant's state document, and the two copies can diverge when one of
//! the two independent writes fails. Matches are never hard-deleted, only
//! status-transitioned.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::types::item::ClothingItem;

/// Lifecycle of a match. Status transitions drive chat availability and
/// transaction eligibility.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum MatchStatus {
    Active,
    InTransaction,
    Completed,
    Cancelled,
}

impl MatchStatus {
    /// Precedence used by the reconciliation sweep when the two replicas of
    /// a match disagree: the copy that progressed further wins.
    pub fn rank(self) -> u8 {
        match self {
            MatchStatus::Active => 0,
            MatchStatus::InTransaction => 1,
            MatchStatus::Cancelled => 2,
            MatchStatus::Completed => 3,
        }
    }

    /// Whether a handoff can still happen for a match in this status.
    pub fn is_open(self) -> bool {
        matches!(self, MatchStatus::Active | MatchStatus::InTransaction)
    }
}

/// One side of a match: a participant and the item they are trading away.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MatchSide {
    pub user_id: Uuid,
    pub clothing_item: ClothingItem,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub id: Uuid,
    pub user1: MatchSide,
    pub user2: MatchSide,
    pub matched_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    pub status: MatchStatus,
    /// Both participant ids, in `[user1, user2]` order.
    pub participants: [Uuid; 2],
}

impl Match {
    pub fn new(user1: MatchSide, user2: MatchSide) -> Self {
        let participants = [user1.user_id, user2.user_id];
        Self {
            id: Uuid::new_v4(),
            user1,
            user2,
            matched_at: Utc::now(),
            completed_at: None,
            status: MatchStatus::Active,
            participants,
        }
    }

    /// The other participant, if `me` is one of the two.
    pub fn counterparty(&self, me: Uuid) -> Option<Uuid> {
        match self.participants {
            [a, b] if a == me => Some(b),
            [a, b] if b == me => Some(a),
            _ => None,
        }
    }

    pub fn side_of(&self, user_id: Uuid) -> Option<&MatchSide> {
        if self.user1.user_id == user_id {
            Some(&self.user1)
        } else if self.user2.user_id == user_id {
            Some(&self.user2)
        } else {
            None
        }
    }

    pub fn side_of_mut(&mut self, user_id: Uuid) -> Option<&mut MatchSide> {
        if self.user1.user_id == user_id {
            Some(&mut self.user1)
        } else if self.user2.user_id == user_id {
            Some(&mut self.user2)
        } else {
            None
        }
    }

    pub fn embeds_item(&self, item_id: Uuid) -> bool {
        self.user1.clothing_item.id == item_id || self.user2.clothing_item.id == item_id
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LikedItemStatus {
    Pending,
    Matched,
    Rejected,
}

/// One outbound like, pending the other side's response. Owned by the
/// swiper; deletable once no longer pending.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LikedItem {
    pub id: Uuid,
    pub item: ClothingItem,
    pub status: LikedItemStatus,
    pub user_id: Uuid,
}

impl LikedItem {
    pub fn pending(item: ClothingItem, user_id: Uuid) -> Self {
        Self { id: Uuid::new_v4(), item, status: LikedItemStatus::Pending, user_id }
    }
}

/// Requester descriptor embedded in a request: identity plus a closet
/// snapshot so the recipient can pick a counter-item without a lookup.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Requester {
    pub id: Uuid,
    pub name: String,
    pub avatar: String,
    pub closet: Vec<ClothingItem>,
}

/// Inbound notification that another user liked one of your items. Lives
/// only in the recipient's document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    pub id: Uuid,
    pub requester: Requester,
    /// The *recipient's* item that was liked.
    pub item_of_interest: ClothingItem,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(owner: Uuid) -> ClothingItem {
        ClothingItem {
            id: Uuid::new_v4(),
            user_id: owner,
            user_name: "X".into(),
            user_avatar: "a".into(),
            image_urls: vec![],
            category: "Dress".into(),
            color: "Yellow".into(),
            style_tags: vec![],
            description: None,
            estimated_price: 800,
        }
    }

    #[test]
    fn test_counterparty() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let m = Match::new(
            MatchSide { user_id: a, clothing_item: item(a) },
            MatchSide { user_id: b, clothing_item: item(b) },
        );
        assert_eq!(m.counterparty(a), Some(b));
        assert_eq!(m.counterparty(b), Some(a));
        assert_eq!(m.counterparty(Uuid::new_v4()), None);
    }

    #[test]
    fn test_status_rank_ordering() {
        assert!(MatchStatus::Completed.rank() > MatchStatus::Cancelled.rank());
        assert!(MatchStatus::Cancelled.rank() > MatchStatus::InTransaction.rank());
        assert!(MatchStatus::InTransaction.rank() > MatchStatus::Active.rank());
    }

    #[test]
    fn test_status_wire_format() {
        let json = serde_json::to_string(&MatchStatus::InTransaction).unwrap();
        assert_eq!(json, "\"in-transaction\"");
    }

    #[test]
    fn test_new_match_is_active_with_both_participants() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let m = Match::new(
            MatchSide { user_id: a, clothing_item: item(a) },
            MatchSide { user_id: b, clothing_item: item(b) },
        );
        assert_eq!(m.status, MatchStatus::Active);
        assert_eq!(m.participants, [a, b]);
        assert!(m.completed_at.is_none());
    }
}
