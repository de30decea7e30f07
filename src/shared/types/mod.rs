//! Domain types shared across the backend
//!
//! These are the wire- and document-level data structures: what the backing
//! store persists and what the HTTP API serializes. Field names follow the
//! historical document format (camelCase, with `style_tags` as the one
//! legacy exception).

pub mod item;
pub mod matching;
pub mod message;
pub mod state;
pub mod transaction;
pub mod user;

pub use item::{ClothingItem, ItemFields};
pub use matching::{
    LikedItem, LikedItemStatus, Match, MatchSide, MatchStatus, Request, Requester,
};
pub use message::ChatMessage;
pub use state::UserAppState;
pub use transaction::{
    PickupMethod, Transaction, TransactionPartyDetails, TransactionStatus,
};
pub use user::{ProfilePatch, UserProfile};
