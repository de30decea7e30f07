//! Chat message data structure
//!
//! Messages are stored per match, ordered by timestamp ascending, outside
//! the user state documents so chat volume never bloats them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub text: String,
    pub sender_avatar: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(sender_id: Uuid, text: String, sender_avatar: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            sender_id,
            text,
            sender_avatar,
            timestamp: Utc::now(),
        }
    }
}
