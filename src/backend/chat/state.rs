//! Per-match chat broadcast channels
//!
//! Manages one broadcast channel per match for real-time message delivery.
//! Channels are created lazily on first use and pruned once the last
//! receiver is gone, so an abandoned chat does not leak its subscription.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::shared::types::ChatMessage;

/// Capacity of each per-match channel; a receiver lagging further than this
/// drops the oldest events rather than blocking senders.
const CHANNEL_CAPACITY: usize = 100;

#[derive(Clone, Default)]
pub struct ChatBroadcastState {
    channels: Arc<Mutex<HashMap<Uuid, broadcast::Sender<ChatMessage>>>>,
}

impl ChatBroadcastState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or create the broadcast sender for a match.
    pub fn get_sender(&self, match_id: Uuid) -> broadcast::Sender<ChatMessage> {
        let mut channels = self.channels.lock().unwrap();
        channels
            .entry(match_id)
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .clone()
    }

    /// Register a listener for a match's live message stream. The receiver
    /// must be dropped on session/view teardown.
    pub fn subscribe(&self, match_id: Uuid) -> broadcast::Receiver<ChatMessage> {
        self.get_sender(match_id).subscribe()
    }

    /// Broadcast a message to all subscribers of a match.
    pub fn broadcast(&self, match_id: Uuid, message: ChatMessage) {
        if let Some(sender) = self.channels.lock().unwrap().get(&match_id) {
            let _ = sender.send(message); // Ignore if no receivers
        }
    }

    /// Clean up channels with no remaining subscribers.
    pub fn cleanup_inactive_channels(&self) {
        self.channels
            .lock()
            .unwrap()
            .retain(|_, sender| sender.receiver_count() > 0);
    }

    /// Subscriber count for a match (for logging).
    pub fn subscriber_count(&self, match_id: Uuid) -> usize {
        self.channels
            .lock()
            .unwrap()
            .get(&match_id)
            .map(|sender| sender.receiver_count())
            .unwrap_or(0)
    }
}
