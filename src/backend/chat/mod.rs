//! Chat Backend Module
//!
//! Real-time chat for matched users. Each match gets its own ordered,
//! append-only message stream: messages are persisted through the state
//! store (outside the user documents) and fanned out to live subscribers
//! over per-match broadcast channels. Subscribers register a listener for
//! one match and must drop it on teardown; channels with no remaining
//! receivers are pruned.
//!
//! # Architecture
//!
//! - **`state`** - per-match broadcast channel registry
//! - **`handlers`** - HTTP handlers (history, send, SSE subscription)

/// Per-match broadcast channels
pub mod state;

/// HTTP handlers
pub mod handlers;

/// Re-export commonly used types
pub use state::ChatBroadcastState;
