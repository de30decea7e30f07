//! Shared Module
//!
//! Types and data structures used across the backend: the document-level
//! domain model, shared error types and the application configuration. All
//! types here are designed for serialization to the backing store and over
//! the HTTP API.

/// Application configuration
pub mod config;

/// Shared error types
pub mod error;

/// Domain data structures
pub mod types;

/// Re-export commonly used types for convenience
pub use config::{AppConfig, AppConfigBuilder, ConfigError};
pub use error::SharedError;
pub use types::{
    ChatMessage, ClothingItem, ItemFields, LikedItem, LikedItemStatus, Match, MatchSide,
    MatchStatus, PickupMethod, ProfilePatch, Request, Requester, Transaction,
    TransactionPartyDetails, TransactionStatus, UserAppState, UserProfile,
};
