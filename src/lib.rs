//! Styleswap - Main Library
//!
//! Styleswap is the backend core of a swipe-based clothing exchange: users
//! upload clothing items, swipe through a deck of other users' items, match
//! on mutual interest, negotiate a physical handoff and chat.
//!
//! # Overview
//!
//! The hard part lives in the matching and per-user state synchronization
//! model, built atop a document-oriented backing store with no relational
//! joins and no cross-document transactions:
//!
//! - A swipe deck excluding previously-seen and self-owned items
//! - Bidirectional match records replicated into two independent user
//!   documents
//! - Replicated records kept consistent without a shared transaction
//!   (best-effort mirror writes plus a reconciliation sweep)
//! - Request/like/transaction lifecycles derived from swipe and
//!   negotiation actions
//!
//! # Module Structure
//!
//! - **`shared`** - Domain types, shared errors, application configuration
//! - **`backend`** - The Axum server: store accessors, the exchange
//!   engine, chat, auth and routes
//!
//! # Usage
//!
//! ```rust,no_run
//! use styleswap::backend::server::init::create_app;
//! use styleswap::shared::config::AppConfig;
//!
//! # async fn example() {
//! let app = create_app(AppConfig::from_env()).await;
//! // Use app with axum::serve
//! # }
//! ```
//!
//! # Consistency Model
//!
//! A session's mutations apply to in-memory state synchronously and are
//! persisted by a debounced save (~800 ms quiet period). Cross-user
//! effects write the counterparty's document directly at decision time.
//! The two writes of a mirrored mutation are independent best-effort
//! operations; divergence is repaired by the reconciliation sweep rather
//! than prevented by transactions.

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
pub mod backend;
