//! Backend Module
//!
//! Server-side code for the styleswap exchange: an Axum HTTP server over a
//! document-oriented backing store, with per-user in-memory sessions,
//! debounced state replication and real-time chat.
//!
//! # Architecture
//!
//! The backend is organized into focused submodules:
//!
//! - **`server`** - Server initialization, application state, configuration
//! - **`routes`** - HTTP route configuration and router assembly
//! - **`store`** - Document store accessors (Postgres, in-memory)
//! - **`exchange`** - The matching engine: deck, swipes, negotiation,
//!   transactions, sync, reconciliation
//! - **`chat`** - Per-match message streams and broadcast channels
//! - **`auth`** - Bearer-token verification
//! - **`tagging`** - AI tag suggestion collaborator
//! - **`middleware`** - Request processing middleware
//! - **`error`** - Backend-specific error types
//!
//! # State Management
//!
//! `AppState` holds the injected configuration, the backing store, the
//! per-user session registry and the chat broadcast channels. State is
//! shared across request handlers using `Arc` and `RwLock`; broadcast
//! channels use `tokio::sync::broadcast`.
//!
//! # Consistency
//!
//! The backing store offers no cross-document transactions. A user's own
//! mutations are debounce-persisted; cross-user effects are direct
//! best-effort writes into the counterparty's document, reconciled after
//! the fact when a mirror write was missed (see `exchange::reconcile`).

/// Server setup and configuration
pub mod server;

/// Route configuration
pub mod routes;

/// Document store accessors
pub mod store;

/// The exchange engine
pub mod exchange;

/// Chat message streams
pub mod chat;

/// Backend error types
pub mod error;

/// Bearer-token verification
pub mod auth;

/// Middleware for request processing
pub mod middleware;

/// AI tag suggestion collaborator
pub mod tagging;

/// Re-export commonly used types
pub use error::BackendError;
pub use server::create_app;
