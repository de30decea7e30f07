//! Server Module
//!
//! Initialization and configuration of the Axum HTTP server.
//!
//! # Architecture
//!
//! - **`state`** - `AppState`, the session registry and `FromRef`
//!   implementations
//! - **`config`** - turning `AppConfig` into concrete services (store
//!   selection)
//! - **`init`** - app creation and background tasks
//!
//! # Initialization Flow
//!
//! 1. Build the backing store (Postgres, or in-memory fallback)
//! 2. Assemble `AppState` from the injected configuration
//! 3. Configure the router and the channel-cleanup task

/// Application state management
pub mod state;

/// Server configuration loading
pub mod config;

/// Server initialization
pub mod init;

// Re-export commonly used types
pub use init::create_app;
pub use state::{AppState, SessionRegistry};
