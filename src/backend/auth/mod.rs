//! Authentication Module
//!
//! Authentication itself is an external collaborator: tokens are minted by
//! the identity provider and only *verified* here. A valid bearer token
//! yields the opaque verified identity (id, display name, email, avatar)
//! that session bootstrap consumes.
//!
//! # Security
//!
//! - JWT tokens are used for stateless authentication
//! - The verification secret comes from the injected `AppConfig`, never
//!   from globals
//! - Tokens expire after 30 days

/// JWT token verification
pub mod sessions;

// Re-export commonly used types
pub use sessions::{create_token, verify_token, Claims};
