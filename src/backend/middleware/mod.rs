//! Middleware Module
//!
//! HTTP middleware applied before requests reach their handlers.
//!
//! - **`auth`** - bearer-token authentication for protected routes

pub mod auth;

pub use auth::{auth_middleware, AuthenticatedUser};
