/**
 * Authentication Middleware
 *
 * Protects routes that require a verified identity. Extracts the bearer
 * token from the Authorization header, verifies it against the configured
 * secret and attaches the resulting identity to the request extensions for
 * handlers to consume.
 */

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, StatusCode},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::backend::auth::sessions::verify_token;
use crate::backend::exchange::bootstrap::AuthIdentity;
use crate::backend::server::state::AppState;

/// Authenticated user data extracted from the JWT token
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub avatar: Option<String>,
}

impl AuthenticatedUser {
    /// The opaque identity handed to session bootstrap.
    pub fn identity(&self) -> AuthIdentity {
        AuthIdentity {
            id: self.user_id,
            email: self.email.clone(),
            name: self.name.clone(),
            avatar: self.avatar.clone(),
        }
    }
}

/// Authentication middleware
///
/// 1. Extracts the JWT from the Authorization header
/// 2. Verifies it with the secret from the injected config
/// 3. Attaches [`AuthenticatedUser`] to request extensions
///
/// Returns 401 Unauthorized if the token is missing or invalid.
pub async fn auth_middleware(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| {
            tracing::warn!("[Auth] missing Authorization header");
            StatusCode::UNAUTHORIZED
        })?;

    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        tracing::warn!("[Auth] invalid Authorization header format");
        StatusCode::UNAUTHORIZED
    })?;

    let claims = verify_token(&app_state.config.jwt_secret, token).map_err(|e| {
        tracing::warn!("[Auth] invalid token: {:?}", e);
        StatusCode::UNAUTHORIZED
    })?;

    let user_id = Uuid::parse_str(&claims.sub).map_err(|e| {
        tracing::warn!("[Auth] invalid user id in token: {:?}", e);
        StatusCode::UNAUTHORIZED
    })?;

    request.extensions_mut().insert(AuthenticatedUser {
        user_id,
        email: claims.email,
        name: claims.name,
        avatar: claims.avatar,
    });

    Ok(next.run(request).await)
}
