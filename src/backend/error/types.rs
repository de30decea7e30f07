/**
 * Backend Error Types
 *
 * This module defines error types specific to the backend server.
 * These errors are used in HTTP handlers and can be converted to HTTP
 * responses.
 *
 * # Error Categories
 *
 * - Domain failures bubble up from the exchange engine (`ExchangeError`):
 *   stale references, validation failures, store outages.
 * - Access failures are produced by the handlers themselves: missing or
 *   invalid credentials, no open session, acting on someone else's match.
 */

use axum::http::StatusCode;
use thiserror::Error;

use crate::backend::exchange::ExchangeError;
use crate::backend::store::StoreError;
use crate::shared::SharedError;

/// Backend-specific error types
#[derive(Debug, Error)]
pub enum BackendError {
    /// Domain failure from the exchange engine
    #[error(transparent)]
    Exchange(#[from] ExchangeError),

    /// Store failure outside the engine (profile writes, chat log)
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Missing or invalid bearer credentials
    #[error("Unauthorized")]
    Unauthorized,

    /// Authenticated, but no open session; the client must POST
    /// /api/session first
    #[error("No open session")]
    NoSession,

    /// Acting on a match the caller does not participate in
    #[error("Forbidden")]
    Forbidden,

    /// Tag suggestion collaborator failed; the client reverts to manual
    /// entry
    #[error("Tag suggestion failed: {0}")]
    Tagging(String),
}

impl BackendError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Exchange(e) => match e {
                ExchangeError::NotFound(_) => StatusCode::NOT_FOUND,
                ExchangeError::NoDeck => StatusCode::CONFLICT,
                ExchangeError::DeckExhausted => StatusCode::CONFLICT,
                ExchangeError::Validation(SharedError::ValidationError { .. }) => {
                    StatusCode::BAD_REQUEST
                }
                ExchangeError::Validation(_) => StatusCode::INTERNAL_SERVER_ERROR,
                ExchangeError::Store(_) => StatusCode::SERVICE_UNAVAILABLE,
            },
            Self::Store(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::NoSession => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Tagging(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_404() {
        let error = BackendError::Exchange(ExchangeError::NotFound("request"));
        assert_eq!(error.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_validation_maps_to_400() {
        let error = BackendError::Exchange(
            SharedError::validation("phoneNumber", "required").into(),
        );
        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_deck_exhausted_maps_to_409() {
        let error = BackendError::Exchange(ExchangeError::DeckExhausted);
        assert_eq!(error.status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_unauthorized_maps_to_401() {
        assert_eq!(BackendError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(BackendError::NoSession.status_code(), StatusCode::UNAUTHORIZED);
    }
}
