/**
 * Session Tokens
 *
 * JWT verification for bearer tokens minted by the external identity
 * provider. `create_token` exists for tooling and tests; the server itself
 * never mints production tokens.
 */

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: String,
    /// Email
    pub email: String,
    /// Display name, when the provider knows one
    #[serde(default)]
    pub name: Option<String>,
    /// Avatar URL, when the provider knows one
    #[serde(default)]
    pub avatar: Option<String>,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
    /// Issued at time (Unix timestamp)
    pub iat: u64,
}

/// Create a JWT token for a user
///
/// # Arguments
/// * `secret` - Signing secret (from `AppConfig`)
/// * `user_id` - User ID (UUID)
/// * `email` - User email
/// * `name` - Optional display name
///
/// # Returns
/// JWT token string
pub fn create_token(
    secret: &str,
    user_id: uuid::Uuid,
    email: String,
    name: Option<String>,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    // Token expires in 30 days
    let exp = now + (30 * 24 * 60 * 60);

    let claims = Claims {
        sub: user_id.to_string(),
        email,
        name,
        avatar: None,
        exp,
        iat: now,
    };

    let key = EncodingKey::from_secret(secret.as_ref());
    encode(&Header::default(), &claims, &key)
}

/// Verify and decode a JWT token
///
/// # Arguments
/// * `secret` - Verification secret (from `AppConfig`)
/// * `token` - JWT token string
///
/// # Returns
/// Decoded claims or error
pub fn verify_token(secret: &str, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let key = DecodingKey::from_secret(secret.as_ref());
    let validation = Validation::default();

    let token_data = decode::<Claims>(token, &key, &validation)?;
    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn test_create_and_verify_round_trip() {
        let user_id = uuid::Uuid::new_v4();
        let token =
            create_token(SECRET, user_id, "test@example.com".into(), Some("Tester".into()))
                .unwrap();

        let claims = verify_token(SECRET, &token).unwrap();
        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.email, "test@example.com");
        assert_eq!(claims.name.as_deref(), Some("Tester"));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token =
            create_token(SECRET, uuid::Uuid::new_v4(), "t@example.com".into(), None).unwrap();
        assert!(verify_token("other-secret", &token).is_err());
    }

    #[test]
    fn test_garbage_token_rejected() {
        assert!(verify_token(SECRET, "not-a-jwt").is_err());
    }
}
