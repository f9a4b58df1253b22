//! Token issuance and verification
//!
//! Compact HS256 tokens carrying the subject email, role name, and expiry.
//! Verification collapses every failure (bad structure, bad signature,
//! expiry) into a single opaque kind so callers cannot learn which check
//! rejected the token.

use std::time::Duration;

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical token lifetime: 60 minutes.
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(60 * 60);

/// Decoded token claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user email)
    pub sub: String,
    /// Role name
    pub rol: String,
    /// Expiration time (Unix timestamp, seconds)
    pub exp: usize,
}

/// Token errors
#[derive(Debug, Error)]
pub enum TokenError {
    /// Malformed structure, bad signature, or expired. Deliberately one
    /// variant with no detail.
    #[error("Invalid token")]
    Invalid,
    #[error("Token encoding failed: {0}")]
    EncodingFailed(String),
}

/// Issues and verifies signed tokens with a symmetric key.
///
/// The secret is injected at construction and read-only afterwards; the
/// service holds no other state.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl TokenService {
    /// Create a new token service with the given secret
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
        }
    }

    /// Issue a token asserting `{sub, rol, exp: now + ttl}`.
    pub fn issue(&self, subject: &str, role: &str, ttl: Duration) -> Result<String, TokenError> {
        let now = chrono::Utc::now().timestamp() as usize;
        let claims = Claims {
            sub: subject.to_string(),
            rol: role.to_string(),
            exp: now + ttl.as_secs() as usize,
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| TokenError::EncodingFailed(e.to_string()))
    }

    /// Validate and decode a token.
    ///
    /// No leeway: a token whose expiry is at or before the current second
    /// is already invalid, so a zero-TTL token is rejected immediately.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let data = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|_| TokenError::Invalid)?;

        let now = chrono::Utc::now().timestamp() as usize;
        if data.claims.exp <= now {
            return Err(TokenError::Invalid);
        }

        Ok(data.claims)
    }
}

/// Extract a bearer token from an Authorization header value
pub fn extract_bearer_token(authorization: &str) -> Option<&str> {
    if authorization.to_lowercase().starts_with("bearer ") {
        Some(authorization[7..].trim())
    } else {
        None
    }
}
