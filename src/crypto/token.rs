//! Session token issuing and validation.
//!
//! Tokens are HS256 JWTs carrying the typed [`Claims`]. Validation is purely
//! structural: signature, expiry and claim shape. The session cache is not
//! consulted here.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::error::{AppError, Result};
use crate::models::session::Claims;

/// Signs and verifies session tokens with a shared secret.
#[derive(Clone)]
pub struct TokenManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    lifetime: Duration,
}

impl TokenManager {
    /// Creates a new `TokenManager`.
    ///
    /// # Arguments
    ///
    /// * `secret` - The HMAC secret.
    /// * `lifetime_hours` - How long issued tokens stay valid.
    pub fn new(secret: &[u8], lifetime_hours: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            lifetime: Duration::hours(lifetime_hours),
        }
    }

    /// Issues a fresh token for `account_id`.
    pub fn issue(&self, account_id: i64) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            account_id,
            iat: now.timestamp(),
            exp: (now + self.lifetime).timestamp(),
        };
        self.sign(&claims)
    }

    /// Signs arbitrary claims.
    pub fn sign(&self, claims: &Claims) -> Result<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| AppError::Token(format!("Failed to sign token: {}", e)))
    }

    /// Validates a token and returns its claims.
    pub fn validate(&self, token: &str) -> Result<Claims> {
        let validation = Validation::new(Algorithm::HS256);

        let data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            tracing::debug!("Token rejected: {}", e);
            AppError::Authentication("Unauthorized".to_string())
        })?;

        Ok(data.claims)
    }
}
