//! Token issuance and verification.
//!
//! Tokens are HS256 JWTs carrying the principal's username and an absolute
//! expiry. Nothing is stored server-side: every request re-derives validity
//! from the token's own claims and the current wall-clock time.

use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::auth::AuthError;

/// Default token validity window (24 hours).
pub const DEFAULT_VALIDITY: Duration = Duration::from_secs(24 * 60 * 60);

/// Claims embedded in every token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub username: String,
    /// Expiry as seconds since the Unix epoch.
    pub exp: i64,
}

impl Claims {
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}

/// A freshly signed token.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub claims: Claims,
}

/// Errors raised while constructing the service or signing a token.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token signing secret is empty")]
    EmptySecret,

    #[error("validity window out of range")]
    InvalidValidity,

    #[error("failed to sign token: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
}

/// Issues and verifies signed, time-bounded tokens.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    validity: chrono::Duration,
}

impl TokenService {
    /// Build a service from the shared secret. An empty secret is refused.
    pub fn new(secret: &str, validity: Duration) -> Result<Self, TokenError> {
        if secret.is_empty() {
            return Err(TokenError::EmptySecret);
        }
        let validity =
            chrono::Duration::from_std(validity).map_err(|_| TokenError::InvalidValidity)?;

        // Expiry is checked by `verify_at` against the caller's clock, with no leeway.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            validity,
        })
    }

    /// Issue a token for an already-authenticated username.
    pub fn issue(&self, username: &str) -> Result<IssuedToken, TokenError> {
        self.issue_at(username, Utc::now())
    }

    /// Issue a token as if the current time were `issued_at`.
    pub fn issue_at(
        &self,
        username: &str,
        issued_at: DateTime<Utc>,
    ) -> Result<IssuedToken, TokenError> {
        let expires_at = issued_at
            .checked_add_signed(self.validity)
            .ok_or(TokenError::InvalidValidity)?;

        let claims = Claims {
            username: username.to_string(),
            exp: expires_at.timestamp(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?;

        tracing::debug!(username = %username, expires_at = %expires_at, "Issued token");
        Ok(IssuedToken { token, claims })
    }

    /// Verify signature, structure and expiry against the current time.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        self.verify_at(token, Utc::now())
    }

    /// Verify a token as if the current time were `now`.
    ///
    /// The token must expire strictly after `now`.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, AuthError> {
        let claims = decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(error = %e, "Token failed verification");
                AuthError::TokenInvalid
            })?;

        if claims.exp <= now.timestamp() {
            return Err(AuthError::TokenExpired);
        }
        Ok(claims)
    }
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("validity", &self.validity)
            .finish_non_exhaustive()
    }
}
