//! Authentication subsystem.
//!
//! # Data Flow
//! ```text
//! POST /login:
//!     credentials.rs (CredentialVerifier) → token.rs (issue)
//!
//! Protected request:
//!     gate.rs (Authorization header → Bearer token)
//!     → token.rs (verify signature, then expiry)
//!     → AuthenticatedUser inserted into request extensions
//!     → next stage
//! ```
//!
//! # Design Decisions
//! - Fail closed: any gate failure is a 401 and the handler never runs
//! - Failure kinds stay distinct for logs and tests, uniform for clients
//! - The credential source is a trait so the gate never knows who vouches

pub mod credentials;
pub mod gate;
pub mod token;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

pub use credentials::{CredentialVerifier, StaticCredentials};
pub use gate::{require_bearer, AuthenticatedUser};
pub use token::{Claims, IssuedToken, TokenError, TokenService};

/// Reasons a protected request is refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Missing token")]
    MissingToken,

    #[error("Invalid token format")]
    MalformedHeader,

    #[error("Invalid token")]
    TokenInvalid,

    #[error("Token expired")]
    TokenExpired,
}

impl AuthError {
    /// Stable machine-readable kind.
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::MissingToken => "missing_token",
            AuthError::MalformedHeader => "malformed_header",
            AuthError::TokenInvalid => "token_invalid",
            AuthError::TokenExpired => "token_expired",
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = json!({
            "error": self.to_string(),
            "code": self.code(),
        });
        (StatusCode::UNAUTHORIZED, Json(body)).into_response()
    }
}
