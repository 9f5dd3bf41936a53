//! Bearer-token gate for protected routes.
//!
//! # Responsibilities
//! - Read the `Authorization` header
//! - Require exactly `Bearer <token>`
//! - Verify the token and bind the username into the request
//!
//! # Design Decisions
//! - Applied with `route_layer`, so unmatched paths 404 instead of 401
//! - A rejection returns before `next` is called; the handler never runs

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::auth::{AuthError, TokenService};
use crate::http::request::request_id;

/// Identity bound to a request that passed the gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub username: String,
}

/// Middleware that rejects any request without a valid bearer token.
pub async fn require_bearer(
    State(tokens): State<Arc<TokenService>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    match authenticate(&tokens, req.headers()) {
        Ok(user) => {
            tracing::debug!(
                request_id = %request_id(req.headers()),
                username = %user.username,
                "Request authenticated"
            );
            req.extensions_mut().insert(user);
            Ok(next.run(req).await)
        }
        Err(err) => {
            tracing::warn!(
                request_id = %request_id(req.headers()),
                method = %req.method(),
                path = %req.uri().path(),
                kind = err.code(),
                "Rejected unauthenticated request"
            );
            Err(err)
        }
    }
}

/// Run the full header → token → identity check.
pub fn authenticate(
    tokens: &TokenService,
    headers: &HeaderMap,
) -> Result<AuthenticatedUser, AuthError> {
    let token = bearer_token(headers)?;
    let claims = tokens.verify(token)?;
    Ok(AuthenticatedUser {
        username: claims.username,
    })
}

/// Extract the raw token from `Authorization: Bearer <token>`.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = match headers.get(AUTHORIZATION) {
        None => return Err(AuthError::MissingToken),
        Some(v) if v.is_empty() => return Err(AuthError::MissingToken),
        Some(v) => v.to_str().map_err(|_| AuthError::MalformedHeader)?,
    };

    let mut parts = value.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some("Bearer"), Some(token), None) => Ok(token),
        _ => Err(AuthError::MalformedHeader),
    }
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or(AuthError::MissingToken)
    }
}
