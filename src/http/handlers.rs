//! Public handlers: login, health and metrics exposition.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::http::error::ApiError;
use crate::http::server::AppState;

/// Body of `POST /login`. Missing fields read as empty strings.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

/// Exchange the principal's credentials for a bearer token.
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Json(creds) =
        payload.map_err(|rejection| ApiError::from_json_rejection(rejection, "Invalid request"))?;

    if !state.credentials.verify(&creds.username, &creds.password).await {
        tracing::warn!(username = %creds.username, "Login failed");
        return Err(ApiError::InvalidCredentials);
    }

    let issued = state
        .tokens
        .issue(&creds.username)
        .map_err(|e| ApiError::Internal(format!("Error generating token: {e}")))?;

    tracing::info!(username = %creds.username, "Login succeeded");
    Ok(Json(LoginResponse { token: issued.token }))
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Prometheus text exposition.
pub async fn render_metrics(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
