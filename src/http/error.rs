//! API error responses.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::storage::StorageError;

/// Errors a handler can end with.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed or missing input.
    #[error("{0}")]
    Validation(&'static str),

    /// Wrong username or password at login.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// The referenced record does not exist.
    #[error("{0}")]
    NotFound(&'static str),

    #[error("Request body too large")]
    PayloadTooLarge,

    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Any other server-side failure; the message is for logs only.
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// Map a JSON body rejection. Length-limit failures keep their 413;
    /// everything else becomes a 400 carrying `message`.
    pub fn from_json_rejection(rejection: JsonRejection, message: &'static str) -> Self {
        tracing::debug!(error = %rejection, "Rejected request body");
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge
        } else {
            ApiError::Validation(message)
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Storage(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show a client.
    fn external_message(&self) -> String {
        match self {
            ApiError::Storage(_) | ApiError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        (status, Json(json!({ "error": self.external_message() }))).into_response()
    }
}
