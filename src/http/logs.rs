//! CRUD handlers for `/logs`.
//!
//! Each handler validates its input, makes exactly one storage call and
//! answers with a fixed-shape JSON body. PUT and PATCH both replace the
//! message.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};

use crate::auth::AuthenticatedUser;
use crate::http::error::ApiError;
use crate::http::server::AppState;
use crate::storage::{LogRecord, NewLogRecord};

/// Body of `POST /logs`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateLogRequest {
    pub message: String,
    pub level: Option<String>,
    pub service: Option<String>,
}

/// Body of `PUT` and `PATCH /logs/{id}`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateLogRequest {
    pub message: String,
}

/// A record as returned by `GET /logs`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogView {
    pub id: i64,
    pub level: String,
    pub message: String,
    pub service: String,
    pub created_at: String,
}

impl From<LogRecord> for LogView {
    fn from(record: LogRecord) -> Self {
        Self {
            id: record.id,
            level: record.level.unwrap_or_default(),
            message: record.message,
            service: record.service.unwrap_or_default(),
            created_at: record
                .created_at
                .map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true))
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub id: Option<i64>,
}

impl MessageResponse {
    fn new(message: &str) -> Json<Self> {
        Json(Self {
            message: message.to_string(),
            id: None,
        })
    }
}

pub async fn list_logs(State(state): State<AppState>) -> Result<Json<Vec<LogView>>, ApiError> {
    let records = state.store.list().await?;
    Ok(Json(records.into_iter().map(LogView::from).collect()))
}

pub async fn create_log(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    payload: Result<Json<CreateLogRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let Json(body) = payload
        .map_err(|rejection| ApiError::from_json_rejection(rejection, "Invalid request body"))?;
    if body.message.is_empty() {
        return Err(ApiError::Validation("Message cannot be empty"));
    }

    let record = NewLogRecord {
        message: body.message,
        level: body.level,
        service: body.service,
    };
    let id = state.store.insert(&record).await?;

    tracing::info!(id, username = %user.username, "Log added");
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "Log added successfully".to_string(),
            id: Some(id),
        }),
    ))
}

/// `PUT /logs/{id}`.
pub async fn replace_log(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
    payload: Result<Json<UpdateLogRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    set_message(&state, &user, &id, payload).await?;
    Ok(MessageResponse::new("Log updated successfully"))
}

/// `PATCH /logs/{id}`.
pub async fn patch_log(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
    payload: Result<Json<UpdateLogRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    set_message(&state, &user, &id, payload).await?;
    Ok(MessageResponse::new("Log patched successfully"))
}

pub async fn delete_log(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_id(&id)?;
    if !state.store.delete(id).await? {
        return Err(ApiError::NotFound("Log not found"));
    }

    tracing::info!(id, username = %user.username, "Log deleted");
    Ok(MessageResponse::new("Log deleted successfully"))
}

async fn set_message(
    state: &AppState,
    user: &AuthenticatedUser,
    raw_id: &str,
    payload: Result<Json<UpdateLogRequest>, JsonRejection>,
) -> Result<(), ApiError> {
    let id = parse_id(raw_id)?;
    let Json(body) = payload
        .map_err(|rejection| ApiError::from_json_rejection(rejection, "Invalid request body"))?;
    if body.message.is_empty() {
        return Err(ApiError::Validation("Message cannot be empty"));
    }

    if !state.store.update_message(id, &body.message).await? {
        return Err(ApiError::NotFound("Log not found"));
    }

    tracing::info!(id, username = %user.username, "Log message replaced");
    Ok(())
}

fn parse_id(raw: &str) -> Result<i64, ApiError> {
    if raw.is_empty() {
        return Err(ApiError::Validation("ID is required"));
    }
    raw.parse().map_err(|_| ApiError::Validation("Invalid log ID"))
}
