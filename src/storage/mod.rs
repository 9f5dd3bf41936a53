//! Log record storage.
//!
//! # Data Flow
//! ```text
//! HTTP handler (validated input)
//!     → LogStore trait (one call per request)
//!     → postgres.rs (parameterized SQL over a bounded PgPool)
//! ```
//!
//! # Design Decisions
//! - Handlers only see the trait, so tests swap in an in-memory store
//! - Mutations report whether a row matched; "not found" is the handler's call
//! - Errors carry full detail for logs; handlers never forward it to clients

pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

pub use postgres::PgLogStore;

/// A stored log record.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct LogRecord {
    pub id: i64,
    pub level: Option<String>,
    pub message: String,
    pub service: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Input for a new record. `created_at` and `id` are assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLogRecord {
    pub message: String,
    pub level: Option<String>,
    pub service: Option<String>,
}

/// Failures from the persistence layer.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Persistence operations backing the `/logs` routes.
#[async_trait]
pub trait LogStore: Send + Sync {
    /// All records, ordered by id.
    async fn list(&self) -> Result<Vec<LogRecord>, StorageError>;

    /// Insert a record and return its assigned id.
    async fn insert(&self, record: &NewLogRecord) -> Result<i64, StorageError>;

    /// Replace the message of a record. Returns `false` when no row matched.
    async fn update_message(&self, id: i64, message: &str) -> Result<bool, StorageError>;

    /// Delete a record. Returns `false` when no row matched.
    async fn delete(&self, id: i64) -> Result<bool, StorageError>;

    /// Round-trip to the backend.
    async fn ping(&self) -> Result<(), StorageError>;
}
