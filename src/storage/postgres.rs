//! PostgreSQL-backed log store.

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

use crate::config::DatabaseConfig;
use crate::storage::{LogRecord, LogStore, NewLogRecord, StorageError};

/// Open a bounded connection pool.
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, StorageError> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .max_lifetime(Duration::from_secs(config.max_lifetime_secs))
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .connect(&config.url)
        .await?;

    tracing::info!(
        max_connections = config.max_connections,
        max_lifetime_secs = config.max_lifetime_secs,
        "Connected to PostgreSQL"
    );
    Ok(pool)
}

/// `LogStore` over the `logs` table.
#[derive(Debug, Clone)]
pub struct PgLogStore {
    pool: PgPool,
}

impl PgLogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LogStore for PgLogStore {
    async fn list(&self) -> Result<Vec<LogRecord>, StorageError> {
        let rows = sqlx::query_as::<_, LogRecord>(
            r#"
            SELECT id, level, message, service, created_at
            FROM logs
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn insert(&self, record: &NewLogRecord) -> Result<i64, StorageError> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO logs (message, level, service, created_at)
            VALUES ($1, $2, $3, NOW())
            RETURNING id
            "#,
        )
        .bind(&record.message)
        .bind(&record.level)
        .bind(&record.service)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn update_message(&self, id: i64, message: &str) -> Result<bool, StorageError> {
        let result = sqlx::query("UPDATE logs SET message = $1 WHERE id = $2")
            .bind(message)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: i64) -> Result<bool, StorageError> {
        let result = sqlx::query("DELETE FROM logs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<(), StorageError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
