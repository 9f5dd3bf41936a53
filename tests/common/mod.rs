//! Shared utilities for integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use chrono::Utc;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tower::ServiceExt;

use log_monitor::auth::{StaticCredentials, TokenService};
use log_monitor::config::ServiceConfig;
use log_monitor::observability::HttpMetrics;
use log_monitor::storage::{LogRecord, LogStore, NewLogRecord, StorageError};
use log_monitor::{build_router, AppState};

pub const SECRET: &str = "integration-test-secret";
pub const USERNAME: &str = "admin";
pub const PASSWORD: &str = "password";

/// In-memory `LogStore` that counts every call it receives.
#[derive(Default)]
pub struct RecordingStore {
    records: Mutex<Vec<LogRecord>>,
    next_id: AtomicI64,
    calls: AtomicUsize,
    writes: AtomicUsize,
    failing: AtomicBool,
    latency_ms: AtomicU64,
}

impl RecordingStore {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Make every subsequent call fail as if the database were down.
    pub fn fail(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    /// Delay every subsequent call by `latency`.
    pub fn slow_down(&self, latency: Duration) {
        self.latency_ms.store(latency.as_millis() as u64, Ordering::SeqCst);
    }

    async fn enter(&self) -> Result<(), StorageError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let latency = self.latency_ms.load(Ordering::SeqCst);
        if latency > 0 {
            tokio::time::sleep(Duration::from_millis(latency)).await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(StorageError::Database(sqlx::Error::Configuration(
                "connection refused (host=db.internal)".into(),
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl LogStore for RecordingStore {
    async fn list(&self) -> Result<Vec<LogRecord>, StorageError> {
        self.enter().await?;
        Ok(self.records.lock().unwrap().clone())
    }

    async fn insert(&self, record: &NewLogRecord) -> Result<i64, StorageError> {
        self.enter().await?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        self.records.lock().unwrap().push(LogRecord {
            id,
            level: record.level.clone(),
            message: record.message.clone(),
            service: record.service.clone(),
            created_at: Some(Utc::now()),
        });
        Ok(id)
    }

    async fn update_message(&self, id: i64, message: &str) -> Result<bool, StorageError> {
        self.enter().await?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        let mut records = self.records.lock().unwrap();
        match records.iter_mut().find(|r| r.id == id) {
            Some(record) => {
                record.message = message.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: i64) -> Result<bool, StorageError> {
        self.enter().await?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|r| r.id != id);
        Ok(records.len() < before)
    }

    async fn ping(&self) -> Result<(), StorageError> {
        self.enter().await
    }
}

pub fn test_config() -> ServiceConfig {
    let mut config = ServiceConfig::default();
    config.auth.jwt_secret = SECRET.to_string();
    config.auth.username = USERNAME.to_string();
    config.auth.password = PASSWORD.to_string();
    config.database.url = "postgres://unused".to_string();
    config
}

/// A fully wired router over a `RecordingStore`.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<RecordingStore>,
    pub tokens: Arc<TokenService>,
    pub metrics: HttpMetrics,
}

pub fn app() -> TestApp {
    app_with_config(&test_config())
}

pub fn app_with_config(config: &ServiceConfig) -> TestApp {
    let store = Arc::new(RecordingStore::default());
    let tokens = Arc::new(TokenService::new(SECRET, config.auth.token_ttl()).unwrap());
    let metrics = HttpMetrics::new().unwrap();

    let state = AppState {
        store: store.clone(),
        tokens: tokens.clone(),
        credentials: Arc::new(StaticCredentials::new(USERNAME, PASSWORD)),
        metrics: metrics.clone(),
    };

    TestApp {
        router: build_router(state, config),
        store,
        tokens,
        metrics,
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

/// Send one request through the router.
///
/// `body` is sent as JSON when present; `token` becomes a bearer header.
pub async fn send(
    router: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<&str>,
) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    send_request(router, request).await
}

pub async fn send_request(router: &Router, request: Request<Body>) -> TestResponse {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };

    TestResponse {
        status,
        headers,
        body,
    }
}

/// Log in with the configured credentials and return the token.
pub async fn login_token(router: &Router) -> String {
    let body = format!(r#"{{"username":"{USERNAME}","password":"{PASSWORD}"}}"#);
    let res = send(router, Method::POST, "/login", None, Some(&body)).await;
    assert_eq!(res.status, StatusCode::OK, "login failed: {:?}", res.body);
    res.body["token"].as_str().unwrap().to_string()
}

/// Read a counter sample out of Prometheus exposition text.
///
/// Returns `None` when no series carries every given label pair.
pub fn sample_value(rendered: &str, name: &str, labels: &[(&str, &str)]) -> Option<f64> {
    rendered
        .lines()
        .filter(|line| line.starts_with(&format!("{name}{{")))
        .find(|line| {
            labels
                .iter()
                .all(|(k, v)| line.contains(&format!("{k}=\"{v}\"")))
        })
        .and_then(|line| line.rsplit(' ').next())
        .and_then(|value| value.parse().ok())
}
