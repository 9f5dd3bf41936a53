//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with all handlers
//! - Compose the request pipeline (headers, request ID, tracing, limits)
//! - Attach the auth gate and metrics wrapper to their route groups
//!
//! # Pipeline (outermost first)
//! ```text
//! security headers
//!   → request id (set) → trace span → request id (propagate)
//!   → body limit
//!   → router
//!       public:    metrics → timeout → handler            (/login, /health)
//!       protected: auth gate → metrics → timeout → handler (/logs, /logs/{id})
//!       bare:      handler                                 (/metrics)
//! ```
//!
//! The timeout sits inside the metrics wrapper so a 408 is still counted.

use axum::{
    body::Body,
    http::Request,
    middleware,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::auth::{require_bearer, CredentialVerifier, TokenService};
use crate::config::ServiceConfig;
use crate::http::request::{request_id, UuidRequestId, X_REQUEST_ID};
use crate::http::{handlers, logs};
use crate::observability::metrics::{track_metrics, HttpMetrics};
use crate::security;
use crate::storage::LogStore;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn LogStore>,
    pub tokens: Arc<TokenService>,
    pub credentials: Arc<dyn CredentialVerifier>,
    pub metrics: HttpMetrics,
}

/// Build the full application router.
#[allow(deprecated)]
pub fn build_router(state: AppState, config: &ServiceConfig) -> Router {
    let request_timeout = TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs));

    let protected = Router::new()
        .route("/logs", get(logs::list_logs).post(logs::create_log))
        .route(
            "/logs/{id}",
            put(logs::replace_log)
                .patch(logs::patch_log)
                .delete(logs::delete_log),
        )
        .route_layer(request_timeout.clone())
        .route_layer(middleware::from_fn_with_state(
            state.metrics.clone(),
            track_metrics,
        ))
        .route_layer(middleware::from_fn_with_state(
            state.tokens.clone(),
            require_bearer,
        ));

    let public = Router::new()
        .route("/login", post(handlers::login))
        .route("/health", get(handlers::health))
        .route_layer(request_timeout)
        .route_layer(middleware::from_fn_with_state(
            state.metrics.clone(),
            track_metrics,
        ));

    let router = Router::new()
        .route("/metrics", get(handlers::render_metrics))
        .merge(public)
        .merge(protected)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(X_REQUEST_ID, UuidRequestId))
                .layer(TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
                    tracing::info_span!(
                        "http_request",
                        method = %req.method(),
                        uri = %req.uri(),
                        request_id = %request_id(req.headers()),
                    )
                }))
                .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
                .layer(RequestBodyLimitLayer::new(config.security.max_body_size)),
        );

    security::headers::apply(router, &config.security)
}
