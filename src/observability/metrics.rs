//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Own the Prometheus recorder for the process
//! - Wrap handlers with a count + latency observation
//! - Render the text exposition format for `/metrics`
//!
//! # Metrics
//! - `http_requests_total` (counter): requests by method, endpoint, status
//! - `http_request_duration_seconds` (histogram): latency by method, endpoint
//!
//! # Design Decisions
//! - No global recorder: `HttpMetrics` is built at startup and passed in
//! - `endpoint` is the matched route template, so `/logs/7` and `/logs/8`
//!   aggregate under `/logs/{id}`
//! - Default Prometheus histogram buckets

use axum::{
    extract::{MatchedPath, Request, State},
    middleware::Next,
    response::Response,
};
use metrics_exporter_prometheus::{
    BuildError, PrometheusBuilder, PrometheusHandle, PrometheusRecorder,
};
use std::sync::Arc;
use std::time::{Duration, Instant};

pub const REQUESTS_TOTAL: &str = "http_requests_total";
pub const REQUEST_DURATION_SECONDS: &str = "http_request_duration_seconds";

/// Endpoint label used when a request matched no route template.
pub const UNMATCHED_ENDPOINT: &str = "unmatched";

const DEFAULT_BUCKETS: [f64; 11] = [0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0];

/// Process-wide HTTP metrics registry.
#[derive(Clone)]
pub struct HttpMetrics {
    recorder: Arc<PrometheusRecorder>,
    handle: PrometheusHandle,
}

impl HttpMetrics {
    pub fn new() -> Result<Self, BuildError> {
        let recorder = PrometheusBuilder::new()
            .set_buckets(&DEFAULT_BUCKETS)?
            .build_recorder();
        let handle = recorder.handle();

        metrics::with_local_recorder(&recorder, || {
            metrics::describe_counter!(REQUESTS_TOTAL, "Total number of HTTP requests");
            metrics::describe_histogram!(
                REQUEST_DURATION_SECONDS,
                metrics::Unit::Seconds,
                "Duration of HTTP requests"
            );
        });

        Ok(Self {
            recorder: Arc::new(recorder),
            handle,
        })
    }

    /// Record one finished request.
    pub fn record(&self, method: &str, endpoint: &str, status: u16, elapsed: Duration) {
        metrics::with_local_recorder(self.recorder.as_ref(), || {
            metrics::counter!(
                REQUESTS_TOTAL,
                "method" => method.to_string(),
                "endpoint" => endpoint.to_string(),
                "status" => status.to_string()
            )
            .increment(1);
            metrics::histogram!(
                REQUEST_DURATION_SECONDS,
                "method" => method.to_string(),
                "endpoint" => endpoint.to_string()
            )
            .record(elapsed.as_secs_f64());
        });
    }

    /// Prometheus text exposition of everything recorded so far.
    pub fn render(&self) -> String {
        self.handle.render()
    }

    /// Drain histogram buffers; call periodically.
    pub fn run_upkeep(&self) {
        self.handle.run_upkeep();
    }
}

impl std::fmt::Debug for HttpMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpMetrics").finish_non_exhaustive()
    }
}

/// Middleware observing count and latency of the wrapped handler.
///
/// Must be installed with `route_layer` so `MatchedPath` is present.
pub async fn track_metrics(
    State(metrics): State<HttpMetrics>,
    req: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let endpoint = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| UNMATCHED_ENDPOINT.to_owned());

    let response = next.run(req).await;

    metrics.record(
        method.as_str(),
        &endpoint,
        response.status().as_u16(),
        start.elapsed(),
    );
    response
}
