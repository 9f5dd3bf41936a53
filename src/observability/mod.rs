//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (request counters and latency histograms)
//!
//! Consumers:
//!     → stdout (pretty or JSON lines)
//!     → GET /metrics (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through log fields and response headers
//! - Metric updates are cheap (atomic operations inside the recorder)

pub mod logging;
pub mod metrics;

pub use logging::init_logging;
pub use metrics::{track_metrics, HttpMetrics};
