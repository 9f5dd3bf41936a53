//! In-flight request tracking.
//!
//! # Responsibilities
//! - Count requests currently inside the pipeline
//! - Hand out guards that release their slot on drop, panics included
//! - Tell the shutdown path how much work a missed drain deadline abandons

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Tracks active requests for graceful shutdown.
#[derive(Debug, Clone, Default)]
pub struct InFlightTracker {
    active_count: Arc<AtomicU64>,
}

impl InFlightTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new active request. Returns a guard that decrements on drop.
    pub fn track(&self) -> InFlightGuard {
        self.active_count.fetch_add(1, Ordering::SeqCst);
        InFlightGuard {
            active_count: Arc::clone(&self.active_count),
        }
    }

    /// Get current active request count.
    pub fn active_count(&self) -> u64 {
        self.active_count.load(Ordering::SeqCst)
    }
}

/// Guard that tracks a request's lifetime.
#[derive(Debug)]
pub struct InFlightGuard {
    active_count: Arc<AtomicU64>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.active_count.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Middleware holding an `InFlightGuard` for the whole request.
pub async fn track_in_flight(
    State(tracker): State<InFlightTracker>,
    req: Request,
    next: Next,
) -> Response {
    let _guard = tracker.track();
    next.run(req).await
}
