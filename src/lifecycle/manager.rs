//! Server lifecycle manager.
//!
//! # Responsibilities
//! - Bind the listener and serve the router on a background task
//! - Count in-flight requests for drain reporting
//! - Stop accepting on shutdown, then wait a bounded time for in-flight work
//!
//! # Phases
//! ```text
//! start() → Listening → shutdown() → Draining → Stopped
//! ```
//! A bind failure never reaches `Listening`; `start` returns the error.

use axum::{middleware, Router};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::lifecycle::shutdown::Shutdown;
use crate::net::{self, track_in_flight, InFlightTracker, ListenerError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecyclePhase {
    Listening,
    Draining,
    Stopped,
}

/// How the drain window ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrainOutcome {
    /// Every in-flight request finished before the deadline.
    Drained,
    /// The deadline passed; `abandoned` requests were still running.
    TimedOut { abandoned: u64 },
    /// The serve task ended with an I/O error or panic before draining.
    Failed,
}

/// Handle to a server started by [`start`].
pub struct RunningServer {
    local_addr: SocketAddr,
    shutdown: Shutdown,
    in_flight: InFlightTracker,
    phase: watch::Sender<LifecyclePhase>,
    task: JoinHandle<std::io::Result<()>>,
}

/// Bind `bind_address` and start serving `app` without blocking the caller.
pub async fn start(bind_address: &str, app: Router) -> Result<RunningServer, ListenerError> {
    let listener = net::bind(bind_address).await?;
    serve(listener, app)
}

/// Serve `app` on an already bound listener.
pub fn serve(listener: TcpListener, app: Router) -> Result<RunningServer, ListenerError> {
    let local_addr = listener.local_addr().map_err(ListenerError::Bind)?;
    let in_flight = InFlightTracker::new();
    let shutdown = Shutdown::new();

    let app = app.layer(middleware::from_fn_with_state(in_flight.clone(), track_in_flight));

    let signal = shutdown.clone();
    let task = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move { signal.wait().await })
            .await
    });

    let (phase, _) = watch::channel(LifecyclePhase::Listening);
    tracing::info!(address = %local_addr, "Server listening");

    Ok(RunningServer {
        local_addr,
        shutdown,
        in_flight,
        phase,
        task,
    })
}

impl RunningServer {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn phase(&self) -> LifecyclePhase {
        *self.phase.borrow()
    }

    /// Observe phase transitions, including `Stopped` after `shutdown` consumes the handle.
    pub fn watch_phase(&self) -> watch::Receiver<LifecyclePhase> {
        self.phase.subscribe()
    }

    /// Requests currently inside the pipeline.
    pub fn in_flight(&self) -> u64 {
        self.in_flight.active_count()
    }

    /// Shutdown signal shared with background tasks tied to this server.
    pub fn shutdown_signal(&self) -> Shutdown {
        self.shutdown.clone()
    }

    /// Stop accepting, wait up to `timeout` for in-flight requests, then stop.
    pub async fn shutdown(mut self, timeout: Duration) -> DrainOutcome {
        self.phase.send_replace(LifecyclePhase::Draining);
        tracing::info!(
            in_flight = self.in_flight.active_count(),
            timeout_ms = timeout.as_millis() as u64,
            "Draining in-flight requests"
        );
        self.shutdown.trigger();

        let outcome = match tokio::time::timeout(timeout, &mut self.task).await {
            Ok(Ok(Ok(()))) => {
                tracing::info!("All in-flight requests drained");
                DrainOutcome::Drained
            }
            Ok(Ok(Err(e))) => {
                tracing::error!(error = %e, "Server exited with error");
                DrainOutcome::Failed
            }
            Ok(Err(e)) => {
                tracing::error!(error = %e, "Server task panicked");
                DrainOutcome::Failed
            }
            Err(_) => {
                let abandoned = self.in_flight.active_count();
                self.task.abort();
                tracing::warn!(
                    abandoned,
                    timeout_ms = timeout.as_millis() as u64,
                    "Drain deadline elapsed, abandoning in-flight requests"
                );
                DrainOutcome::TimedOut { abandoned }
            }
        };

        self.phase.send_replace(LifecyclePhase::Stopped);
        outcome
    }
}

impl std::fmt::Debug for RunningServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunningServer")
            .field("local_addr", &self.local_addr)
            .field("phase", &self.phase())
            .field("in_flight", &self.in_flight())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::get;

    fn app() -> Router {
        Router::new().route("/", get(|| async { "ok" }))
    }

    #[tokio::test]
    async fn idle_server_drains_immediately() {
        let server = start("127.0.0.1:0", app()).await.unwrap();
        assert_eq!(server.phase(), LifecyclePhase::Listening);
        assert_ne!(server.local_addr().port(), 0);

        let mut phase = server.watch_phase();
        let outcome = server.shutdown(Duration::from_secs(5)).await;

        assert_eq!(outcome, DrainOutcome::Drained);
        assert_eq!(*phase.borrow_and_update(), LifecyclePhase::Stopped);
    }

    #[tokio::test]
    async fn shutdown_fires_shared_signal() {
        let server = start("127.0.0.1:0", app()).await.unwrap();
        let signal = server.shutdown_signal();
        assert!(!signal.is_triggered());

        server.shutdown(Duration::from_secs(1)).await;
        assert!(signal.is_triggered());
    }

    #[tokio::test]
    async fn bind_conflict_is_reported() {
        let first = start("127.0.0.1:0", app()).await.unwrap();
        let taken = first.local_addr().to_string();

        let second = start(&taken, app()).await;
        assert!(matches!(second, Err(ListenerError::Bind(_))));

        first.shutdown(Duration::from_secs(1)).await;
    }
}
