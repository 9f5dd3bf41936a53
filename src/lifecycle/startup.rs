//! Ordered startup and shutdown of the whole service.
//!
//! ```text
//! token service → database pool → ping → metrics recorder → router
//!     → listener → metrics upkeep → wait for SIGINT/SIGTERM
//!     → drain, then close pool (one shared deadline)
//! ```

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::auth::{StaticCredentials, TokenError, TokenService};
use crate::config::ServiceConfig;
use crate::http::{build_router, AppState};
use crate::lifecycle::manager::{self, DrainOutcome, RunningServer};
use crate::lifecycle::shutdown::Shutdown;
use crate::lifecycle::signals::wait_for_termination;
use crate::net::ListenerError;
use crate::observability::HttpMetrics;
use crate::storage::{postgres, LogStore, PgLogStore, StorageError};

/// Failures that stop the service before or while it runs.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("token service: {0}")]
    Token(#[from] TokenError),

    #[error("database: {0}")]
    Database(#[from] StorageError),

    #[error("metrics recorder: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    #[error("listener: {0}")]
    Listener(#[from] ListenerError),

    #[error("failed to install signal handler: {0}")]
    Signal(std::io::Error),
}

/// Run the service until a termination signal, then drain and stop.
pub async fn run(config: ServiceConfig) -> Result<DrainOutcome, StartupError> {
    let tokens = Arc::new(TokenService::new(
        &config.auth.jwt_secret,
        config.auth.token_ttl(),
    )?);

    let pool = postgres::connect(&config.database).await?;
    let store = PgLogStore::new(pool.clone());
    store.ping().await?;
    let metrics = HttpMetrics::new()?;

    let state = AppState {
        store: Arc::new(store),
        tokens,
        credentials: Arc::new(StaticCredentials::new(
            config.auth.username.clone(),
            config.auth.password.clone(),
        )),
        metrics: metrics.clone(),
    };
    let app = build_router(state, &config);

    let server = manager::start(&config.listener.bind_address, app).await?;
    let upkeep = spawn_metrics_upkeep(
        metrics,
        Duration::from_secs(config.observability.metrics_upkeep_secs),
        server.shutdown_signal(),
    );

    let signal = wait_for_termination().await.map_err(StartupError::Signal)?;
    tracing::info!(%signal, "Termination signal received");

    let outcome = drain_and_close(server, config.shutdown.drain_timeout(), pool.close()).await;
    if let Err(e) = upkeep.await {
        tracing::warn!(error = %e, "Metrics upkeep task failed");
    }

    tracing::info!(?outcome, "Shutdown complete");
    Ok(outcome)
}

/// Drain the server, then run `close` within whatever is left of the same deadline.
///
/// A pool close waits for checked-out connections, and a request abandoned
/// mid-query never returns its connection, so the close is bounded too.
async fn drain_and_close<F>(server: RunningServer, budget: Duration, close: F) -> DrainOutcome
where
    F: Future<Output = ()>,
{
    let deadline = Instant::now() + budget;
    let outcome = server.shutdown(budget).await;

    if tokio::time::timeout_at(deadline, close).await.is_err() {
        tracing::warn!("Database pool still busy at the drain deadline, not waiting for it");
    }
    outcome
}

/// Periodically drain histogram buffers until shutdown.
fn spawn_metrics_upkeep(
    metrics: HttpMetrics,
    every: Duration,
    shutdown: Shutdown,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        loop {
            tokio::select! {
                _ = ticker.tick() => metrics.run_upkeep(),
                _ = shutdown.wait() => break,
            }
        }
        tracing::debug!("Metrics upkeep stopped");
    })
}
