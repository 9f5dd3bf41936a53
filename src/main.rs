//! Log Monitor Service
//!
//! Token-authenticated CRUD over log records, backed by PostgreSQL.
//!
//! # Architecture Overview
//!
//! ```text
//!                       ┌──────────────────────────────────────────────────┐
//!                       │                  LOG MONITOR                     │
//!                       │                                                  │
//!     Client Request    │  ┌─────────┐   ┌───────────┐   ┌────────────┐    │
//!     ──────────────────┼─▶│   net   │──▶│ security  │──▶│   http     │    │
//!                       │  │listener │   │ headers   │   │  router    │    │
//!                       │  └─────────┘   └───────────┘   └─────┬──────┘    │
//!                       │                                      │           │
//!                       │                  ┌───────────────────┼────────┐  │
//!                       │                  ▼                   ▼        ▼  │
//!                       │           ┌────────────┐     ┌──────────┐ ┌─────┐│
//!                       │           │ auth gate  │────▶│ metrics  │ │login││
//!                       │           │  (bearer)  │     │ wrapper  │ │     ││
//!                       │           └────────────┘     └────┬─────┘ └─────┘│
//!                       │                                   ▼              │
//!     Client Response   │                            ┌────────────┐        │
//!     ◀─────────────────┼────────────────────────────│  storage   │◀───────┼── PostgreSQL
//!                       │                            │ (log CRUD) │        │
//!                       │                            └────────────┘        │
//!                       │                                                  │
//!                       │  config · observability · lifecycle (drain 5s)   │
//!                       └──────────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;

use log_monitor::config::{load_config, ObservabilityConfig};
use log_monitor::lifecycle::{self, DrainOutcome};
use log_monitor::observability::init_logging;

#[derive(Parser)]
#[command(name = "log-monitor")]
#[command(about = "Authenticated log monitoring service", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long, env = "LOGMON_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env file is fine; the process environment still applies.
    let dotenv_loaded = dotenv::dotenv().is_ok();
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            init_logging(&ObservabilityConfig::default());
            tracing::error!(error = %e, "Configuration rejected");
            return Err(e.into());
        }
    };

    init_logging(&config.observability);
    tracing::info!("log-monitor v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        dotenv_loaded,
        token_ttl_secs = config.auth.token_ttl_secs,
        drain_timeout_secs = config.shutdown.drain_timeout_secs,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    match lifecycle::run(config).await {
        Ok(DrainOutcome::Drained) => Ok(()),
        Ok(DrainOutcome::TimedOut { abandoned }) => {
            tracing::warn!(abandoned, "Exited with requests still in flight");
            Ok(())
        }
        Ok(DrainOutcome::Failed) => Err("server task failed during shutdown".into()),
        Err(e) => {
            tracing::error!(error = %e, "Service failed");
            Err(e.into())
        }
    }
}
