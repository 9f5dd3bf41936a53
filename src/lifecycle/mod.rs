//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Token service → Database → Metrics → Router → Listener
//!
//! Serving (manager.rs):
//!     Listening → accept on a background task, count in-flight requests
//!
//! Shutdown (shutdown.rs, signals.rs):
//!     SIGTERM/SIGINT → Stop accepting → Drain (bounded) → Close pool → Exit
//! ```
//!
//! # Design Decisions
//! - Bind failures are fatal and surface from `start`
//! - Shutdown has a deadline: requests still running after it are abandoned

pub mod manager;
pub mod shutdown;
pub mod signals;
pub mod startup;

pub use manager::{start, DrainOutcome, LifecyclePhase, RunningServer};
pub use shutdown::Shutdown;
pub use signals::{wait_for_termination, TerminationSignal};
pub use startup::{run, StartupError};
