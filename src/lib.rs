//! Authenticated log monitoring service.
//!
//! Issues signed bearer tokens on `/login`, guards CRUD over stored log
//! records behind them, and exposes Prometheus metrics for every measured
//! route.

// Core subsystems
pub mod auth;
pub mod config;
pub mod http;
pub mod net;
pub mod storage;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;
pub mod security;

pub use config::ServiceConfig;
pub use http::{build_router, AppState};
pub use lifecycle::{start, DrainOutcome, RunningServer, Shutdown};
