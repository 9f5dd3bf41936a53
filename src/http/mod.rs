//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection (lifecycle::manager)
//!     → server.rs (Axum router, middleware stack)
//!     → request.rs (request ID)
//!     → handlers.rs (login, health, metrics) / logs.rs (CRUD)
//!     → error.rs (ApiError → JSON error body)
//!     → Send to client
//! ```

pub mod error;
pub mod handlers;
pub mod logs;
pub mod request;
pub mod server;

pub use error::ApiError;
pub use request::{request_id, UuidRequestId, X_REQUEST_ID};
pub use server::{build_router, AppState};
