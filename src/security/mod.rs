//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Every response:
//!     → headers.rs (nosniff, frame deny, XSS protection)
//!
//! Protected requests:
//!     → auth::gate (bearer token), see the auth module
//! ```
//!
//! # Design Decisions
//! - Fail closed: reject on any security check failure
//! - No trust in client input

pub mod headers;
