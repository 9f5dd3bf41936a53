//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Bind address
//!     → listener.rs (parse, bind, fatal on failure)
//!     → axum::serve (one task per connection)
//!     → in_flight.rs (per-request guard, counted for drain reporting)
//!     → Hand off to HTTP layer
//! ```

pub mod in_flight;
pub mod listener;

pub use in_flight::{track_in_flight, InFlightGuard, InFlightTracker};
pub use listener::{bind, ListenerError};
