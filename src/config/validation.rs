//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Reject configurations the service cannot start with (no signing secret,
//!   no database, unparseable bind address)
//! - Validate value ranges (timeouts > 0, pool size > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServiceConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::ServiceConfig;

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("auth.jwt_secret is empty (set JWT_SECRET)")]
    MissingSigningSecret,

    #[error("database.url is empty (set DATABASE_URL)")]
    MissingDatabaseUrl,

    #[error("listener.bind_address `{0}` is not a socket address")]
    InvalidBindAddress(String),

    #[error("{field} must be greater than zero")]
    NotPositive { field: &'static str },

    #[error("auth.username must not be empty")]
    EmptyUsername,
}

/// Validate a configuration, collecting every failure.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.auth.jwt_secret.is_empty() {
        errors.push(ValidationError::MissingSigningSecret);
    }
    if config.auth.username.is_empty() {
        errors.push(ValidationError::EmptyUsername);
    }
    if config.auth.token_ttl_secs == 0 {
        errors.push(ValidationError::NotPositive { field: "auth.token_ttl_secs" });
    }

    if config.database.url.trim().is_empty() {
        errors.push(ValidationError::MissingDatabaseUrl);
    }
    if config.database.max_connections == 0 {
        errors.push(ValidationError::NotPositive { field: "database.max_connections" });
    }
    if config.database.max_lifetime_secs == 0 {
        errors.push(ValidationError::NotPositive { field: "database.max_lifetime_secs" });
    }

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.shutdown.drain_timeout_secs == 0 {
        errors.push(ValidationError::NotPositive { field: "shutdown.drain_timeout_secs" });
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::NotPositive { field: "timeouts.request_secs" });
    }
    if config.security.max_body_size == 0 {
        errors.push(ValidationError::NotPositive { field: "security.max_body_size" });
    }
    if config.observability.metrics_upkeep_secs == 0 {
        errors.push(ValidationError::NotPositive { field: "observability.metrics_upkeep_secs" });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
