//! Configuration loading from disk and the process environment.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::ServiceConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid PORT `{0}`")]
    InvalidPort(String),

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration: optional TOML file, then environment overrides, then validation.
pub fn load_config(path: Option<&Path>) -> Result<ServiceConfig, ConfigError> {
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => ServiceConfig::default(),
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Overlay environment variables onto a loaded configuration.
///
/// `PORT` rewrites only the port of the bind address; `BIND_ADDRESS` replaces it
/// wholesale and is applied first.
pub fn apply_env_overrides<F>(config: &mut ServiceConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |key: &str| lookup(key).filter(|v| !v.is_empty());

    if let Some(addr) = non_empty("BIND_ADDRESS") {
        config.listener.bind_address = addr;
    }
    if let Some(port) = non_empty("PORT") {
        let port: u16 = port.parse().map_err(|_| ConfigError::InvalidPort(port.clone()))?;
        let host = config
            .listener
            .bind_address
            .rsplit_once(':')
            .map(|(host, _)| host.to_string())
            .unwrap_or_else(|| "0.0.0.0".to_string());
        config.listener.bind_address = format!("{}:{}", host, port);
    }
    if let Some(url) = non_empty("DATABASE_URL") {
        config.database.url = url;
    }
    if let Some(secret) = non_empty("JWT_SECRET") {
        config.auth.jwt_secret = secret;
    }
    if let Some(level) = non_empty("LOG_LEVEL") {
        config.observability.log_level = level;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn env_overrides_secret_database_and_port() {
        let mut config = ServiceConfig::default();
        apply_env_overrides(
            &mut config,
            env(&[
                ("JWT_SECRET", "abc"),
                ("DATABASE_URL", "postgres://db/logs"),
                ("PORT", "9000"),
            ]),
        )
        .unwrap();

        assert_eq!(config.auth.jwt_secret, "abc");
        assert_eq!(config.database.url, "postgres://db/logs");
        assert_eq!(config.listener.bind_address, "0.0.0.0:9000");
    }

    #[test]
    fn empty_variables_are_ignored() {
        let mut config = ServiceConfig::default();
        apply_env_overrides(&mut config, env(&[("JWT_SECRET", ""), ("PORT", "")])).unwrap();

        assert!(config.auth.jwt_secret.is_empty());
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
    }

    #[test]
    fn rejects_non_numeric_port() {
        let mut config = ServiceConfig::default();
        let err = apply_env_overrides(&mut config, env(&[("PORT", "http")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPort(p) if p == "http"));
    }

    #[test]
    fn port_applies_on_top_of_bind_address() {
        let mut config = ServiceConfig::default();
        apply_env_overrides(
            &mut config,
            env(&[("BIND_ADDRESS", "127.0.0.1:1234"), ("PORT", "4321")]),
        )
        .unwrap();
        assert_eq!(config.listener.bind_address, "127.0.0.1:4321");
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_config(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
