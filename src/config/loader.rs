//! Configuration loading from disk and the process environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::{GatewayConfig, DEFAULT_PORT};
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable holding the listener port.
pub const PORT_ENV: &str = "PORT";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid {var} value {value:?}: expected a TCP port")]
    InvalidPort { var: &'static str, value: String },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration: optional TOML file, then process environment, then validation.
pub fn load_config(path: Option<&Path>) -> Result<GatewayConfig, ConfigError> {
    let config = match path {
        Some(path) => parse_config(&fs::read_to_string(path)?)?,
        None => GatewayConfig::default(),
    };

    let config = apply_env_overrides(config, |key| std::env::var(key).ok())?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Parse a TOML document into a configuration. Missing fields take defaults.
pub fn parse_config(content: &str) -> Result<GatewayConfig, ConfigError> {
    Ok(toml::from_str(content)?)
}

/// Overlay environment variables, read through `lookup`, onto `config`.
pub fn apply_env_overrides<F>(mut config: GatewayConfig, lookup: F) -> Result<GatewayConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    config.listener.port = resolve_port(lookup(PORT_ENV).as_deref(), config.listener.port)?;
    Ok(config)
}

/// Resolve the listener port from the raw `PORT` value.
///
/// Unset or empty values fall back to `fallback`.
pub fn resolve_port(raw: Option<&str>, fallback: u16) -> Result<u16, ConfigError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(fallback),
        Some(value) => value.parse().map_err(|_| ConfigError::InvalidPort {
            var: PORT_ENV,
            value: value.to_string(),
        }),
    }
}

/// Port resolution with the built-in default.
pub fn port_from_env(raw: Option<&str>) -> Result<u16, ConfigError> {
    resolve_port(raw, DEFAULT_PORT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_defaults_when_unset() {
        assert_eq!(port_from_env(None).unwrap(), 4000);
        assert_eq!(port_from_env(Some("")).unwrap(), 4000);
    }

    #[test]
    fn test_port_from_env() {
        assert_eq!(port_from_env(Some("5123")).unwrap(), 5123);
        assert_eq!(port_from_env(Some(" 8080 ")).unwrap(), 8080);
    }

    #[test]
    fn test_invalid_port_rejected() {
        let err = port_from_env(Some("http")).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPort { .. }));

        assert!(port_from_env(Some("70000")).is_err());
    }

    #[test]
    fn test_env_overrides_file_port() {
        let config = parse_config("[listener]\nport = 9000\n").unwrap();

        let unchanged = apply_env_overrides(config.clone(), |_| None).unwrap();
        assert_eq!(unchanged.listener.port, 9000);

        let overridden = apply_env_overrides(config, |key| {
            (key == "PORT").then(|| "5123".to_string())
        })
        .unwrap();
        assert_eq!(overridden.listener.port, 5123);
    }

    #[test]
    fn test_parse_services_keeps_order() {
        let config = parse_config(
            r#"
            [[services]]
            name = "accounts"
            url = "http://localhost:4001/graphql"

            [[services]]
            name = "reviews"
            url = "http://localhost:4002/graphql"
            "#,
        )
        .unwrap();

        let names: Vec<_> = config.services.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["accounts", "reviews"]);
        assert_eq!(config.listener.port, 4000);
        assert_eq!(config.server.graphql_path, "/graphql");
    }

    #[test]
    fn test_default_config_has_one_service() {
        let config = parse_config("").unwrap();
        assert_eq!(config.services.len(), 1);
    }
}
