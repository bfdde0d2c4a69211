//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the service registry (non-empty, unique names, http(s) URLs)
//! - Validate value ranges (timeouts > 0, body limit > 0)
//! - Detect a GraphQL path that collides with the landing page
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::fmt;

use url::Url;

use crate::config::schema::GatewayConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    NoServices,
    EmptyServiceName { index: usize },
    DuplicateServiceName(String),
    InvalidServiceUrl { name: String, reason: String },
    InvalidGraphqlPath(String),
    LandingPageConflict,
    ZeroValue(&'static str),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::NoServices => write!(f, "at least one service is required"),
            ValidationError::EmptyServiceName { index } => {
                write!(f, "service #{} has an empty name", index)
            }
            ValidationError::DuplicateServiceName(name) => {
                write!(f, "service name '{}' is declared more than once", name)
            }
            ValidationError::InvalidServiceUrl { name, reason } => {
                write!(f, "service '{}' has an invalid url: {}", name, reason)
            }
            ValidationError::InvalidGraphqlPath(path) => {
                write!(f, "graphql_path '{}' must start with '/'", path)
            }
            ValidationError::LandingPageConflict => {
                write!(f, "graphql_path '/' is reserved for the landing page")
            }
            ValidationError::ZeroValue(field) => write!(f, "{} must be greater than zero", field),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Check a loaded configuration, collecting every problem found.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.services.is_empty() {
        errors.push(ValidationError::NoServices);
    }

    let mut seen = HashSet::new();
    for (index, service) in config.services.iter().enumerate() {
        if service.name.trim().is_empty() {
            errors.push(ValidationError::EmptyServiceName { index });
        } else if !seen.insert(service.name.as_str()) {
            errors.push(ValidationError::DuplicateServiceName(service.name.clone()));
        }

        if let Err(reason) = check_service_url(&service.url) {
            errors.push(ValidationError::InvalidServiceUrl {
                name: service.name.clone(),
                reason,
            });
        }
    }

    let path = &config.server.graphql_path;
    if !path.starts_with('/') {
        errors.push(ValidationError::InvalidGraphqlPath(path.clone()));
    } else if path == "/" && config.server.landing_page {
        errors.push(ValidationError::LandingPageConflict);
    }

    if config.gateway.introspection_timeout_secs == 0 {
        errors.push(ValidationError::ZeroValue("gateway.introspection_timeout_secs"));
    }
    if config.gateway.request_timeout_secs == 0 {
        errors.push(ValidationError::ZeroValue("gateway.request_timeout_secs"));
    }
    if config.http.request_timeout_secs == 0 {
        errors.push(ValidationError::ZeroValue("http.request_timeout_secs"));
    }
    if config.http.body_limit_bytes == 0 {
        errors.push(ValidationError::ZeroValue("http.body_limit_bytes"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_service_url(raw: &str) -> Result<(), String> {
    let url = Url::parse(raw).map_err(|e| e.to_string())?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(format!("unsupported scheme '{}'", other)),
    }
}
