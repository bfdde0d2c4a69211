//! Top-level startup error.

use thiserror::Error;

use crate::config::ConfigError;
use crate::gateway::GatewayError;
use crate::registry::RegistryError;
use crate::server::ServerError;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid service list: {0}")]
    Registry(#[from] RegistryError),

    #[error("failed to construct gateway: {0}")]
    Gateway(#[source] GatewayError),

    #[error("GraphQL server failed to start: {0}")]
    Server(#[from] ServerError),

    #[error("failed to mount GraphQL routes: {0}")]
    Mount(#[source] std::io::Error),

    #[error("failed to listen on {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },
}

impl StartupError {
    /// Coarse failure category, logged alongside the error.
    pub fn category(&self) -> &'static str {
        match self {
            StartupError::Config(_) | StartupError::Registry(_) => "configuration",
            StartupError::Gateway(_) => "gateway",
            StartupError::Server(ServerError::Gateway(_)) => "upstream-schema",
            StartupError::Server(ServerError::Plugin(_)) => "plugin",
            StartupError::Server(ServerError::InvalidState { .. }) | StartupError::Mount(_) => {
                "server-state"
            }
            StartupError::Bind { .. } => "network-bind",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories() {
        let err = StartupError::Server(ServerError::Gateway(GatewayError::MissingSdl {
            service: "accounts".into(),
        }));
        assert_eq!(err.category(), "upstream-schema");
        assert!(err.to_string().contains("accounts"));

        let err = StartupError::Bind {
            address: "0.0.0.0:4000".into(),
            source: std::io::Error::from(std::io::ErrorKind::AddrInUse),
        };
        assert_eq!(err.category(), "network-bind");

        let err = StartupError::Mount(std::io::Error::other("HTTP app router lock poisoned"));
        assert_eq!(err.category(), "server-state");

        let err = StartupError::from(RegistryError::Empty);
        assert_eq!(err.category(), "configuration");
    }
}
