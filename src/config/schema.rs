//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::registry::ServiceDescriptor;

/// Port used when neither the config file nor `PORT` provides one.
pub const DEFAULT_PORT: u16 = 4000;

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (host, port).
    pub listener: ListenerConfig,

    /// Upstream sub-graph services, in composition order.
    pub services: Vec<ServiceDescriptor>,

    /// GraphQL server settings.
    pub server: ServerConfig,

    /// Outbound gateway settings.
    pub gateway: GatewayClientConfig,

    /// Inbound HTTP settings.
    pub http: HttpConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            listener: ListenerConfig::default(),
            services: default_services(),
            server: ServerConfig::default(),
            gateway: GatewayClientConfig::default(),
            http: HttpConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

/// The built-in service registry.
fn default_services() -> Vec<ServiceDescriptor> {
    vec![
        ServiceDescriptor::new(
            "accounts",
            "https://accounts-staging.herokuapp.com/graphql",
        ),
        // ServiceDescriptor::new("social-login", "https://social-login-staging.herokuapp.com/graphql"),
    ]
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Interface to bind (e.g., "0.0.0.0").
    pub host: String,

    /// TCP port. Overridden by the `PORT` environment variable.
    pub port: u16,
}

impl ListenerConfig {
    /// The `host:port` pair handed to the socket bind.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
        }
    }
}

/// GraphQL server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Path the GraphQL endpoint is served on.
    pub graphql_path: String,

    /// Serve the interactive landing page at `/`.
    pub landing_page: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            graphql_path: "/graphql".to_string(),
            landing_page: true,
        }
    }
}

/// Settings for the gateway's outbound client.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GatewayClientConfig {
    /// Timeout for each sub-graph schema fetch, in seconds.
    pub introspection_timeout_secs: u64,

    /// Timeout for each forwarded operation, in seconds.
    pub request_timeout_secs: u64,

    /// Honor `HTTP_PROXY`/`HTTPS_PROXY` for sub-graph traffic.
    pub use_system_proxy: bool,
}

impl Default for GatewayClientConfig {
    fn default() -> Self {
        Self {
            introspection_timeout_secs: 30,
            request_timeout_secs: 30,
            use_system_proxy: true,
        }
    }
}

/// Inbound HTTP configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Total time allowed per inbound request, in seconds.
    pub request_timeout_secs: u64,

    /// Maximum accepted request body size.
    pub body_limit_bytes: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 60,
            body_limit_bytes: 2 * 1024 * 1024,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Output format for log lines.
    pub log_format: LogFormat,

    /// Filter used when `RUST_LOG` is not set.
    pub log_filter: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_format: LogFormat::Pretty,
            log_filter: "supergraph_gateway=info,tower_http=info".to_string(),
        }
    }
}
