//! Federation gateway subsystem.
//!
//! # Data Flow
//! ```text
//! ServiceList
//!     → remote.rs (RemoteGateway::new builds the outbound client)
//!     → introspect.rs (fetch `_service { sdl }` from every sub-graph)
//!     → SubgraphSchema list (kept in service order)
//!
//! Client operation
//!     → Gateway::execute
//!     → primary sub-graph
//!     → GraphQLResponse relayed to the client
//! ```
//!
//! # Design Decisions
//! - `Gateway` is a trait so a composing engine can replace `RemoteGateway`
//! - Schema fetch happens in `load`, never in the constructor
//! - Operations are forwarded verbatim; no query planning happens here

pub mod introspect;
pub mod remote;
pub mod types;

use async_trait::async_trait;
use thiserror::Error;

use crate::registry::ServiceList;

pub use introspect::SubgraphSchema;
pub use remote::{GatewayOptions, RemoteGateway};
pub use types::{GraphQLError, GraphQLRequest, GraphQLResponse, OperationKind};

/// Errors raised by a gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("could not fetch schema from service '{service}' ({url}): {source}")]
    SchemaFetch {
        service: String,
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("service '{service}' rejected the schema query: {message}")]
    Introspection { service: String, message: String },

    #[error("service '{service}' did not return an SDL document")]
    MissingSdl { service: String },

    #[error("request to service '{service}' failed: {source}")]
    Upstream {
        service: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("gateway has not loaded its schema yet")]
    NotLoaded,

    #[error("gateway is stopped")]
    Stopped,
}

impl GatewayError {
    /// Value reported in `extensions.code` when the error reaches a client.
    pub fn code(&self) -> &'static str {
        match self {
            GatewayError::Upstream { .. } => "SUBGRAPH_REQUEST_FAILED",
            GatewayError::NotLoaded | GatewayError::Stopped => "GATEWAY_UNAVAILABLE",
            _ => "INTERNAL_SERVER_ERROR",
        }
    }
}

/// The federation engine the GraphQL server delegates execution to.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Fetch whatever the gateway needs from its services before serving.
    async fn load(&self) -> Result<(), GatewayError>;

    /// Execute one client operation.
    async fn execute(&self, request: GraphQLRequest) -> Result<GraphQLResponse, GatewayError>;

    /// Release resources. Further `execute` calls fail.
    async fn stop(&self) -> Result<(), GatewayError> {
        Ok(())
    }

    /// The services this gateway was constructed with.
    fn service_list(&self) -> &ServiceList;
}
