//! Federated GraphQL gateway bootstrap.
//!
//! ```text
//!   ServiceList ──▶ Gateway ──▶ GraphQLServer ──▶ HttpApp ──▶ :PORT
//!                     │          (drain +           │
//!                     │           landing page)     │
//!                     ▼                             ▼
//!               sub-graph services             /graphql, /
//! ```

pub mod config;
pub mod error;
pub mod gateway;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod registry;
pub mod server;

pub use config::GatewayConfig;
pub use error::StartupError;
pub use lifecycle::{Orchestrator, RunningGateway, Shutdown};
pub use registry::{ServiceDescriptor, ServiceList};
