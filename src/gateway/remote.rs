//! Gateway backed by remote sub-graph services.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;

use crate::config::GatewayClientConfig;
use crate::gateway::introspect::{fetch_service_sdl, SubgraphSchema};
use crate::gateway::types::{GraphQLRequest, GraphQLResponse};
use crate::gateway::{Gateway, GatewayError};
use crate::registry::ServiceList;

/// Timeouts for the outbound client.
#[derive(Debug, Clone)]
pub struct GatewayOptions {
    pub introspection_timeout: Duration,
    pub request_timeout: Duration,
    pub use_system_proxy: bool,
}

impl Default for GatewayOptions {
    fn default() -> Self {
        Self::from(&GatewayClientConfig::default())
    }
}

impl From<&GatewayClientConfig> for GatewayOptions {
    fn from(config: &GatewayClientConfig) -> Self {
        Self {
            introspection_timeout: Duration::from_secs(config.introspection_timeout_secs),
            request_timeout: Duration::from_secs(config.request_timeout_secs),
            use_system_proxy: config.use_system_proxy,
        }
    }
}

/// Introspects every service on load and forwards operations to the primary one.
pub struct RemoteGateway {
    services: ServiceList,
    options: GatewayOptions,
    client: reqwest::Client,
    schemas: RwLock<Option<Vec<SubgraphSchema>>>,
    stopped: AtomicBool,
}

impl RemoteGateway {
    pub fn new(services: ServiceList, options: GatewayOptions) -> Result<Self, GatewayError> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("supergraph-gateway/", env!("CARGO_PKG_VERSION")));
        if !options.use_system_proxy {
            builder = builder.no_proxy();
        }
        let client = builder.build().map_err(GatewayError::Client)?;

        Ok(Self {
            services,
            options,
            client,
            schemas: RwLock::new(None),
            stopped: AtomicBool::new(false),
        })
    }

    /// Schemas fetched by the last successful `load`, in service order.
    pub fn schemas(&self) -> Option<Vec<SubgraphSchema>> {
        self.schemas.read().ok().and_then(|guard| guard.clone())
    }

    fn is_loaded(&self) -> bool {
        self.schemas
            .read()
            .map(|guard| guard.is_some())
            .unwrap_or(false)
    }
}

#[async_trait]
impl Gateway for RemoteGateway {
    async fn load(&self) -> Result<(), GatewayError> {
        if self.stopped.load(Ordering::Acquire) {
            return Err(GatewayError::Stopped);
        }
        if self.is_loaded() {
            return Ok(());
        }

        let mut schemas = Vec::with_capacity(self.services.len());
        for service in &self.services {
            let schema =
                fetch_service_sdl(&self.client, service, self.options.introspection_timeout).await?;
            schemas.push(schema);
        }

        tracing::info!(
            services = schemas.len(),
            primary = %self.services.primary().name,
            "Gateway loaded sub-graph schemas"
        );
        if self.services.len() > 1 {
            tracing::warn!(
                primary = %self.services.primary().name,
                "Multiple services configured; operations are forwarded to the primary service only"
            );
        }

        if let Ok(mut guard) = self.schemas.write() {
            *guard = Some(schemas);
        }
        Ok(())
    }

    async fn execute(&self, request: GraphQLRequest) -> Result<GraphQLResponse, GatewayError> {
        if self.stopped.load(Ordering::Acquire) {
            return Err(GatewayError::Stopped);
        }
        if !self.is_loaded() {
            return Err(GatewayError::NotLoaded);
        }

        let service = self.services.primary();
        let upstream_error = |source| GatewayError::Upstream {
            service: service.name.clone(),
            source,
        };

        tracing::debug!(
            service = %service.name,
            operation = request.operation_name.as_deref().unwrap_or("<anonymous>"),
            "Forwarding operation"
        );

        // Sub-graphs report GraphQL errors in the body, often with a non-2xx
        // status. Only an undecodable body is treated as a transport failure.
        self.client
            .post(&service.url)
            .timeout(self.options.request_timeout)
            .json(&request)
            .send()
            .await
            .map_err(upstream_error)?
            .json::<GraphQLResponse>()
            .await
            .map_err(upstream_error)
    }

    async fn stop(&self) -> Result<(), GatewayError> {
        if !self.stopped.swap(true, Ordering::AcqRel) {
            tracing::info!("Gateway stopped");
        }
        Ok(())
    }

    fn service_list(&self) -> &ServiceList {
        &self.services
    }
}
