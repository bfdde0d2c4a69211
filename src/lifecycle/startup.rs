//! Startup orchestration.
//!
//! # Responsibilities
//! - Build the service list from configuration
//! - Construct the gateway, the HTTP app and the GraphQL server
//! - Start the server (schema fetch), mount it, then bind the listener
//! - Log the terminal outcome: ready URL or the error
//!
//! # Design Decisions
//! - Steps run in order, each awaited; no retries
//! - The listener binds last, so a failed schema fetch never opens a socket
//! - No rollback on partial start

use std::net::SocketAddr;
use std::sync::Arc;

use crate::config::GatewayConfig;
use crate::error::StartupError;
use crate::gateway::{Gateway, GatewayOptions, RemoteGateway};
use crate::http::{HttpApp, HttpOptions};
use crate::registry::ServiceList;
use crate::server::{
    DrainHttpServerPlugin, GraphQLServer, LandingPagePlugin, ServerError, ServerOptions, ServerPlugin,
};

/// Wires the gateway, GraphQL server and HTTP app together.
pub struct Orchestrator {
    config: GatewayConfig,
}

impl Orchestrator {
    pub fn new(config: GatewayConfig) -> Self {
        Self { config }
    }

    /// Build the service list and a [`RemoteGateway`], then start serving.
    pub async fn run(&self) -> Result<RunningGateway, StartupError> {
        let services = ServiceList::new(self.config.services.clone())?;
        tracing::info!(
            services = services.len(),
            primary = %services.primary().name,
            "Service list built"
        );

        let gateway = RemoteGateway::new(services, GatewayOptions::from(&self.config.gateway))
            .map_err(StartupError::Gateway)?;

        self.run_with_gateway(Arc::new(gateway)).await
    }

    /// Start serving with a caller-supplied gateway.
    pub async fn run_with_gateway(
        &self,
        gateway: Arc<dyn Gateway>,
    ) -> Result<RunningGateway, StartupError> {
        let app = Arc::new(HttpApp::new(HttpOptions::from(&self.config.http)));

        let mut plugins: Vec<Arc<dyn ServerPlugin>> =
            vec![Arc::new(DrainHttpServerPlugin::new(app.clone()))];
        if self.config.server.landing_page {
            plugins.push(Arc::new(LandingPagePlugin::new(app.clone())));
        }

        let server = Arc::new(GraphQLServer::new(
            gateway,
            plugins,
            ServerOptions {
                graphql_path: self.config.server.graphql_path.clone(),
            },
        ));

        server.start().await?;
        app.mount(server.router().await?)
            .map_err(StartupError::Mount)?;

        let address = self.config.listener.bind_address();
        let local_addr = match app.listen(&address).await {
            Ok(addr) => addr,
            Err(source) => return Err(StartupError::Bind { address, source }),
        };

        let running = RunningGateway {
            server,
            app,
            local_addr,
        };
        tracing::info!(
            address = %local_addr,
            graphql_path = %running.graphql_path(),
            "{}",
            running.startup_message()
        );
        Ok(running)
    }
}

/// A gateway that finished startup and is accepting requests.
pub struct RunningGateway {
    server: Arc<GraphQLServer>,
    app: Arc<HttpApp>,
    local_addr: SocketAddr,
}

impl RunningGateway {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn graphql_path(&self) -> &str {
        self.server.graphql_path()
    }

    /// Browser-facing URL of the GraphQL endpoint.
    pub fn url(&self) -> String {
        crate::server::landing_page::endpoint_url(self.local_addr, self.graphql_path())
    }

    pub fn startup_message(&self) -> String {
        format!("🚀 Server ready at {}", self.url())
    }

    /// The list the gateway was constructed with.
    pub fn services(&self) -> &ServiceList {
        self.server.gateway().service_list()
    }

    pub fn server(&self) -> &Arc<GraphQLServer> {
        &self.server
    }

    pub fn app(&self) -> &Arc<HttpApp> {
        &self.app
    }

    /// Stop the GraphQL server. Its drain plugin closes the HTTP app.
    pub async fn shutdown(&self) -> Result<(), ServerError> {
        self.server.stop().await
    }
}

/// Run startup and log the outcome.
///
/// Failures are logged once here and reported as `None`; the caller decides
/// what to do with the process.
pub async fn run(config: GatewayConfig) -> Option<RunningGateway> {
    match Orchestrator::new(config).run().await {
        Ok(running) => Some(running),
        Err(e) => {
            tracing::error!(error = %e, category = e.category(), "Gateway failed to start");
            None
        }
    }
}
