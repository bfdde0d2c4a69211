//! GraphQL server subsystem.
//!
//! # Data Flow
//! ```text
//! GraphQLServer::new(gateway, plugins)
//!     → start(): gateway.load() → plugin.server_will_start()
//!     → router(): POST/GET <graphql_path>, GET / (landing page)
//!     → mounted on the HTTP app by the orchestrator
//!
//! GraphQLServer::stop()
//!     → plugin.drain_server() (in order, each awaited)
//!     → gateway.stop()
//! ```
//!
//! # States
//! ```text
//! Initialized → Started → Stopped
//! Initialized ──────────→ Stopped
//! ```

pub mod drain;
pub mod handlers;
pub mod landing_page;
pub mod plugin;

use std::sync::Arc;

use axum::{routing::get, Router};
use thiserror::Error;
use tokio::sync::Mutex;

use crate::gateway::{Gateway, GatewayError};

pub use drain::DrainHttpServerPlugin;
pub use landing_page::LandingPagePlugin;
pub use plugin::{PluginError, ServerInfo, ServerPlugin};

use self::handlers::{graphql_get, graphql_post, landing_page, ServerState};

#[derive(Debug, Clone)]
pub struct ServerOptions {
    pub graphql_path: String,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            graphql_path: "/graphql".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerPhase {
    Initialized,
    Started,
    Stopped,
}

#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Plugin(#[from] PluginError),

    #[error("server cannot {action} while {phase:?}")]
    InvalidState {
        action: &'static str,
        phase: ServerPhase,
    },
}

/// Serves a gateway over GraphQL-over-HTTP and runs plugin lifecycle hooks.
pub struct GraphQLServer {
    gateway: Arc<dyn Gateway>,
    plugins: Arc<[Arc<dyn ServerPlugin>]>,
    info: ServerInfo,
    phase: Mutex<ServerPhase>,
}

impl GraphQLServer {
    pub fn new(
        gateway: Arc<dyn Gateway>,
        plugins: Vec<Arc<dyn ServerPlugin>>,
        options: ServerOptions,
    ) -> Self {
        Self {
            gateway,
            plugins: plugins.into(),
            info: ServerInfo {
                graphql_path: options.graphql_path,
            },
            phase: Mutex::new(ServerPhase::Initialized),
        }
    }

    /// Load the gateway and run start hooks.
    ///
    /// Suspends until every sub-graph schema has been fetched.
    pub async fn start(&self) -> Result<(), ServerError> {
        let mut phase = self.phase.lock().await;
        if *phase != ServerPhase::Initialized {
            return Err(ServerError::InvalidState {
                action: "start",
                phase: *phase,
            });
        }

        self.gateway.load().await?;
        for plugin in self.plugins.iter() {
            plugin.server_will_start(&self.info).await?;
        }

        *phase = ServerPhase::Started;
        tracing::info!(
            graphql_path = %self.info.graphql_path,
            plugins = self.plugins.len(),
            "GraphQL server started"
        );
        Ok(())
    }

    /// Request handler to mount on the HTTP app.
    pub async fn router(&self) -> Result<Router, ServerError> {
        let phase = *self.phase.lock().await;
        if phase != ServerPhase::Started {
            return Err(ServerError::InvalidState {
                action: "serve requests",
                phase,
            });
        }

        let state = ServerState {
            gateway: self.gateway.clone(),
            plugins: self.plugins.clone(),
            info: self.info.clone(),
        };

        let mut router =
            Router::new().route(&self.info.graphql_path, get(graphql_get).post(graphql_post));
        if self.info.graphql_path != "/" {
            router = router.route("/", get(landing_page));
        }
        Ok(router.with_state(state))
    }

    /// Run drain hooks, then stop the gateway.
    ///
    /// Every hook runs and the gateway is stopped even when a hook fails; the
    /// first failure is returned. Concurrent and repeated calls wait for the
    /// first one and then return without re-running any hook.
    pub async fn stop(&self) -> Result<(), ServerError> {
        let mut phase = self.phase.lock().await;
        if *phase == ServerPhase::Stopped {
            return Ok(());
        }
        *phase = ServerPhase::Stopped;

        tracing::info!("GraphQL server stopping");
        let mut first_error: Option<ServerError> = None;
        for plugin in self.plugins.iter() {
            if let Err(e) = plugin.drain_server().await {
                tracing::error!(plugin = plugin.name(), error = %e, "Drain hook failed");
                first_error.get_or_insert(e.into());
            }
        }
        if let Err(e) = self.gateway.stop().await {
            tracing::error!(error = %e, "Gateway did not stop cleanly");
            first_error.get_or_insert(e.into());
        }

        match first_error {
            Some(e) => Err(e),
            None => {
                tracing::info!("GraphQL server stopped");
                Ok(())
            }
        }
    }

    pub async fn phase(&self) -> ServerPhase {
        *self.phase.lock().await
    }

    pub fn graphql_path(&self) -> &str {
        &self.info.graphql_path
    }

    pub fn gateway(&self) -> &Arc<dyn Gateway> {
        &self.gateway
    }
}
