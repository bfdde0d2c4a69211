//! Drain plugin: closes the HTTP app when the GraphQL server stops.

use std::sync::Arc;

use async_trait::async_trait;

use crate::http::HttpApp;
use crate::server::plugin::{PluginError, ServerPlugin};

pub struct DrainHttpServerPlugin {
    app: Arc<HttpApp>,
}

impl DrainHttpServerPlugin {
    pub fn new(app: Arc<HttpApp>) -> Self {
        Self { app }
    }
}

#[async_trait]
impl ServerPlugin for DrainHttpServerPlugin {
    fn name(&self) -> &'static str {
        "drain-http-server"
    }

    async fn drain_server(&self) -> Result<(), PluginError> {
        let closed = self.app.close().await.map_err(|source| PluginError::Drain {
            plugin: self.name(),
            source,
        })?;

        if !closed {
            tracing::debug!("HTTP app was not listening; nothing to drain");
        }
        Ok(())
    }
}
