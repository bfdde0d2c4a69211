//! Server plugin hooks.

use async_trait::async_trait;
use thiserror::Error;

/// Facts about the running server handed to plugins.
#[derive(Debug, Clone)]
pub struct ServerInfo {
    pub graphql_path: String,
}

#[derive(Debug, Error)]
pub enum PluginError {
    #[error("plugin '{plugin}' failed to start: {message}")]
    Start { plugin: &'static str, message: String },

    #[error("plugin '{plugin}' failed to drain: {source}")]
    Drain {
        plugin: &'static str,
        #[source]
        source: std::io::Error,
    },
}

/// Lifecycle hooks a plugin can take part in. Every hook is optional.
#[async_trait]
pub trait ServerPlugin: Send + Sync {
    fn name(&self) -> &'static str;

    /// Runs after the gateway has loaded, before the server reports started.
    async fn server_will_start(&self, _info: &ServerInfo) -> Result<(), PluginError> {
        Ok(())
    }

    /// HTML served at `/`. The first plugin returning `Some` wins.
    fn landing_page(&self, _info: &ServerInfo) -> Option<String> {
        None
    }

    /// Runs once when the server is told to stop. `stop` waits for it.
    async fn drain_server(&self) -> Result<(), PluginError> {
        Ok(())
    }
}
