use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use supergraph_gateway::config::{load_config, ObservabilityConfig};
use supergraph_gateway::lifecycle::{signals, startup, Shutdown};
use supergraph_gateway::observability::logging::init_logging;

#[derive(Parser)]
#[command(name = "supergraph-gateway")]
#[command(about = "Federated GraphQL gateway", long_about = None)]
struct Args {
    /// Optional TOML configuration file.
    #[arg(short, long, env = "GATEWAY_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let config = load_config(args.config.as_deref());
    let observability = config
        .as_ref()
        .map(|c| c.observability.clone())
        .unwrap_or_else(|_| ObservabilityConfig::default());
    init_logging(&observability);

    tracing::info!("supergraph-gateway v{} starting", env!("CARGO_PKG_VERSION"));

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, category = "configuration", "Gateway failed to start");
            return;
        }
    };

    tracing::info!(
        port = config.listener.port,
        services = config.services.len(),
        graphql_path = %config.server.graphql_path,
        "Configuration loaded"
    );

    let Some(running) = startup::run(config).await else {
        return;
    };

    let shutdown = Arc::new(Shutdown::new());
    signals::spawn_signal_listener(shutdown.clone());
    shutdown.wait().await;

    if let Err(e) = running.shutdown().await {
        tracing::error!(error = %e, "Shutdown did not complete cleanly");
        return;
    }
    tracing::info!("Shutdown complete");
}
