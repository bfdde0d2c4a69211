//! Shared utilities for integration tests.
#![allow(dead_code)]

use std::io;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::{extract::State, routing::post, Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use supergraph_gateway::{GatewayConfig, ServiceDescriptor};

pub const ACCOUNTS_SDL: &str = r#"
type Query {
  me: User
}

type User @key(fields: "id") {
  id: ID!
  name: String
}
"#;

/// Counts what a mock sub-graph received.
#[derive(Default)]
pub struct SubgraphCalls {
    pub schema_queries: AtomicUsize,
    pub operations: AtomicUsize,
}

/// Start a mock sub-graph on an ephemeral port.
///
/// Answers the `_service { sdl }` query with `sdl` and echoes every other
/// operation back as `{ "data": { "echo": <query> } }`.
pub async fn start_mock_subgraph(sdl: &'static str) -> (SocketAddr, Arc<SubgraphCalls>) {
    let calls = Arc::new(SubgraphCalls::default());
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let app = Router::new()
        .route(
            "/graphql",
            post(
                |State((sdl, calls)): State<(&'static str, Arc<SubgraphCalls>)>, Json(body): Json<Value>| async move {
                    let query = body["query"].as_str().unwrap_or_default().to_string();
                    if query.contains("_service") {
                        calls.schema_queries.fetch_add(1, Ordering::SeqCst);
                        Json(json!({ "data": { "_service": { "sdl": sdl } } }))
                    } else {
                        calls.operations.fetch_add(1, Ordering::SeqCst);
                        Json(json!({ "data": { "echo": query } }))
                    }
                },
            ),
        )
        .with_state((sdl, calls.clone()));

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    (addr, calls)
}

/// An address nothing listens on.
pub async fn unused_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// Gateway config bound to loopback with the given services.
pub fn config_for(services: Vec<ServiceDescriptor>, port: u16) -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.listener.host = "127.0.0.1".into();
    config.listener.port = port;
    config.services = services;
    config.gateway.introspection_timeout_secs = 5;
    config.gateway.request_timeout_secs = 5;
    config.gateway.use_system_proxy = false;
    config
}

pub fn subgraph_url(addr: SocketAddr) -> String {
    format!("http://{}/graphql", addr)
}

/// A client that does not keep idle connections open across drains.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

/// JSON log lines written by a subscriber installed with [`LogCapture::install`].
#[derive(Clone, Default)]
pub struct LogCapture {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl LogCapture {
    /// Route this thread's events into the capture until the guard drops.
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let writer = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .json()
            .flatten_event(true)
            .with_ansi(false)
            .with_max_level(tracing::Level::TRACE)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn events(&self) -> Vec<Value> {
        let buf = self.buf.lock().unwrap();
        String::from_utf8_lossy(&buf)
            .lines()
            .filter_map(|line| serde_json::from_str(line).ok())
            .collect()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf.lock().unwrap().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
