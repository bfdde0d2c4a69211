//! HTTP app: the socket-owning half of the gateway.
//!
//! # Responsibilities
//! - Collect handlers mounted by the GraphQL server
//! - Wire up middleware (request ID, tracing, timeout, body limit)
//! - Bind the listener and serve in a background task
//! - Close the listener exactly once on request
//!
//! # Design Decisions
//! - Shared as `Arc<HttpApp>` between the orchestrator and server plugins
//! - `close` is idempotent; the first caller performs the graceful shutdown

use std::io;
use std::net::SocketAddr;
use std::sync::{Mutex, OnceLock};
use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::HttpConfig;

/// Middleware settings for the inbound side.
#[derive(Debug, Clone)]
pub struct HttpOptions {
    pub request_timeout: Duration,
    pub body_limit_bytes: usize,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self::from(&HttpConfig::default())
    }
}

impl From<&HttpConfig> for HttpOptions {
    fn from(config: &HttpConfig) -> Self {
        Self {
            request_timeout: Duration::from_secs(config.request_timeout_secs),
            body_limit_bytes: config.body_limit_bytes,
        }
    }
}

/// Handle on the serve task while the app is listening.
struct Serving {
    shutdown_tx: oneshot::Sender<()>,
    task: JoinHandle<io::Result<()>>,
}

/// An axum application plus the lifecycle of its listening socket.
pub struct HttpApp {
    options: HttpOptions,
    router: Mutex<Router>,
    local_addr: OnceLock<SocketAddr>,
    serving: tokio::sync::Mutex<Option<Serving>>,
}

impl HttpApp {
    pub fn new(options: HttpOptions) -> Self {
        Self {
            options,
            router: Mutex::new(Router::new()),
            local_addr: OnceLock::new(),
            serving: tokio::sync::Mutex::new(None),
        }
    }

    /// Register handlers. Must happen before `listen`.
    pub fn mount(&self, routes: Router) -> io::Result<()> {
        let mut router = self
            .router
            .lock()
            .map_err(|_| io::Error::other("HTTP app router lock poisoned"))?;
        *router = std::mem::take(&mut *router).merge(routes);
        Ok(())
    }

    /// Bind `addr` and start serving in the background.
    ///
    /// Returns the bound address (useful when binding port 0).
    pub async fn listen(&self, addr: &str) -> io::Result<SocketAddr> {
        let mut serving = self.serving.lock().await;
        if serving.is_some() {
            return Err(io::Error::new(io::ErrorKind::AddrInUse, "HTTP app is already listening"));
        }

        let listener = TcpListener::bind(addr).await?;
        let local_addr = listener.local_addr()?;

        let app = self.build_router()?;
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let task = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.await;
                })
                .await
        });

        let _ = self.local_addr.set(local_addr);
        *serving = Some(Serving { shutdown_tx, task });

        tracing::info!(address = %local_addr, "HTTP app listening");
        Ok(local_addr)
    }

    /// Stop accepting connections and wait for the serve task to finish.
    ///
    /// Returns `true` if this call closed the listener, `false` if it was not
    /// listening.
    pub async fn close(&self) -> io::Result<bool> {
        let Some(serving) = self.serving.lock().await.take() else {
            return Ok(false);
        };

        let _ = serving.shutdown_tx.send(());
        serving.task.await.map_err(io::Error::other)??;

        tracing::info!("HTTP app closed");
        Ok(true)
    }

    /// Address bound by the first successful `listen`.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.local_addr.get().copied()
    }

    pub async fn is_listening(&self) -> bool {
        self.serving.lock().await.is_some()
    }

    #[allow(deprecated)]
    fn build_router(&self) -> io::Result<Router> {
        let router = self
            .router
            .lock()
            .map_err(|_| io::Error::other("HTTP app router lock poisoned"))?
            .clone();

        Ok(router
            .layer(RequestBodyLimitLayer::new(self.options.body_limit_bytes))
            .layer(TimeoutLayer::new(self.options.request_timeout))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid)))
    }
}
