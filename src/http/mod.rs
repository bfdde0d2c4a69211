//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! GraphQLServer::router()
//!     → app.rs (mount handlers)
//!     → app.rs (request ID, trace, timeout, body limit layers)
//!     → axum::serve on the bound listener
//!     → close() on drain: graceful shutdown, socket released
//! ```

pub mod app;

pub use app::{HttpApp, HttpOptions};
