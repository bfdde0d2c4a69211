//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Build service list → Construct gateway → Start GraphQL server
//!     → Mount handler → Listen → Log ready URL (or error)
//!
//! Shutdown (shutdown.rs):
//!     Signal received → GraphQL server stop → Drain HTTP app → Stop gateway
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Ordered startup: schema fetch first, listener last
//! - Ordered shutdown: drain hooks complete before stop returns

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::{Orchestrator, RunningGateway};
