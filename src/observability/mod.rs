//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events with structured fields
//!     → logging.rs (subscriber: filter + pretty/JSON formatter)
//!
//! Inbound HTTP:
//!     → tower-http TraceLayer spans, tagged with x-request-id
//! ```

pub mod logging;
