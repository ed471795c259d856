//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Startup and handlers produce:
//!     → logging.rs (structured log events, text or JSON)
//!     → tracing.rs (per-scrape spans with request IDs)
//! ```
//!
//! The exported chain metrics themselves are rendered by `exporter::registry`.

pub mod logging;
pub mod tracing;

pub use logging::{init_logging, LoggingError};
