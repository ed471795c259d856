//! HTTP surface of the exporter.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, tracing, timeout)
//!     → exporter handler for the matched /metrics path
//!     → Prometheus text response
//! ```

pub mod server;

pub use server::{build_router, serve, X_REQUEST_ID};
