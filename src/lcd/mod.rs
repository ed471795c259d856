//! Cosmos LCD integration subsystem.
//!
//! # Data Flow
//! ```text
//! ServiceConfig (--lcd, --timeout, --limit)
//!     → client.rs (typed GET requests with timeout)
//!     → codec.rs (string-encoded numbers and durations)
//!     → types.rs (response structs, LcdError)
//! ```
//!
//! # Design Decisions
//! - Every request carries the configured timeout
//! - No retries: a failed query is reported to the caller, which skips the metric
//! - Amounts are decoded to f64; precision loss is acceptable for gauges

pub mod client;
pub mod codec;
pub mod types;

pub use client::LcdClient;
pub use types::{LcdError, LcdResult};
