//! Exporter service and scrape handlers.
//!
//! # Data Flow
//! ```text
//! GET /metrics/<category>
//!     → handler (query parsing, address decoding via AddressCodec)
//!     → Service::collect_* (concurrent LCD queries)
//!     → registry.rs (MetricSet → scrape-local Prometheus recorder)
//!     → text exposition response
//! ```
//!
//! # Design Decisions
//! - Nothing is cached: every scrape queries the LCD
//! - A failed query is logged and its metrics omitted; the scrape still succeeds
//! - Invalid addresses answer 400
//! - Base-denom amounts are divided by the denom coefficient

pub mod delegator;
pub mod general;
pub mod params;
pub mod proposals;
pub mod pryzm;
pub mod registry;
pub mod service;
pub mod single;
pub mod upgrade;
pub mod validator;
pub mod validators;
pub mod wallet;

pub use registry::MetricSet;
pub use service::{Categories, Denom, Service};
