//! Prometheus exporter for Cosmos SDK chains.
//!
//! # Architecture Overview
//!
//! ```text
//!     Prometheus scrape          ┌──────────────────────────────────────────────┐
//!     ───────────────────────────┼─▶ http ──▶ exporter handler ──▶ lcd client ──┼──▶ LCD
//!                                │                   │                          │
//!     text exposition            │                   ▼                          │
//!     ◀──────────────────────────┼──────────── registry (per scrape)           │
//!                                │                                              │
//!                                │  config · address codec · lifecycle · logs  │
//!                                └──────────────────────────────────────────────┘
//! ```
//!
//! Startup: load config → init logging → seal address prefixes → connect to
//! the LCD → register routes → serve.

// Inputs
pub mod address;
pub mod config;
pub mod lcd;

// Metrics
pub mod exporter;
pub mod http;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::schema::ServiceConfig;
pub use exporter::Service;
pub use http::build_router;
pub use lifecycle::StartupError;
