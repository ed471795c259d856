//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! argv + COSMOS_EXPORTER_* env
//!     → schema.rs (clap definitions, defaults)
//!     → loader.rs (merge optional TOML file into unset flags)
//!     → resolve bech32 prefixes
//!     → ServiceConfig (immutable, shared via Arc)
//! ```
//!
//! # Design Decisions
//! - Explicit flags and env vars beat the file; the file beats defaults
//! - A missing config file is not an error; an unreadable or malformed one is
//! - Config is immutable once loaded

pub mod loader;
pub mod schema;

pub use loader::{load_config, load_config_from, ConfigError};
pub use schema::{ConfigFile, ServiceConfig};
