//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Init → ConfigLoaded → PrefixesSealed → Connected → Serving
//!
//! Signals (signals.rs):
//!     SIGINT → stop accepting, drain in-flight scrapes
//!
//! Shutdown (shutdown.rs):
//!     Serving → Closed (service client released)
//! ```

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use startup::{run, run_with_listener, start, Phase, StartupError};
