//! Structured logging.
//!
//! # Design Decisions
//! - `--log-level` selects the filter, `RUST_LOG` overrides it when set
//! - `--json` switches to the JSON formatter
//! - An unknown level is a startup error, not a silent fallback

use std::str::FromStr;

use thiserror::Error;
use tracing_subscriber::{filter::LevelFilter, EnvFilter};

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("invalid log level `{level}`: {reason}")]
    InvalidLevel { level: String, reason: String },

    #[error("failed to install log subscriber: {0}")]
    Init(String),
}

pub fn parse_level(level: &str) -> Result<LevelFilter, LoggingError> {
    LevelFilter::from_str(level.trim()).map_err(|e| LoggingError::InvalidLevel {
        level: level.to_string(),
        reason: e.to_string(),
    })
}

/// Filter from `RUST_LOG` when present, otherwise from the configured level.
fn env_filter(level: LevelFilter) -> EnvFilter {
    match std::env::var(EnvFilter::DEFAULT_ENV) {
        Ok(directives) if !directives.trim().is_empty() => EnvFilter::new(directives),
        _ => EnvFilter::default().add_directive(level.into()),
    }
}

/// Install the global subscriber.
pub fn init_logging(level: &str, json: bool) -> Result<(), LoggingError> {
    let level = parse_level(level)?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter(level))
        .with_target(false);

    let result = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    result.map_err(|e| LoggingError::Init(e.to_string()))
}
