//! Startup orchestration.
//!
//! # Responsibilities
//! - Seal the bech32 prefixes into an address codec
//! - Connect the service to the LCD
//! - Register routes and bind the listener
//!
//! # Design Decisions
//! - Fail fast: every startup error is returned to `main`, which picks the exit code
//! - Steps run in order, never concurrently
//! - The listener binds last (traffic only when connected)

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use axum::Router;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::address::{AddressCodec, AddressError};
use crate::config::{ConfigError, ServiceConfig};
use crate::exporter::Service;
use crate::http::{build_router, serve};
use crate::lcd::LcdError;
use crate::lifecycle::shutdown::close_service;
use crate::lifecycle::signals::shutdown_signal;
use crate::observability::LoggingError;

/// Process states, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    Init,
    ConfigLoaded,
    PrefixesSealed,
    Connected,
    Serving,
    Closed,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Init => "init",
            Phase::ConfigLoaded => "config_loaded",
            Phase::PrefixesSealed => "prefixes_sealed",
            Phase::Connected => "connected",
            Phase::Serving => "serving",
            Phase::Closed => "closed",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("could not load config: {0}")]
    Config(#[from] ConfigError),

    #[error("could not set up logging: {0}")]
    Logging(#[from] LoggingError),

    #[error("invalid bech32 prefixes: {0}")]
    Prefixes(#[from] AddressError),

    #[error("could not connect to LCD: {0}")]
    Connect(#[from] LcdError),

    #[error("could not bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("HTTP server failed: {0}")]
    Serve(#[source] std::io::Error),
}

impl StartupError {
    /// Listener failures end the process quietly; everything earlier is fatal.
    pub fn exit_code(&self) -> u8 {
        match self {
            StartupError::Bind { .. } | StartupError::Serve(_) => 0,
            _ => 1,
        }
    }

    /// Raised before the log subscriber exists, so only stderr can report it.
    pub fn before_logging(&self) -> bool {
        matches!(self, StartupError::Config(_) | StartupError::Logging(_))
    }

    /// Phase the process had reached when the error happened.
    pub fn phase(&self) -> Phase {
        match self {
            StartupError::Config(_) | StartupError::Logging(_) => Phase::Init,
            StartupError::Prefixes(_) => Phase::ConfigLoaded,
            StartupError::Connect(_) => Phase::PrefixesSealed,
            StartupError::Bind { .. } => Phase::Connected,
            StartupError::Serve(_) => Phase::Serving,
        }
    }
}

/// Validate the resolved prefixes. The codec is never mutated afterwards.
pub fn seal_prefixes(config: &ServiceConfig) -> Result<Arc<AddressCodec>, StartupError> {
    let codec = AddressCodec::new(config.prefixes.clone())?;
    tracing::info!(phase = %Phase::PrefixesSealed, prefixes = ?codec.prefixes(), "Prefixes sealed");
    Ok(Arc::new(codec))
}

/// Seal prefixes, connect to the LCD and register routes.
pub async fn start(config: ServiceConfig) -> Result<(Arc<Service>, Router), StartupError> {
    let config = Arc::new(config);
    let codec = seal_prefixes(&config)?;

    let service = Arc::new(Service::connect(config, codec).await?);
    tracing::info!(phase = %Phase::Connected, chain_id = %service.chain_id(), "Service connected");

    let router = build_router(service.clone());
    Ok((service, router))
}

/// Serve on an already bound listener until `shutdown` resolves, then close the service.
pub async fn run_with_listener<F>(
    config: ServiceConfig,
    listener: TcpListener,
    shutdown: F,
) -> Result<(), StartupError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let (service, router) = start(config).await?;

    tracing::info!(phase = %Phase::Serving, "Serving metrics");
    let served = serve(listener, router, shutdown).await;

    close_service(service);
    tracing::info!(phase = %Phase::Closed, "Exporter stopped");
    served.map_err(StartupError::Serve)
}

/// Full startup sequence for a loaded config: connect, bind, serve until Ctrl+C.
pub async fn run(config: ServiceConfig) -> Result<(), StartupError> {
    tracing::info!(phase = %Phase::ConfigLoaded, "Config loaded");
    let (service, router) = start(config).await?;

    let address = service.config().bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind {
            address: address.clone(),
            source,
        })?;

    tracing::info!(phase = %Phase::Serving, address = %address, "Listening for connections");
    let served = serve(listener, router, shutdown_signal()).await;

    close_service(service);
    tracing::info!(phase = %Phase::Closed, "Exporter stopped");
    served.map_err(StartupError::Serve)
}
