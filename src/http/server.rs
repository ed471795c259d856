//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with one handler per metric category
//! - Register the conditional routes (`/metrics`, `/metrics/pryzm`)
//! - Wire up middleware (tracing, request ID, timeout)
//! - Serve on a bound listener until the shutdown future resolves

use axum::{routing::get, Router};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::exporter::delegator::delegator_handler;
use crate::exporter::general::general_handler;
use crate::exporter::params::params_handler;
use crate::exporter::proposals::proposals_handler;
use crate::exporter::pryzm::pryzm_handler;
use crate::exporter::single::single_handler;
use crate::exporter::upgrade::upgrade_handler;
use crate::exporter::validator::validator_handler;
use crate::exporter::validators::validators_handler;
use crate::exporter::wallet::wallet_handler;
use crate::exporter::Service;
use crate::observability::tracing::scrape_span;

pub const X_REQUEST_ID: &str = "x-request-id";

/// Sequential LCD rounds a scrape may need (upgrade: plan, latest block, earlier block).
const SCRAPE_ROUNDS: u64 = 4;

/// Build the router. Requires a connected [`Service`], so prefixes are
/// already fixed when routes are registered.
#[allow(deprecated)]
pub fn build_router(service: Arc<Service>) -> Router {
    let config = service.config();
    let request_timeout = Duration::from_secs(config.timeout_secs.max(1) * SCRAPE_ROUNDS);

    let mut router = Router::new()
        .route("/metrics/wallet", get(wallet_handler))
        .route("/metrics/validator", get(validator_handler))
        .route("/metrics/validators", get(validators_handler))
        .route("/metrics/params", get(params_handler))
        .route("/metrics/general", get(general_handler))
        .route("/metrics/delegator", get(delegator_handler))
        .route("/metrics/proposals", get(proposals_handler))
        .route("/metrics/upgrade", get(upgrade_handler));

    if config.single_req {
        tracing::info!("Starting Single Mode");
        router = router.route("/metrics", get(single_handler));
    }

    if service.is_pryzm() {
        tracing::info!("Registering pryzm oracle metrics");
        router = router.route("/metrics/pryzm", get(pryzm_handler));
    }

    let x_request_id = axum::http::HeaderName::from_static(X_REQUEST_ID);

    router.with_state(service).layer(
        ServiceBuilder::new()
            .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
            .layer(TraceLayer::new_for_http().make_span_with(scrape_span))
            .layer(TimeoutLayer::new(request_timeout))
            .layer(PropagateRequestIdLayer::new(x_request_id)),
    )
}

/// Serve the router on an already bound listener until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, router: Router, shutdown: F) -> Result<(), std::io::Error>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    tracing::info!(address = %addr, "HTTP server starting");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await?;

    tracing::info!("HTTP server stopped");
    Ok(())
}
