//! Per-request spans.

use axum::{body::Body, http::Request};
use tower_http::request_id::RequestId;
use tracing::Span;

/// Span for one scrape, tagged with the request ID set by the request-id layer.
pub fn scrape_span(request: &Request<Body>) -> Span {
    let request_id = request
        .extensions()
        .get::<RequestId>()
        .and_then(|id| id.header_value().to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "scrape",
        request_id = %request_id,
        method = %request.method(),
        path = %request.uri().path(),
    )
}
