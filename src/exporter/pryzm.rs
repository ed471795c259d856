//! `/metrics/pryzm`: Pryzm oracle module metrics, registered only on pryzm chains.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Query, State},
    response::Response,
};
use futures_util::future::join_all;

use crate::exporter::registry::MetricSet;
use crate::exporter::service::{bad_request, log_failure, AddressQuery, Service};

impl Service {
    /// Oracle params plus the miss counter of every given validator.
    /// Addresses that do not decode are logged and left out.
    pub async fn collect_pryzm(&self, validators: &[String]) -> MetricSet {
        let validators: Vec<&str> = validators
            .iter()
            .map(String::as_str)
            .filter(|valoper| match self.codec.decode_validator(valoper) {
                Ok(_) => true,
                Err(e) => {
                    tracing::error!(address = %valoper, error = %e, "Skipping oracle validator");
                    false
                }
            })
            .collect();

        let (params, miss_counters) = tokio::join!(
            self.lcd.oracle_params(),
            join_all(validators.iter().map(|valoper| self.lcd.oracle_miss_counter(valoper))),
        );

        let mut set = MetricSet::new();

        if let Some(params) = log_failure(params, "oracle params") {
            set.describe("pryzm_oracle_vote_period", "Oracle vote period in blocks");
            set.gauge("pryzm_oracle_vote_period", &[], params.vote_period as f64);
            set.describe("pryzm_oracle_slash_fraction", "Oracle slash fraction");
            set.gauge("pryzm_oracle_slash_fraction", &[], params.slash_fraction);
            set.describe("pryzm_oracle_slash_window", "Oracle slash window in blocks");
            set.gauge("pryzm_oracle_slash_window", &[], params.slash_window as f64);
            set.describe("pryzm_oracle_min_valid_per_window", "Minimum valid votes per window");
            set.gauge(
                "pryzm_oracle_min_valid_per_window",
                &[],
                params.min_valid_per_window,
            );
        }

        set.describe("pryzm_oracle_miss_counter", "Missed oracle votes in the current window");
        for (valoper, counter) in validators.iter().zip(miss_counters) {
            if let Some(counter) = log_failure(counter, "oracle miss counter") {
                set.gauge(
                    "pryzm_oracle_miss_counter",
                    &[("validator", *valoper)],
                    counter as f64,
                );
            }
        }

        set
    }
}

/// Uses `?address=` when given, otherwise the configured validators.
pub async fn pryzm_handler(
    State(service): State<Arc<Service>>,
    Query(query): Query<AddressQuery>,
) -> Response {
    let start = Instant::now();
    let validators = match query.require() {
        Ok(address) => {
            if let Err(e) = service.codec.decode_validator(address) {
                tracing::warn!(address = %address, error = %e, "Invalid validator address");
                return bad_request(e.to_string());
            }
            vec![address.to_string()]
        }
        Err(_) => service.categories.validators.clone(),
    };

    let set = service.collect_pryzm(&validators).await;
    tracing::info!(
        validators = validators.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Pryzm request processed"
    );
    set.into_response()
}
