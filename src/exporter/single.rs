//! `/metrics` in single-request mode: every configured category in one scrape.

use std::sync::Arc;
use std::time::Instant;

use axum::{extract::State, response::Response};
use futures_util::future::join_all;

use crate::address::AddressError;
use crate::exporter::registry::MetricSet;
use crate::exporter::service::Service;

/// Keep the metrics of a per-address collector, logging configured addresses that do not decode.
fn keep_valid(address: &str, result: Result<MetricSet, AddressError>) -> MetricSet {
    result.unwrap_or_else(|e| {
        tracing::error!(address = %address, error = %e, "Skipping configured address");
        MetricSet::new()
    })
}

impl Service {
    pub async fn collect_single(&self) -> MetricSet {
        let categories = &self.categories;
        let with_oracle = categories.oracle && self.is_pryzm();

        let (general, params, validators, wallets, proposals, upgrade, oracle) = tokio::join!(
            self.collect_general(),
            async {
                if categories.params {
                    Some(self.collect_params().await)
                } else {
                    None
                }
            },
            join_all(categories.validators.iter().map(|valoper| async move {
                keep_valid(valoper, self.collect_validator(valoper).await)
            })),
            join_all(categories.wallets.iter().map(|address| async move {
                keep_valid(address, self.collect_wallet(address).await)
            })),
            async {
                if categories.proposals {
                    Some(self.collect_proposals().await)
                } else {
                    None
                }
            },
            async {
                if categories.upgrades {
                    Some(self.collect_upgrade().await)
                } else {
                    None
                }
            },
            async {
                if with_oracle {
                    Some(self.collect_pryzm(&categories.validators).await)
                } else {
                    None
                }
            },
        );

        let mut set = general;
        for part in [params, proposals, upgrade, oracle].into_iter().flatten() {
            set.extend(part);
        }
        for part in validators.into_iter().chain(wallets) {
            set.extend(part);
        }

        set
    }
}

pub async fn single_handler(State(service): State<Arc<Service>>) -> Response {
    let start = Instant::now();
    let set = service.collect_single().await;

    tracing::info!(
        samples = set.samples().len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Single request processed"
    );
    set.into_response()
}
