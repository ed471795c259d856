//! `/metrics/delegator`: who delegates to one validator, and how much.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Query, State},
    response::Response,
};

use crate::address::AddressError;
use crate::exporter::registry::MetricSet;
use crate::exporter::service::{bad_request, log_failure, AddressQuery, Service};

impl Service {
    pub async fn collect_delegators(&self, valoper: &str) -> Result<MetricSet, AddressError> {
        self.codec.decode_validator(valoper)?;

        let (delegations, unbondings) = tokio::join!(
            self.lcd.validator_delegations(valoper),
            self.lcd.validator_unbonding_delegations(valoper),
        );

        let mut set = MetricSet::new();

        if let Some((delegations, total)) = log_failure(delegations, "validator delegations") {
            set.describe("cosmos_delegator_delegations", "Amount delegated by each delegator");
            for delegation in &delegations {
                let (denom, amount) = self.denom.scale(&delegation.balance);
                set.gauge(
                    "cosmos_delegator_delegations",
                    &[
                        ("validator", valoper),
                        ("delegator", delegation.delegation.delegator_address.as_str()),
                        ("denom", denom),
                    ],
                    amount,
                );
            }

            set.describe("cosmos_delegator_count", "Number of delegators of the validator");
            set.gauge(
                "cosmos_delegator_count",
                &[("validator", valoper)],
                total.unwrap_or(delegations.len() as u64) as f64,
            );
        }

        if let Some(unbondings) = log_failure(unbondings, "validator unbonding delegations") {
            // One delegator may have several unbonding entries
            let mut per_delegator: BTreeMap<&str, f64> = BTreeMap::new();
            for unbonding in &unbondings {
                *per_delegator
                    .entry(unbonding.delegator_address.as_str())
                    .or_default() += unbonding.total_balance();
            }

            set.describe("cosmos_delegator_unbondings", "Amount being unbonded by each delegator");
            for (delegator, amount) in per_delegator {
                set.gauge(
                    "cosmos_delegator_unbondings",
                    &[
                        ("validator", valoper),
                        ("delegator", delegator),
                        ("denom", self.denom.display.as_str()),
                    ],
                    self.denom.scale_amount(amount),
                );
            }
        }

        Ok(set)
    }
}

pub async fn delegator_handler(
    State(service): State<Arc<Service>>,
    Query(query): Query<AddressQuery>,
) -> Response {
    let start = Instant::now();
    let address = match query.require() {
        Ok(address) => address,
        Err(response) => return response,
    };

    match service.collect_delegators(address).await {
        Ok(set) => {
            tracing::info!(
                address = %address,
                elapsed_ms = start.elapsed().as_millis() as u64,
                "Delegator request processed"
            );
            set.into_response()
        }
        Err(e) => {
            tracing::warn!(address = %address, error = %e, "Invalid validator address");
            bad_request(e.to_string())
        }
    }
}
