//! `/metrics/validator`: detailed metrics for one validator.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Query, State},
    response::Response,
};

use crate::address::AddressError;
use crate::exporter::registry::MetricSet;
use crate::exporter::service::{bad_request, log_failure, AddressQuery, Service};
use crate::exporter::validators::{is_active, rank_by_tokens};

impl Service {
    pub async fn collect_validator(&self, valoper: &str) -> Result<MetricSet, AddressError> {
        let self_delegator = self.codec.validator_to_account(valoper)?;

        let (validator, all_validators, commission, rewards, self_delegation) = tokio::join!(
            self.lcd.validator(valoper),
            self.lcd.validators(),
            self.lcd.validator_commission(valoper),
            self.lcd.validator_outstanding_rewards(valoper),
            self.lcd.delegation(valoper, &self_delegator),
        );

        let mut set = MetricSet::new();
        let Some(validator) = log_failure(validator, "validator") else {
            return Ok(set);
        };

        let address = validator.operator_address.as_str();
        let moniker = validator.description.moniker.as_str();
        let labels = [("address", address), ("moniker", moniker)];

        set.describe("cosmos_validator_tokens", "Tokens bonded to the validator");
        set.gauge(
            "cosmos_validator_tokens",
            &labels,
            self.denom.scale_amount(validator.tokens),
        );

        set.describe("cosmos_validator_delegator_shares", "Delegator shares of the validator");
        set.gauge(
            "cosmos_validator_delegator_shares",
            &labels,
            self.denom.scale_amount(validator.delegator_shares),
        );

        set.describe("cosmos_validator_commission_rate", "Commission rate of the validator");
        set.gauge(
            "cosmos_validator_commission_rate",
            &labels,
            validator.commission.commission_rates.rate,
        );

        set.describe("cosmos_validator_status", "Bond status of the validator (3 = bonded)");
        set.gauge("cosmos_validator_status", &labels, validator.status.code());

        set.describe("cosmos_validator_jailed", "Whether the validator is jailed");
        set.gauge(
            "cosmos_validator_jailed",
            &labels,
            if validator.jailed { 1.0 } else { 0.0 },
        );

        set.describe("cosmos_validator_min_self_delegation", "Minimum self delegation of the validator");
        set.gauge(
            "cosmos_validator_min_self_delegation",
            &labels,
            validator.min_self_delegation,
        );

        set.describe("cosmos_validator_active", "Whether the validator is in the active set");
        set.gauge(
            "cosmos_validator_active",
            &labels,
            if is_active(&validator) { 1.0 } else { 0.0 },
        );

        if let Some(commission) = log_failure(commission, "validator commission") {
            set.describe("cosmos_validator_commission", "Unclaimed commission of the validator");
            for coin in &commission {
                let (denom, amount) = self.denom.scale(coin);
                set.gauge(
                    "cosmos_validator_commission",
                    &[("address", address), ("moniker", moniker), ("denom", denom)],
                    amount,
                );
            }
        }

        if let Some(rewards) = log_failure(rewards, "validator outstanding rewards") {
            set.describe("cosmos_validator_rewards", "Outstanding rewards of the validator");
            for coin in &rewards {
                let (denom, amount) = self.denom.scale(coin);
                set.gauge(
                    "cosmos_validator_rewards",
                    &[("address", address), ("moniker", moniker), ("denom", denom)],
                    amount,
                );
            }
        }

        if let Some(delegation) = log_failure(self_delegation, "validator self delegation") {
            set.describe("cosmos_validator_self_delegated", "Self-delegated amount of the validator");
            set.gauge(
                "cosmos_validator_self_delegated",
                &labels,
                self.denom.scale_amount(delegation.balance.amount),
            );
        }

        if let Some(all_validators) = log_failure(all_validators, "validators") {
            if let Some(rank) = rank_by_tokens(&all_validators).get(address) {
                set.describe("cosmos_validator_rank", "Rank of the validator by tokens");
                set.gauge("cosmos_validator_rank", &labels, *rank as f64);
            }
        }

        if let Some(consensus_address) = self.consensus_address(&validator) {
            if let Some(info) =
                log_failure(self.lcd.signing_info(&consensus_address).await, "signing info")
            {
                set.describe("cosmos_validator_missed_blocks", "Blocks missed in the signing window");
                set.gauge(
                    "cosmos_validator_missed_blocks",
                    &labels,
                    info.missed_blocks_counter as f64,
                );
            }
        }

        Ok(set)
    }
}

pub async fn validator_handler(
    State(service): State<Arc<Service>>,
    Query(query): Query<AddressQuery>,
) -> Response {
    let start = Instant::now();
    let address = match query.require() {
        Ok(address) => address,
        Err(response) => return response,
    };

    match service.collect_validator(address).await {
        Ok(set) => {
            tracing::info!(
                address = %address,
                elapsed_ms = start.elapsed().as_millis() as u64,
                "Validator request processed"
            );
            set.into_response()
        }
        Err(e) => {
            tracing::warn!(address = %address, error = %e, "Invalid validator address");
            bad_request(e.to_string())
        }
    }
}
