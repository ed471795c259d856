//! `/metrics/validators`: the whole validator set.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use axum::{extract::State, response::Response};

use crate::exporter::registry::MetricSet;
use crate::exporter::service::{log_failure, Service};
use crate::lcd::types::{BondStatus, Validator};

/// 1-based rank of every validator by tokens, highest first.
pub fn rank_by_tokens(validators: &[Validator]) -> HashMap<&str, usize> {
    let mut ordered: Vec<&Validator> = validators.iter().collect();
    ordered.sort_by(|a, b| b.tokens.total_cmp(&a.tokens));

    ordered
        .into_iter()
        .enumerate()
        .map(|(i, validator)| (validator.operator_address.as_str(), i + 1))
        .collect()
}

pub fn is_active(validator: &Validator) -> bool {
    validator.status == BondStatus::Bonded
}

fn as_gauge(flag: bool) -> f64 {
    if flag {
        1.0
    } else {
        0.0
    }
}

impl Service {
    pub async fn collect_validators(&self) -> MetricSet {
        let (validators, signing_infos) =
            tokio::join!(self.lcd.validators(), self.lcd.signing_infos());

        let mut set = MetricSet::new();
        let Some(validators) = log_failure(validators, "validators") else {
            return set;
        };

        let missed_blocks: HashMap<String, u64> = log_failure(signing_infos, "signing infos")
            .unwrap_or_default()
            .into_iter()
            .map(|info| (info.address, info.missed_blocks_counter))
            .collect();

        let ranks = rank_by_tokens(&validators);

        set.describe("cosmos_validators_commission", "Commission rate of the validator");
        set.describe("cosmos_validators_status", "Bond status of the validator (3 = bonded)");
        set.describe("cosmos_validators_jailed", "Whether the validator is jailed");
        set.describe("cosmos_validators_tokens", "Tokens bonded to the validator");
        set.describe("cosmos_validators_delegator_shares", "Delegator shares of the validator");
        set.describe("cosmos_validators_min_self_delegation", "Minimum self delegation of the validator");
        set.describe("cosmos_validators_missed_blocks", "Blocks missed in the signing window");
        set.describe("cosmos_validators_rank", "Rank of the validator by tokens");
        set.describe("cosmos_validators_active", "Whether the validator is in the active set");

        for validator in &validators {
            let labels = [
                ("address", validator.operator_address.as_str()),
                ("moniker", validator.description.moniker.as_str()),
            ];

            set.gauge(
                "cosmos_validators_commission",
                &labels,
                validator.commission.commission_rates.rate,
            );
            set.gauge("cosmos_validators_status", &labels, validator.status.code());
            set.gauge("cosmos_validators_jailed", &labels, as_gauge(validator.jailed));
            set.gauge(
                "cosmos_validators_tokens",
                &labels,
                self.denom.scale_amount(validator.tokens),
            );
            set.gauge(
                "cosmos_validators_delegator_shares",
                &labels,
                self.denom.scale_amount(validator.delegator_shares),
            );
            set.gauge(
                "cosmos_validators_min_self_delegation",
                &labels,
                validator.min_self_delegation,
            );

            if let Some(missed) = self
                .consensus_address(validator)
                .and_then(|address| missed_blocks.get(&address))
            {
                set.gauge("cosmos_validators_missed_blocks", &labels, *missed as f64);
            }

            if let Some(rank) = ranks.get(validator.operator_address.as_str()) {
                set.gauge("cosmos_validators_rank", &labels, *rank as f64);
            }
            set.gauge("cosmos_validators_active", &labels, as_gauge(is_active(validator)));
        }

        set
    }

    /// Consensus address of a validator, if its key can be converted.
    pub(crate) fn consensus_address(&self, validator: &Validator) -> Option<String> {
        let pubkey = validator.consensus_pubkey.as_ref()?;
        match self.codec.consensus_address(&pubkey.type_url, &pubkey.key) {
            Ok(address) => Some(address),
            Err(e) => {
                tracing::debug!(
                    validator = %validator.operator_address,
                    error = %e,
                    "Could not derive consensus address"
                );
                None
            }
        }
    }
}

pub async fn validators_handler(State(service): State<Arc<Service>>) -> Response {
    let start = Instant::now();
    let set = service.collect_validators().await;

    tracing::info!(
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Validators request processed"
    );
    set.into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator(address: &str, tokens: f64, status: BondStatus) -> Validator {
        serde_json::from_value(serde_json::json!({
            "operator_address": address,
            "consensus_pubkey": null,
            "jailed": false,
            "status": match status {
                BondStatus::Bonded => "BOND_STATUS_BONDED",
                BondStatus::Unbonding => "BOND_STATUS_UNBONDING",
                BondStatus::Unbonded => "BOND_STATUS_UNBONDED",
                BondStatus::Unspecified => "BOND_STATUS_UNSPECIFIED",
            },
            "tokens": tokens.to_string(),
            "delegator_shares": tokens.to_string(),
            "description": {"moniker": address},
            "commission": {"commission_rates": {"rate": "0.1", "max_rate": "0.2", "max_change_rate": "0.01"}},
            "min_self_delegation": "1"
        }))
        .unwrap()
    }

    #[test]
    fn test_rank_by_tokens() {
        let validators = vec![
            validator("small", 10.0, BondStatus::Bonded),
            validator("big", 1000.0, BondStatus::Bonded),
            validator("jailed", 500.0, BondStatus::Unbonding),
        ];

        let ranks = rank_by_tokens(&validators);
        assert_eq!(ranks["big"], 1);
        assert_eq!(ranks["jailed"], 2);
        assert_eq!(ranks["small"], 3);
    }

    #[test]
    fn test_active_requires_bonded() {
        assert!(is_active(&validator("a", 1.0, BondStatus::Bonded)));
        assert!(!is_active(&validator("b", 1.0, BondStatus::Unbonding)));
        assert!(!is_active(&validator("c", 1.0, BondStatus::Unbonded)));
    }
}
