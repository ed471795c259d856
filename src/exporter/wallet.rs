//! `/metrics/wallet`: balances, delegations, unbondings, redelegations and rewards of one account.

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
    pub async fn collect_wallet(&self, address: &str) -> Result<MetricSet, AddressError> {
        self.codec.decode_account(address)?;

        let (balances, delegations, unbondings, redelegations, rewards) = tokio::join!(
            self.lcd.balances(address),
            self.lcd.delegations(address),
            self.lcd.unbonding_delegations(address),
            self.lcd.redelegations(address),
            self.lcd.delegator_rewards(address),
        );

        let mut set = MetricSet::new();

        if let Some(balances) = log_failure(balances, "wallet balance") {
            set.describe("cosmos_wallet_balance", "Balance of the wallet");
            for coin in &balances {
                let (denom, amount) = self.denom.scale(coin);
                set.gauge(
                    "cosmos_wallet_balance",
                    &[("address", address), ("denom", denom)],
                    amount,
                );
            }
        }

        if let Some(delegations) = log_failure(delegations, "wallet delegations") {
            set.describe("cosmos_wallet_delegations", "Delegations of the wallet");
            for delegation in &delegations {
                let (denom, amount) = self.denom.scale(&delegation.balance);
                set.gauge(
                    "cosmos_wallet_delegations",
                    &[
                        ("address", address),
                        ("denom", denom),
                        ("delegated_to", delegation.delegation.validator_address.as_str()),
                    ],
                    amount,
                );
            }
        }

        if let Some(unbondings) = log_failure(unbondings, "wallet unbondings") {
            set.describe("cosmos_wallet_unbondings", "Unbonding delegations of the wallet");
            for unbonding in &unbondings {
                set.gauge(
                    "cosmos_wallet_unbondings",
                    &[
                        ("address", address),
                        ("denom", self.denom.display.as_str()),
                        ("unbonded_from", unbonding.validator_address.as_str()),
                    ],
                    self.denom.scale_amount(unbonding.total_balance()),
                );
            }
        }

        if let Some(redelegations) = log_failure(redelegations, "wallet redelegations") {
            set.describe("cosmos_wallet_redelegations", "Redelegations of the wallet");
            for redelegation in &redelegations {
                set.gauge(
                    "cosmos_wallet_redelegations",
                    &[
                        ("address", address),
                        ("denom", self.denom.display.as_str()),
                        ("redelegated_from", redelegation.redelegation.validator_src_address.as_str()),
                        ("redelegated_to", redelegation.redelegation.validator_dst_address.as_str()),
                    ],
                    self.denom.scale_amount(redelegation.total_balance()),
                );
            }
        }

        if let Some(rewards) = log_failure(rewards, "wallet rewards") {
            set.describe("cosmos_wallet_rewards", "Pending staking rewards of the wallet");
            for reward in &rewards {
                for coin in &reward.reward {
                    let (denom, amount) = self.denom.scale(coin);
                    set.gauge(
                        "cosmos_wallet_rewards",
                        &[
                            ("address", address),
                            ("denom", denom),
                            ("validator_address", reward.validator_address.as_str()),
                        ],
                        amount,
                    );
                }
            }
        }

        Ok(set)
    }
}

pub async fn wallet_handler(
    State(service): State<Arc<Service>>,
    Query(query): Query<AddressQuery>,
) -> Response {
    let start = Instant::now();
    let address = match query.require() {
        Ok(address) => address,
        Err(response) => return response,
    };

    match service.collect_wallet(address).await {
        Ok(set) => {
            tracing::info!(
                address = %address,
                elapsed_ms = start.elapsed().as_millis() as u64,
                "Wallet request processed"
            );
            set.into_response()
        }
        Err(e) => {
            tracing::warn!(address = %address, error = %e, "Invalid wallet address");
            bad_request(e.to_string())
        }
    }
}
