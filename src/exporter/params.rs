//! `/metrics/params`: staking, slashing, mint and distribution module parameters.

use std::sync::Arc;
use std::time::Instant;

use axum::{extract::State, response::Response};

use crate::exporter::registry::MetricSet;
use crate::exporter::service::{log_failure, Service};

impl Service {
    pub async fn collect_params(&self) -> MetricSet {
        let (staking, slashing, mint, distribution) = tokio::join!(
            self.lcd.staking_params(),
            self.lcd.slashing_params(),
            self.lcd.mint_params(),
            self.lcd.distribution_params(),
        );

        let mut set = MetricSet::new();

        if let Some(staking) = log_failure(staking, "staking params") {
            set.describe("cosmos_params_max_validators", "Maximum number of active validators");
            set.gauge("cosmos_params_max_validators", &[], staking.max_validators as f64);
            set.describe("cosmos_params_unbonding_time", "Unbonding time in seconds");
            set.gauge("cosmos_params_unbonding_time", &[], staking.unbonding_time);
        }

        if let Some(slashing) = log_failure(slashing, "slashing params") {
            set.describe("cosmos_params_signed_blocks_window", "Blocks in the liveness window");
            set.gauge(
                "cosmos_params_signed_blocks_window",
                &[],
                slashing.signed_blocks_window as f64,
            );
            set.describe("cosmos_params_min_signed_per_window", "Minimum share of signed blocks per window");
            set.gauge(
                "cosmos_params_min_signed_per_window",
                &[],
                slashing.min_signed_per_window,
            );
            set.describe("cosmos_params_downtime_jail_duration", "Jail duration for downtime in seconds");
            set.gauge(
                "cosmos_params_downtime_jail_duration",
                &[],
                slashing.downtime_jail_duration,
            );
            set.describe("cosmos_params_slash_fraction_double_sign", "Slash fraction for double signing");
            set.gauge(
                "cosmos_params_slash_fraction_double_sign",
                &[],
                slashing.slash_fraction_double_sign,
            );
            set.describe("cosmos_params_slash_fraction_downtime", "Slash fraction for downtime");
            set.gauge(
                "cosmos_params_slash_fraction_downtime",
                &[],
                slashing.slash_fraction_downtime,
            );
        }

        if let Some(mint) = log_failure(mint, "mint params") {
            set.describe("cosmos_params_inflation_rate_change", "Maximum annual inflation change");
            set.gauge("cosmos_params_inflation_rate_change", &[], mint.inflation_rate_change);
            set.describe("cosmos_params_inflation_max", "Maximum inflation rate");
            set.gauge("cosmos_params_inflation_max", &[], mint.inflation_max);
            set.describe("cosmos_params_inflation_min", "Minimum inflation rate");
            set.gauge("cosmos_params_inflation_min", &[], mint.inflation_min);
            set.describe("cosmos_params_goal_bonded", "Goal bonded ratio");
            set.gauge("cosmos_params_goal_bonded", &[], mint.goal_bonded);
            set.describe("cosmos_params_blocks_per_year", "Expected blocks per year");
            set.gauge("cosmos_params_blocks_per_year", &[], mint.blocks_per_year as f64);
        }

        if let Some(distribution) = log_failure(distribution, "distribution params") {
            set.describe("cosmos_params_community_tax", "Community tax rate");
            set.gauge("cosmos_params_community_tax", &[], distribution.community_tax);
            set.describe("cosmos_params_base_proposer_reward", "Base proposer reward");
            set.gauge(
                "cosmos_params_base_proposer_reward",
                &[],
                distribution.base_proposer_reward,
            );
            set.describe("cosmos_params_bonus_proposer_reward", "Bonus proposer reward");
            set.gauge(
                "cosmos_params_bonus_proposer_reward",
                &[],
                distribution.bonus_proposer_reward,
            );
        }

        set
    }
}

pub async fn params_handler(State(service): State<Arc<Service>>) -> Response {
    let start = Instant::now();
    let set = service.collect_params().await;

    tracing::info!(
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Params request processed"
    );
    set.into_response()
}
