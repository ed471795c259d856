//! `/metrics/general`: chain-wide staking, supply, inflation and block metrics.

use std::sync::Arc;
use std::time::Instant;

use axum::{extract::State, response::Response};

use crate::exporter::registry::MetricSet;
use crate::exporter::service::{log_failure, Service};

impl Service {
    pub async fn collect_general(&self) -> MetricSet {
        let (pool, supply, community_pool, inflation, annual_provisions, latest_block) = tokio::join!(
            self.lcd.staking_pool(),
            self.lcd.supply_of(&self.denom.base),
            self.lcd.community_pool(),
            self.lcd.inflation(),
            self.lcd.annual_provisions(),
            self.lcd.latest_block(),
        );

        let mut set = MetricSet::new();
        let chain = [("chain_id", self.chain_id.as_str())];

        if let Some(pool) = log_failure(pool, "staking pool") {
            set.describe("cosmos_general_bonded_tokens", "Bonded tokens");
            set.gauge(
                "cosmos_general_bonded_tokens",
                &chain,
                self.denom.scale_amount(pool.bonded_tokens),
            );
            set.describe("cosmos_general_not_bonded_tokens", "Not bonded tokens");
            set.gauge(
                "cosmos_general_not_bonded_tokens",
                &chain,
                self.denom.scale_amount(pool.not_bonded_tokens),
            );
        }

        if let Some(supply) = log_failure(supply, "total supply") {
            set.describe("cosmos_general_supply_total", "Total supply of the staking token");
            set.gauge(
                "cosmos_general_supply_total",
                &chain,
                self.denom.scale(&supply).1,
            );
        }

        if let Some(community_pool) = log_failure(community_pool, "community pool") {
            set.describe("cosmos_general_community_pool", "Community pool balance");
            for coin in &community_pool {
                let (denom, amount) = self.denom.scale(coin);
                set.gauge(
                    "cosmos_general_community_pool",
                    &[("chain_id", self.chain_id.as_str()), ("denom", denom)],
                    amount,
                );
            }
        }

        if let Some(inflation) = log_failure(inflation, "inflation") {
            set.describe("cosmos_general_inflation", "Current inflation rate");
            set.gauge("cosmos_general_inflation", &chain, inflation);
        }

        if let Some(annual_provisions) = log_failure(annual_provisions, "annual provisions") {
            set.describe("cosmos_general_annual_provisions", "Annual provisions of the staking token");
            set.gauge(
                "cosmos_general_annual_provisions",
                &chain,
                self.denom.scale_amount(annual_provisions),
            );
        }

        if let Some(block) = log_failure(latest_block, "latest block") {
            set.describe("cosmos_general_latest_block_height", "Height of the latest block");
            set.gauge(
                "cosmos_general_latest_block_height",
                &chain,
                block.header.height as f64,
            );
            set.describe("cosmos_general_latest_block_time", "Time of the latest block as unix seconds");
            set.gauge(
                "cosmos_general_latest_block_time",
                &chain,
                block.header.time.timestamp_millis() as f64 / 1000.0,
            );
        }

        set
    }
}

pub async fn general_handler(State(service): State<Arc<Service>>) -> Response {
    let start = Instant::now();
    let set = service.collect_general().await;

    tracing::info!(
        elapsed_ms = start.elapsed().as_millis() as u64,
        "General request processed"
    );
    set.into_response()
}
