//! `/metrics/upgrade`: the pending software upgrade plan, if any.

use std::sync::Arc;
use std::time::Instant;

use axum::{extract::State, response::Response};

use crate::exporter::registry::MetricSet;
use crate::exporter::service::{log_failure, Service};
use crate::lcd::types::BlockHeader;

/// Blocks looked back to measure the average block time.
const BLOCK_TIME_WINDOW: u64 = 100;

/// Seconds until `target_height`, extrapolated from the block time between two headers.
pub fn estimate_seconds_until(
    latest: &BlockHeader,
    earlier: &BlockHeader,
    target_height: u64,
) -> Option<f64> {
    let blocks = latest.height.checked_sub(earlier.height).filter(|b| *b > 0)?;
    let elapsed = (latest.time - earlier.time).num_milliseconds() as f64 / 1000.0;
    if elapsed <= 0.0 {
        return None;
    }

    let remaining = target_height.saturating_sub(latest.height) as f64;
    Some(remaining * elapsed / blocks as f64)
}

impl Service {
    pub async fn collect_upgrade(&self) -> MetricSet {
        let mut set = MetricSet::new();
        let Some(plan) = log_failure(self.lcd.current_plan().await, "upgrade plan") else {
            return set;
        };

        set.describe("cosmos_upgrade_plan", "1 when an upgrade is planned");

        let Some(plan) = plan else {
            set.gauge("cosmos_upgrade_plan", &[("name", ""), ("info", "")], 0.0);
            return set;
        };

        set.gauge(
            "cosmos_upgrade_plan",
            &[("name", plan.name.as_str()), ("info", plan.info.as_str())],
            1.0,
        );
        set.describe("cosmos_upgrade_plan_height", "Height of the planned upgrade");
        set.gauge(
            "cosmos_upgrade_plan_height",
            &[("name", plan.name.as_str())],
            plan.height as f64,
        );

        let Some(latest) = log_failure(self.lcd.latest_block().await, "latest block") else {
            return set;
        };
        let earlier_height = latest.header.height.saturating_sub(BLOCK_TIME_WINDOW).max(1);
        let Some(earlier) = log_failure(self.lcd.block_at(earlier_height).await, "earlier block") else {
            return set;
        };

        if let Some(seconds) = estimate_seconds_until(&latest.header, &earlier.header, plan.height) {
            set.describe("cosmos_upgrade_estimated_seconds", "Estimated seconds until the upgrade height");
            set.gauge(
                "cosmos_upgrade_estimated_seconds",
                &[("name", plan.name.as_str())],
                seconds,
            );
        }

        set
    }
}

pub async fn upgrade_handler(State(service): State<Arc<Service>>) -> Response {
    let start = Instant::now();
    let set = service.collect_upgrade().await;

    tracing::info!(
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Upgrade request processed"
    );
    set.into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn header(height: u64, secs: i64) -> BlockHeader {
        BlockHeader {
            chain_id: "test-1".to_string(),
            height,
            time: Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap(),
        }
    }

    #[test]
    fn test_estimate_from_block_time() {
        // 100 blocks in 600 seconds: 6s per block
        let earlier = header(900, 0);
        let latest = header(1000, 600);
        assert_eq!(estimate_seconds_until(&latest, &earlier, 1100), Some(600.0));
    }

    #[test]
    fn test_past_upgrade_height_is_zero() {
        let earlier = header(900, 0);
        let latest = header(1000, 600);
        assert_eq!(estimate_seconds_until(&latest, &earlier, 950), Some(0.0));
    }

    #[test]
    fn test_degenerate_window() {
        let latest = header(1000, 600);
        assert_eq!(estimate_seconds_until(&latest, &latest, 1100), None);
        assert_eq!(estimate_seconds_until(&header(900, 0), &latest, 1100), None);
    }
}
