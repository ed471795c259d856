//! `/metrics/proposals`: governance proposals in their voting period.

use std::sync::Arc;
use std::time::Instant;

use axum::{extract::State, response::Response};

use crate::exporter::registry::MetricSet;
use crate::exporter::service::{log_failure, Service};

impl Service {
    pub async fn collect_proposals(&self) -> MetricSet {
        let mut set = MetricSet::new();
        let Some(proposals) = log_failure(self.lcd.voting_proposals().await, "proposals") else {
            return set;
        };

        set.describe("cosmos_proposals_open_count", "Proposals in voting period");
        set.gauge("cosmos_proposals_open_count", &[], proposals.len() as f64);

        set.describe("cosmos_proposals_voting", "Proposal is in voting period");
        set.describe("cosmos_proposals_voting_end_time", "End of the voting period as unix seconds");
        for proposal in &proposals {
            let id = proposal.id.to_string();
            let labels = [("id", id.as_str()), ("title", proposal.title.as_str())];

            set.gauge("cosmos_proposals_voting", &labels, 1.0);
            if let Some(end) = proposal.voting_end_time {
                set.gauge("cosmos_proposals_voting_end_time", &labels, end.timestamp() as f64);
            }
        }

        set
    }
}

pub async fn proposals_handler(State(service): State<Arc<Service>>) -> Response {
    let start = Instant::now();
    let set = service.collect_proposals().await;

    tracing::info!(
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Proposals request processed"
    );
    set.into_response()
}
