//! Scrape-local metric collection and Prometheus rendering.
//!
//! Each scrape collects its samples into a `MetricSet`, then renders them
//! through a fresh `PrometheusRecorder` installed as the thread-local
//! recorder. Concurrent scrapes therefore never share metric state.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use metrics::Label;
use metrics_exporter_prometheus::PrometheusBuilder;

/// Content type of the Prometheus text exposition format.
pub const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4";

/// A single gauge sample.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub name: &'static str,
    pub labels: Vec<(&'static str, String)>,
    pub value: f64,
}

/// Gauges gathered during one scrape.
#[derive(Debug, Clone, Default)]
pub struct MetricSet {
    descriptions: Vec<(&'static str, &'static str)>,
    samples: Vec<Sample>,
}

impl MetricSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach help text to a metric name.
    pub fn describe(&mut self, name: &'static str, help: &'static str) {
        if !self.descriptions.iter().any(|(n, _)| *n == name) {
            self.descriptions.push((name, help));
        }
    }

    pub fn gauge(&mut self, name: &'static str, labels: &[(&'static str, &str)], value: f64) {
        self.samples.push(Sample {
            name,
            labels: labels.iter().map(|(k, v)| (*k, v.to_string())).collect(),
            value,
        });
    }

    /// Merge another set into this one.
    pub fn extend(&mut self, other: MetricSet) {
        for (name, help) in other.descriptions {
            self.describe(name, help);
        }
        self.samples.extend(other.samples);
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Value of the first sample matching `name` whose labels include all of `labels`.
    pub fn value(&self, name: &str, labels: &[(&str, &str)]) -> Option<f64> {
        self.samples
            .iter()
            .find(|sample| {
                sample.name == name
                    && labels
                        .iter()
                        .all(|(k, v)| sample.labels.iter().any(|(sk, sv)| sk == k && sv == v))
            })
            .map(|sample| sample.value)
    }

    /// Render the set in the Prometheus text exposition format.
    pub fn render(&self) -> String {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();

        metrics::with_local_recorder(&recorder, || {
            for (name, help) in &self.descriptions {
                metrics::describe_gauge!(*name, *help);
            }
            for sample in &self.samples {
                let labels: Vec<Label> = sample
                    .labels
                    .iter()
                    .map(|(k, v)| Label::new(*k, v.clone()))
                    .collect();
                metrics::gauge!(sample.name, labels).set(sample.value);
            }
        });

        handle.render()
    }

    pub fn into_response(self) -> Response {
        (
            StatusCode::OK,
            [(header::CONTENT_TYPE, PROMETHEUS_CONTENT_TYPE)],
            self.render(),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_gauges() {
        let mut set = MetricSet::new();
        set.describe("cosmos_wallet_balance", "Balance of the wallet");
        set.gauge(
            "cosmos_wallet_balance",
            &[("address", "cosmos1abc"), ("denom", "atom")],
            12.5,
        );

        let text = set.render();
        assert!(text.contains("# HELP cosmos_wallet_balance Balance of the wallet"));
        assert!(text.contains("# TYPE cosmos_wallet_balance gauge"));
        assert!(text.contains("cosmos_wallet_balance{"));
        assert!(text.contains("address=\"cosmos1abc\""));
        assert!(text.contains("12.5"));
    }

    #[test]
    fn test_scrapes_do_not_share_state() {
        let mut first = MetricSet::new();
        first.gauge("cosmos_general_bonded_tokens", &[], 1.0);
        let mut second = MetricSet::new();
        second.gauge("cosmos_general_not_bonded_tokens", &[], 2.0);

        let first_text = first.render();
        let second_text = second.render();
        assert!(!first_text.contains("not_bonded"));
        assert!(!second_text.contains("cosmos_general_bonded_tokens"));
    }

    #[test]
    fn test_extend_and_lookup() {
        let mut set = MetricSet::new();
        set.describe("cosmos_validators_rank", "Rank");
        set.gauge("cosmos_validators_rank", &[("address", "a")], 1.0);

        let mut other = MetricSet::new();
        other.describe("cosmos_validators_rank", "Rank");
        other.gauge("cosmos_validators_rank", &[("address", "b")], 2.0);
        set.extend(other);

        assert_eq!(set.samples().len(), 2);
        assert_eq!(set.value("cosmos_validators_rank", &[("address", "b")]), Some(2.0));
        assert_eq!(set.value("cosmos_validators_rank", &[("address", "c")]), None);
        assert_eq!(set.descriptions.len(), 1);
    }
}
