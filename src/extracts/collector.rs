use tracing::{debug, warn};

use crate::extracts::agent::ChartSource;
use crate::extracts::normalize::normalize;
use crate::types::{MetricKind, SummaryRecord};

/// Runs one collection pass over the configured node list.
///
/// Nodes are processed sequentially in configuration order, and kinds in the
/// fixed `MetricKind::ALL` order, so a pass is deterministic. Per-pair fetch
/// failures become absent values; only the persistence layer downstream can
/// fail a cycle.
pub struct ClusterCollector {
    nodes: Vec<String>,
    lookback_seconds: i64,
}

impl ClusterCollector {
    pub fn new(nodes: Vec<String>, lookback_seconds: i64) -> Self {
        ClusterCollector {
            nodes,
            lookback_seconds,
        }
    }

    pub fn nodes(&self) -> &[String] {
        &self.nodes
    }

    /// Fetch and normalize every (node, kind) pair, returning the records
    /// worth persisting. A node whose every kind came back absent is
    /// dropped entirely.
    pub async fn collect_once<S: ChartSource + Sync>(&self, source: &S) -> Vec<SummaryRecord> {
        let mut staged = Vec::new();

        for node in &self.nodes {
            let mut record = SummaryRecord::new(node.clone());

            for kind in MetricKind::ALL {
                let value = match source
                    .fetch_chart(node, kind.chart(), self.lookback_seconds)
                    .await
                {
                    Ok(sample) => {
                        debug!(
                            node = node.as_str(),
                            kind = kind.as_str(),
                            points = sample.rows.len(),
                            "retrieved chart"
                        );
                        normalize(kind, &sample)
                    }
                    Err(err) => {
                        warn!(node = node.as_str(), kind = kind.as_str(), "{err}");
                        None
                    }
                };
                record.set(kind, value);
            }

            if record.is_empty() {
                warn!(node = node.as_str(), "no data from any chart, skipping node");
                continue;
            }
            staged.push(record);
        }

        staged
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use async_trait::async_trait;
    use reqwest::StatusCode;

    use super::*;
    use crate::extracts::agent::FetchError;
    use crate::types::ChartSample;

    /// Serves canned samples per (node, chart); anything else is a failed
    /// fetch.
    struct StubSource {
        samples: HashMap<(String, String), ChartSample>,
    }

    impl StubSource {
        fn new() -> Self {
            StubSource {
                samples: HashMap::new(),
            }
        }

        fn with_sample(mut self, node: &str, chart: &str, sample: ChartSample) -> Self {
            self.samples
                .insert((node.to_string(), chart.to_string()), sample);
            self
        }
    }

    #[async_trait]
    impl ChartSource for StubSource {
        async fn fetch_chart(
            &self,
            node: &str,
            chart: &str,
            _after: i64,
        ) -> Result<ChartSample, FetchError> {
            self.samples
                .get(&(node.to_string(), chart.to_string()))
                .cloned()
                .ok_or_else(|| FetchError::Status {
                    node: node.to_string(),
                    chart: chart.to_string(),
                    status: StatusCode::GATEWAY_TIMEOUT,
                })
        }
    }

    fn cpu_sample() -> ChartSample {
        ChartSample {
            rows: vec![vec![0.0, 10.0, 20.0], vec![1.0, 30.0, 40.0]],
            labels: vec!["user".to_string(), "system".to_string()],
        }
    }

    fn used_sample(values: &[f64]) -> ChartSample {
        ChartSample {
            rows: values
                .iter()
                .enumerate()
                .map(|(i, v)| vec![i as f64, *v])
                .collect(),
            labels: vec!["used".to_string()],
        }
    }

    #[tokio::test]
    async fn test_node_with_all_failures_is_dropped() {
        let collector = ClusterCollector::new(vec!["10.0.0.9".to_string()], -60);
        let records = collector.collect_once(&StubSource::new()).await;
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_partial_node_keeps_exactly_the_fetched_values() {
        let source = StubSource::new()
            .with_sample("10.0.0.1", "system.cpu", cpu_sample())
            .with_sample("10.0.0.1", "system.ram", used_sample(&[5.0, 7.0]));

        let collector = ClusterCollector::new(vec!["10.0.0.1".to_string()], -60);
        let records = collector.collect_once(&source).await;

        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.node_address, "10.0.0.1");
        assert_eq!(record.cpu, Some(50.0));
        assert_eq!(record.memory, Some(6.0));
        assert_eq!(record.disk, None);
        assert_eq!(record.network, None);
    }

    #[tokio::test]
    async fn test_label_mismatch_is_soft() {
        // memory chart answers but without a "used" dimension; the record
        // survives on the strength of the cpu value alone
        let free_only = ChartSample {
            rows: vec![vec![0.0, 9.0]],
            labels: vec!["free".to_string()],
        };
        let source = StubSource::new()
            .with_sample("10.0.0.1", "system.cpu", cpu_sample())
            .with_sample("10.0.0.1", "system.ram", free_only);

        let collector = ClusterCollector::new(vec!["10.0.0.1".to_string()], -60);
        let records = collector.collect_once(&source).await;

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].memory, None);
        assert_eq!(records[0].cpu, Some(50.0));
    }

    #[tokio::test]
    async fn test_records_follow_configuration_order() {
        let source = StubSource::new()
            .with_sample("node-b", "system.cpu", cpu_sample())
            .with_sample("node-a", "system.cpu", cpu_sample());

        let collector =
            ClusterCollector::new(vec!["node-b".to_string(), "node-a".to_string()], -60);
        let records = collector.collect_once(&source).await;

        let order: Vec<&str> = records.iter().map(|r| r.node_address.as_str()).collect();
        assert_eq!(order, vec!["node-b", "node-a"]);
    }
}
