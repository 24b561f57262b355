// src/client.rs
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::time::sleep;
use tracing::info;

use crate::config_manager::Config;
use crate::exporters::MetricStore;
use crate::extracts::agent::AgentClient;
use crate::extracts::collector::ClusterCollector;

/// Owns the agent client, the collector and the store, and drives collection
/// cycles either once or on a fixed interval.
pub struct MonitorClient {
    interval: Duration,
    collector: ClusterCollector,
    agent: AgentClient,
    store: Arc<MetricStore>,
}

impl MonitorClient {
    pub fn new(config: &Config, store: Arc<MetricStore>) -> Result<MonitorClient> {
        let agent = AgentClient::new(
            config.agent_port,
            Duration::from_millis(config.fetch_timeout_ms),
        )?;

        Ok(MonitorClient {
            interval: Duration::from_millis(config.poll_interval_ms),
            collector: ClusterCollector::new(config.nodes.clone(), config.lookback_seconds),
            agent,
            store,
        })
    }

    /// One collection cycle: poll every configured node, then commit the
    /// staged records as a single batch. Per-node failures are absorbed by
    /// the collector; only a persistence failure escapes.
    pub async fn run_cycle(&self) -> Result<usize> {
        info!(
            "Logging system metrics for {} nodes...",
            self.collector.nodes().len()
        );

        let records = self.collector.collect_once(&self.agent).await;

        if records.is_empty() {
            info!("No node produced data this cycle, nothing to persist");
            return Ok(0);
        }

        self.store
            .insert_batch(&records)
            .await
            .context("Failed to persist collection cycle")?;

        Ok(records.len())
    }

    /// Cycle on the configured interval until ctrl-c. A store failure ends
    /// the loop; fetch failures never do.
    pub async fn run(self) -> Result<()> {
        loop {
            let persisted = self.run_cycle().await?;
            info!("Cycle complete, {persisted} records persisted");

            tokio::select! {
                _ = sleep(self.interval) => {}
                _ = tokio::signal::ctrl_c() => {
                    info!("Received ctrl-c, shutting down");
                    break;
                }
            }
        }

        self.store.close().await;
        Ok(())
    }
}
