/// lib.rs
//
pub mod cli;
pub mod client;
pub mod config_manager;
pub mod exporters;
pub mod extracts;
pub mod tracing;
pub mod types;

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::client::MonitorClient;
use crate::config_manager::Config;
use crate::exporters::MetricStore;
use crate::types::{MetricKind, RangeSelector};

#[tokio::main]
pub async fn run(config: Config) -> Result<()> {
    let store = Arc::new(MetricStore::new(&config.db_url, None).await?);

    let client =
        MonitorClient::new(&config, store).context("Failed to create MonitorClient")?;

    client.run().await
}

#[tokio::main]
pub async fn run_once(config: Config) -> Result<()> {
    let store = Arc::new(MetricStore::new(&config.db_url, Some(1)).await?);

    let client =
        MonitorClient::new(&config, store.clone()).context("Failed to create MonitorClient")?;

    let persisted = client.run_cycle().await?;
    println!("{persisted} records persisted");

    store.close().await;
    Ok(())
}

#[tokio::main]
pub async fn query(config: Config, kind: MetricKind, range: RangeSelector) -> Result<()> {
    let store = MetricStore::new(&config.db_url, Some(1)).await?;

    let series = store.series_by_node(kind, range).await?;
    println!("{}", serde_json::to_string_pretty(&series)?);

    store.close().await;
    Ok(())
}

#[tokio::main]
pub async fn status(config: Config) -> Result<()> {
    let store = MetricStore::new(&config.db_url, Some(1)).await?;

    let cutoff = chrono::Utc::now() - RangeSelector::OneHour.duration();
    let unreachable = store.unreachable_since(cutoff).await?;

    if unreachable.is_empty() {
        println!("all nodes reported data within the last hour");
    } else {
        for node in unreachable {
            println!("{node}");
        }
    }

    store.close().await;
    Ok(())
}
