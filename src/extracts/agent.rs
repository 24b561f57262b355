use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use url::Url;

use crate::types::chart::{ChartResponse, ChartSample};

/// Failure of a single (node, chart) fetch. Never fatal to a collection
/// pass; the caller records the pair as absent and moves on.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("invalid agent URL for node {node}: {source}")]
    Url {
        node: String,
        #[source]
        source: url::ParseError,
    },
    #[error("request to {node} for chart {chart} failed: {source}")]
    Transport {
        node: String,
        chart: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("agent on {node} returned {status} for chart {chart}")]
    Status {
        node: String,
        chart: String,
        status: StatusCode,
    },
    #[error("could not decode chart payload from {node} for chart {chart}: {source}")]
    Decode {
        node: String,
        chart: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Source of chart samples, one per (node, chart) pair. The collection cycle
/// is written against this seam so it can run without a network.
#[async_trait]
pub trait ChartSource {
    async fn fetch_chart(
        &self,
        node: &str,
        chart: &str,
        after: i64,
    ) -> Result<ChartSample, FetchError>;
}

/// HTTP client for Netdata-compatible agent query endpoints.
pub struct AgentClient {
    http: reqwest::Client,
    port: u16,
}

impl AgentClient {
    pub fn new(port: u16, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(AgentClient { http, port })
    }
}

/// Query-pair serialization percent-encodes the chart name; the agent API is
/// sensitive to characters such as `/` in `disk_space./`.
fn data_url(node: &str, port: u16, chart: &str, after: i64) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(&format!("http://{node}:{port}/api/v1/data"))?;
    url.query_pairs_mut()
        .append_pair("chart", chart)
        .append_pair("after", &after.to_string())
        .append_pair("format", "json");
    Ok(url)
}

#[async_trait]
impl ChartSource for AgentClient {
    async fn fetch_chart(
        &self,
        node: &str,
        chart: &str,
        after: i64,
    ) -> Result<ChartSample, FetchError> {
        let url = data_url(node, self.port, chart, after).map_err(|source| FetchError::Url {
            node: node.to_string(),
            source,
        })?;

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                node: node.to_string(),
                chart: chart.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                node: node.to_string(),
                chart: chart.to_string(),
                status,
            });
        }

        let payload: ChartResponse =
            response.json().await.map_err(|source| FetchError::Decode {
                node: node.to_string(),
                chart: chart.to_string(),
                source,
            })?;

        Ok(payload.into())
    }
}
