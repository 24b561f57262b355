use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The resource kinds tracked per node. Each maps to one chart on the remote
/// agent and one extraction rule (see `extracts::normalize`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricKind {
    Cpu,
    Memory,
    Disk,
    Network,
}

impl MetricKind {
    /// Fixed iteration order for a collection pass.
    pub const ALL: [MetricKind; 4] = [
        MetricKind::Cpu,
        MetricKind::Memory,
        MetricKind::Disk,
        MetricKind::Network,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKind::Cpu => "cpu",
            MetricKind::Memory => "memory",
            MetricKind::Disk => "disk",
            MetricKind::Network => "network",
        }
    }

    /// Chart name on the remote agent.
    pub fn chart(&self) -> &'static str {
        match self {
            MetricKind::Cpu => "system.cpu",
            MetricKind::Memory => "system.ram",
            MetricKind::Disk => "disk_space./",
            MetricKind::Network => "system.net",
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown metric kind: {0}")]
pub struct ParseMetricKindError(String);

impl FromStr for MetricKind {
    type Err = ParseMetricKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cpu" => Ok(MetricKind::Cpu),
            "memory" => Ok(MetricKind::Memory),
            "disk" => Ok(MetricKind::Disk),
            "network" => Ok(MetricKind::Network),
            other => Err(ParseMetricKindError(other.to_string())),
        }
    }
}

impl std::fmt::Display for MetricKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One per-node snapshot assembled during a collection pass. The run
/// timestamp is assigned by the database at insert time, so the in-memory
/// record carries none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRecord {
    pub node_address: String,
    pub cpu: Option<f64>,
    pub memory: Option<f64>,
    pub disk: Option<f64>,
    pub network: Option<f64>,
}

impl SummaryRecord {
    pub fn new(node_address: impl Into<String>) -> Self {
        SummaryRecord {
            node_address: node_address.into(),
            cpu: None,
            memory: None,
            disk: None,
            network: None,
        }
    }

    pub fn set(&mut self, kind: MetricKind, value: Option<f64>) {
        match kind {
            MetricKind::Cpu => self.cpu = value,
            MetricKind::Memory => self.memory = value,
            MetricKind::Disk => self.disk = value,
            MetricKind::Network => self.network = value,
        }
    }

    pub fn get(&self, kind: MetricKind) -> Option<f64> {
        match kind {
            MetricKind::Cpu => self.cpu,
            MetricKind::Memory => self.memory,
            MetricKind::Disk => self.disk,
            MetricKind::Network => self.network,
        }
    }

    /// True when every tracked kind is absent; such records are dropped
    /// before persistence.
    pub fn is_empty(&self) -> bool {
        MetricKind::ALL.iter().all(|kind| self.get(*kind).is_none())
    }
}

/// A persisted summary as read back from the store.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct MetricRow {
    pub recorded_at: DateTime<Utc>,
    pub node_address: String,
    pub cpu: Option<f64>,
    pub memory: Option<f64>,
    pub disk: Option<f64>,
    pub network: Option<f64>,
}

impl MetricRow {
    pub fn get(&self, kind: MetricKind) -> Option<f64> {
        match kind {
            MetricKind::Cpu => self.cpu,
            MetricKind::Memory => self.memory,
            MetricKind::Disk => self.disk,
            MetricKind::Network => self.network,
        }
    }
}

/// One point in a per-node series returned by range queries. An absent value
/// serializes as `null`, never as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricPoint {
    pub timestamp: DateTime<Utc>,
    pub value: Option<f64>,
}

/// Nodes whose most recent record has every value absent. Pure so the
/// dashboard-facing reachability flag is testable without a store.
pub fn unreachable_nodes(latest: &[MetricRow]) -> Vec<String> {
    latest
        .iter()
        .filter(|row| MetricKind::ALL.iter().all(|kind| row.get(*kind).is_none()))
        .map(|row| row.node_address.clone())
        .collect()
}
