use std::collections::BTreeMap;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::pool::PoolOptions;
use sqlx::PgPool;
use tracing::info;

use crate::types::metrics::unreachable_nodes;
use crate::types::{MetricKind, MetricPoint, MetricRow, RangeSelector, SummaryRecord};

/// Postgres-backed store for per-node summary records.
///
/// Writes are append-only; `recorded_at` is assigned by the database at
/// insert time. One collector instance is assumed to be the only writer.
pub struct MetricStore {
    pool: PgPool,
}

impl MetricStore {
    pub async fn new(url: &str, pool_size: Option<u32>) -> Result<Self> {
        let pool = PoolOptions::new()
            .max_connections(pool_size.unwrap_or(5))
            .connect(url)
            .await
            .context("Failed to establish database connection")?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("Failed to migrate the database")?;

        info!("Successfully created connection pool");

        Ok(MetricStore { pool })
    }

    pub fn get_pool(&self) -> &PgPool {
        &self.pool
    }

    /// Persist one cycle's staged records inside a single transaction; a
    /// failure leaves nothing from the batch behind.
    pub async fn insert_batch(&self, records: &[SummaryRecord]) -> Result<u64> {
        let query = "INSERT INTO node_metrics (node_address, cpu, memory, disk, network) \
                     VALUES ($1, $2, $3, $4, $5)";

        let mut transaction = self
            .pool
            .begin()
            .await
            .context("Failed to begin transaction")?;

        let mut rows_affected = 0;

        for record in records {
            rows_affected += sqlx::query(query)
                .bind(&record.node_address)
                .bind(record.cpu)
                .bind(record.memory)
                .bind(record.disk)
                .bind(record.network)
                .execute(&mut *transaction)
                .await
                .context("Failed to insert summary record")?
                .rows_affected();
        }

        transaction
            .commit()
            .await
            .context("Failed to commit transaction")?;

        info!("Persisted {rows_affected} summary records");

        Ok(rows_affected)
    }

    /// Values of one kind between `start` and `end`, ascending by timestamp.
    pub async fn find_range(
        &self,
        kind: MetricKind,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<(String, DateTime<Utc>, Option<f64>)>> {
        // column names follow kind.as_str(), so the query stays parameter-free
        let query = format!(
            "SELECT node_address, recorded_at, {} FROM node_metrics \
             WHERE recorded_at >= $1 AND recorded_at <= $2 \
             ORDER BY recorded_at ASC",
            kind.as_str()
        );

        sqlx::query_as(&query)
            .bind(start)
            .bind(end)
            .fetch_all(&self.pool)
            .await
            .context("Failed to query metric range")
    }

    /// Per-node ordered `{timestamp, value}` series for one kind over a
    /// trailing range, the shape the dashboard API serves.
    pub async fn series_by_node(
        &self,
        kind: MetricKind,
        range: RangeSelector,
    ) -> Result<BTreeMap<String, Vec<MetricPoint>>> {
        let end = Utc::now();
        let rows = self.find_range(kind, end - range.duration(), end).await?;

        let mut grouped: BTreeMap<String, Vec<MetricPoint>> = BTreeMap::new();
        for (node_address, timestamp, value) in rows {
            grouped
                .entry(node_address)
                .or_default()
                .push(MetricPoint { timestamp, value });
        }
        Ok(grouped)
    }

    /// Most recent record per node at or after `cutoff`.
    pub async fn latest_per_node(&self, cutoff: DateTime<Utc>) -> Result<Vec<MetricRow>> {
        sqlx::query_as(
            "SELECT DISTINCT ON (node_address) \
             recorded_at, node_address, cpu, memory, disk, network \
             FROM node_metrics WHERE recorded_at >= $1 \
             ORDER BY node_address, recorded_at DESC",
        )
        .bind(cutoff)
        .fetch_all(&self.pool)
        .await
        .context("Failed to query latest records per node")
    }

    /// Nodes whose latest record in the trailing window has no data at all.
    pub async fn unreachable_since(&self, cutoff: DateTime<Utc>) -> Result<Vec<String>> {
        let latest = self.latest_per_node(cutoff).await?;
        Ok(unreachable_nodes(&latest))
    }

    /// closes the connection pool
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Successfully closed connection pool");
    }
}
