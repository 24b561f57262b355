use tracing::debug;

use crate::types::{ChartSample, MetricKind};

const USED_DIMENSION: &str = "used";

/// Reduce one chart sample to a single scalar for the given kind.
///
/// Stateful kinds (memory, disk) average the `"used"` dimension column; rate
/// kinds (cpu, network) average the per-row sum of all non-timestamp
/// columns. An empty result is `None`, never zero, and malformed rows are
/// skipped rather than errored.
pub fn normalize(kind: MetricKind, sample: &ChartSample) -> Option<f64> {
    match kind {
        MetricKind::Memory | MetricKind::Disk => used_dimension_average(kind, sample),
        MetricKind::Cpu | MetricKind::Network => row_sum_average(sample),
    }
}

fn used_dimension_average(kind: MetricKind, sample: &ChartSample) -> Option<f64> {
    let Some(index) = sample.labels.iter().position(|label| label == USED_DIMENSION) else {
        debug!(
            kind = kind.as_str(),
            labels = ?sample.labels,
            "chart sample has no {USED_DIMENSION:?} dimension"
        );
        return None;
    };

    // column 0 is the timestamp, so dimension i lives at column i + 1
    let values: Vec<f64> = sample
        .rows
        .iter()
        .filter(|row| row.len() > index + 1)
        .map(|row| row[index + 1])
        .collect();

    mean(&values)
}

fn row_sum_average(sample: &ChartSample) -> Option<f64> {
    let sums: Vec<f64> = sample
        .rows
        .iter()
        .filter(|row| row.len() > 1)
        .map(|row| row[1..].iter().sum())
        .collect();

    mean(&sums)
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}
