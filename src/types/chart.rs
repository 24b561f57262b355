use serde::Deserialize;
use serde_json::Value;

/// Wire shape of the agent's `/api/v1/data` response.
#[derive(Debug, Default, Deserialize)]
pub struct ChartResponse {
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub data: Vec<Vec<Value>>,
}

/// One fetched chart: raw rows (timestamp in column 0) and dimension labels
/// with the leading timestamp label stripped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartSample {
    pub rows: Vec<Vec<f64>>,
    pub labels: Vec<String>,
}

impl From<ChartResponse> for ChartSample {
    fn from(response: ChartResponse) -> Self {
        let mut labels = response.labels;
        if !labels.is_empty() {
            // labels[0] is the "time" column
            labels.remove(0);
        }

        // Rows with non-numeric cells are dropped individually rather than
        // failing the whole sample.
        let rows = response
            .data
            .into_iter()
            .filter_map(|row| row.iter().map(Value::as_f64).collect::<Option<Vec<f64>>>())
            .collect();

        ChartSample { rows, labels }
    }
}

impl ChartSample {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> ChartSample {
        let response: ChartResponse = serde_json::from_value(value).unwrap();
        response.into()
    }

    #[test]
    fn test_strips_timestamp_label() {
        let sample = parse(json!({
            "labels": ["time", "used", "free"],
            "data": [[1712000000, 5.0, 10.0]]
        }));
        assert_eq!(sample.labels, vec!["used", "free"]);
        assert_eq!(sample.rows, vec![vec![1712000000.0, 5.0, 10.0]]);
    }

    #[test]
    fn test_malformed_rows_are_skipped() {
        let sample = parse(json!({
            "labels": ["time", "used"],
            "data": [[1712000000, 5.0], [1712000001, null], [1712000002, 7.0]]
        }));
        assert_eq!(
            sample.rows,
            vec![vec![1712000000.0, 5.0], vec![1712000002.0, 7.0]]
        );
    }

    #[test]
    fn test_missing_fields_yield_empty_sample() {
        let sample = parse(json!({}));
        assert!(sample.is_empty());
        assert!(sample.labels.is_empty());
    }
}
