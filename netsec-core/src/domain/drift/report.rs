// netsec-core/src/domain/drift/report.rs

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Per-column drift verdict, serialized as `report.yaml`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColumnDrift {
    pub p_value: f64,
    pub drift_status: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DriftReport {
    pub columns: BTreeMap<String, ColumnDrift>,
}

impl DriftReport {
    /// Records a column; drift means the p-value fell below `threshold`.
    pub fn record(&mut self, column: &str, p_value: f64, threshold: f64) -> ColumnDrift {
        let verdict = ColumnDrift {
            p_value,
            drift_status: p_value < threshold,
        };
        self.columns.insert(column.to_string(), verdict);
        verdict
    }

    /// Records a column that has no values in one of the samples. There is
    /// nothing to compare, so it counts as drifted with a NaN p-value.
    pub fn record_untestable(&mut self, column: &str) -> ColumnDrift {
        let verdict = ColumnDrift {
            p_value: f64::NAN,
            drift_status: true,
        };
        self.columns.insert(column.to_string(), verdict);
        verdict
    }

    pub fn drifted_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|(_, d)| d.drift_status)
            .map(|(name, _)| name.as_str())
            .collect()
    }

    pub fn drift_found(&self) -> bool {
        self.columns.values().any(|d| d.drift_status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_is_exclusive() {
        let mut report = DriftReport::default();
        assert!(!report.record("a", 0.05, 0.05).drift_status);
        assert!(report.record("b", 0.049, 0.05).drift_status);
        assert_eq!(report.drifted_columns(), vec!["b"]);
        assert!(report.drift_found());
    }

    #[test]
    fn test_untestable_column_counts_as_drift() -> anyhow::Result<()> {
        let mut report = DriftReport::default();
        report.record("a", 0.9, 0.05);
        assert!(report.record_untestable("b").drift_status);
        assert_eq!(report.drifted_columns(), vec!["b"]);

        let yaml = serde_yaml::to_string(&report)?;
        let back: BTreeMap<String, ColumnDrift> = serde_yaml::from_str(&yaml)?;
        assert!(back["b"].p_value.is_nan());
        assert!(back["b"].drift_status);
        Ok(())
    }

    #[test]
    fn test_report_serializes_as_flat_mapping() -> anyhow::Result<()> {
        let mut report = DriftReport::default();
        report.record("URL_Length", 0.5, 0.05);
        let yaml = serde_yaml::to_string(&report)?;
        assert!(yaml.starts_with("URL_Length:"));
        assert!(yaml.contains("drift_status: false"));
        Ok(())
    }
}
