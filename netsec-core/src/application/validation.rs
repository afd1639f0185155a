// netsec-core/src/application/validation.rs

use std::path::Path;

use tracing::{info, instrument, warn};

use crate::application::contract::publish;
use crate::application::error::ValidationError;
use crate::domain::drift::{DriftReport, KsTest};
use crate::domain::entity::{DataIngestionArtifact, DataValidationArtifact, DataValidationConfig};
use crate::infrastructure::adapters::DataFrame;
use crate::infrastructure::fs::copy_atomic;
use crate::infrastructure::yaml::write_yaml_file;

/// Checks the ingested splits against the declared schema and compares their
/// distributions column by column.
pub struct DataValidation {
    ingestion_artifact: DataIngestionArtifact,
    config: DataValidationConfig,
}

impl DataValidation {
    pub fn new(ingestion_artifact: DataIngestionArtifact, config: DataValidationConfig) -> Self {
        Self {
            ingestion_artifact,
            config,
        }
    }

    pub fn config(&self) -> &DataValidationConfig {
        &self.config
    }

    pub fn read_data(path: &Path) -> Result<DataFrame, ValidationError> {
        Ok(DataFrame::read_csv(path)?)
    }

    /// Column count and names must match the schema exactly (order is free).
    pub fn validate_number_of_columns(
        &self,
        frame: &DataFrame,
        split: &'static str,
    ) -> Result<(), ValidationError> {
        let actual = frame.columns()?;
        let expected = self.config.schema.columns.len();
        info!(split, expected, actual = actual.len(), "Checking column layout");

        let (missing, unexpected) = self.config.schema.diff(&actual);
        if missing.is_empty() && unexpected.is_empty() {
            return Ok(());
        }
        Err(ValidationError::SchemaMismatch {
            split,
            missing,
            unexpected,
        })
    }

    /// Two-sample KS test per drift column; the report is rewritten every run.
    pub fn detect_dataset_drift(
        &self,
        base: &DataFrame,
        current: &DataFrame,
    ) -> Result<DriftReport, ValidationError> {
        let mut report = DriftReport::default();
        for column in self.config.schema.drift_columns() {
            let d1 = present_values(base, column)?;
            let d2 = present_values(current, column)?;
            if d1.is_empty() || d2.is_empty() {
                warn!(
                    column,
                    base = d1.len(),
                    current = d2.len(),
                    "Column has no values in one split; marking it as drifted"
                );
                report.record_untestable(column);
                continue;
            }
            let outcome = KsTest::two_sample(&d1, &d2)?;
            let verdict = report.record(column, outcome.p_value, self.config.drift_threshold);
            if verdict.drift_status {
                warn!(column, p_value = outcome.p_value, "Drift detected");
            }
        }

        write_yaml_file(&self.config.drift_report_file_path, &report, true)?;
        Ok(report)
    }

    #[instrument(skip(self), fields(dir = ?self.config.data_validation_dir))]
    pub fn initiate_data_validation(&self) -> Result<DataValidationArtifact, ValidationError> {
        let train_path = &self.ingestion_artifact.trained_file_path;
        let test_path = &self.ingestion_artifact.test_file_path;

        let train = Self::read_data(train_path)?;
        let test = Self::read_data(test_path)?;

        self.validate_number_of_columns(&train, "train")?;
        self.validate_number_of_columns(&test, "test")?;

        if train.height()? == 0 {
            return Err(ValidationError::EmptySplit {
                split: "train",
                path: train_path.clone(),
            });
        }
        if test.height()? == 0 {
            return Err(ValidationError::EmptySplit {
                split: "test",
                path: test_path.clone(),
            });
        }

        let report = self.detect_dataset_drift(&train, &test)?;
        let validation_status = !report.drift_found();
        if !validation_status {
            // Drift is reported, not enforced: the run goes on.
            warn!(
                columns = ?report.drifted_columns(),
                "Dataset drift found; continuing with validation_status = false"
            );
        }

        copy_atomic(train_path, &self.config.valid_train_file_path)?;
        copy_atomic(test_path, &self.config.valid_test_file_path)?;

        let (invalid_train_file_path, invalid_test_file_path) = if validation_status {
            (None, None)
        } else {
            copy_atomic(train_path, &self.config.invalid_train_file_path)?;
            copy_atomic(test_path, &self.config.invalid_test_file_path)?;
            (
                Some(self.config.invalid_train_file_path.clone()),
                Some(self.config.invalid_test_file_path.clone()),
            )
        };

        let artifact = DataValidationArtifact {
            validation_status,
            valid_train_file_path: self.config.valid_train_file_path.clone(),
            valid_test_file_path: self.config.valid_test_file_path.clone(),
            invalid_train_file_path,
            invalid_test_file_path,
            drift_report_file_path: self.config.drift_report_file_path.clone(),
        };
        publish(artifact, &self.config.contract_path())
    }
}

fn present_values(frame: &DataFrame, column: &str) -> Result<Vec<f64>, ValidationError> {
    Ok(frame.column_f64(column)?.into_iter().flatten().collect())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::application::ingestion::DataIngestion;
    use crate::application::testing::{
        MockStore, phishing_documents, root, schema, settings,
    };
    use crate::domain::drift::ColumnDrift;
    use crate::domain::entity::DataIngestionConfig;
    use crate::infrastructure::yaml::read_yaml_file;
    use anyhow::Result;
    use std::collections::BTreeMap;
    use std::fs;
    use tempfile::tempdir;

    async fn ingest(dir: &Path, n: usize) -> Result<DataIngestionArtifact> {
        let store = MockStore::with_documents(phishing_documents(n));
        let config = DataIngestionConfig::new(&root(dir), &settings());
        Ok(DataIngestion::new(config, &store)
            .initiate_data_ingestion()
            .await?)
    }

    fn validation(dir: &Path, artifact: DataIngestionArtifact) -> DataValidation {
        let config = DataValidationConfig::new(&root(dir), &settings(), schema());
        DataValidation::new(artifact, config)
    }

    #[tokio::test]
    async fn test_valid_splits_are_copied_and_reported() -> Result<()> {
        let dir = tempdir()?;
        let ingested = ingest(dir.path(), 60).await?;
        let stage = validation(dir.path(), ingested.clone());

        let artifact = stage.initiate_data_validation()?;

        assert_eq!(
            fs::read_to_string(&artifact.valid_train_file_path)?,
            fs::read_to_string(&ingested.trained_file_path)?
        );
        let report: BTreeMap<String, ColumnDrift> =
            read_yaml_file(&artifact.drift_report_file_path)?;
        assert_eq!(report.len(), 6);
        assert_eq!(
            artifact.validation_status,
            report.values().all(|d| !d.drift_status)
        );
        assert!(stage.config().contract_path().exists());
        Ok(())
    }

    #[tokio::test]
    async fn test_schema_mismatch_halts() -> Result<()> {
        let dir = tempdir()?;
        let ingested = ingest(dir.path(), 30).await?;
        let mut schema = schema();
        schema.columns.pop();
        let config = DataValidationConfig::new(&root(dir.path()), &settings(), schema);
        let stage = DataValidation::new(ingested, config);

        match stage.initiate_data_validation() {
            Err(ValidationError::SchemaMismatch {
                split, unexpected, ..
            }) => {
                assert_eq!(split, "train");
                assert_eq!(unexpected, vec!["Result".to_string()]);
            }
            other => panic!("expected schema mismatch, got {other:?}"),
        }
        assert!(!stage.config().valid_data_dir.exists());
        Ok(())
    }

    #[tokio::test]
    async fn test_empty_collection_fails_on_schema() -> Result<()> {
        let dir = tempdir()?;
        let ingested = ingest(dir.path(), 0).await?;
        let stage = validation(dir.path(), ingested);
        assert!(matches!(
            stage.initiate_data_validation(),
            Err(ValidationError::SchemaMismatch { .. })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_single_row_collection_has_empty_train_split() -> Result<()> {
        let dir = tempdir()?;
        let ingested = ingest(dir.path(), 1).await?;
        let stage = validation(dir.path(), ingested);
        assert!(matches!(
            stage.initiate_data_validation(),
            Err(ValidationError::EmptySplit { split: "train", .. })
        ));
        Ok(())
    }

    #[test]
    fn test_column_missing_from_one_split_is_reported_as_drift() -> Result<()> {
        let dir = tempdir()?;
        let train_path = dir.path().join("train.csv");
        let test_path = dir.path().join("test.csv");
        let header = "having_IP_Address,URL_Length,SSLfinal_State,Domain_registeration_length,Request_URL,web_traffic,Result\n";
        let mut train = header.to_string();
        let mut test = header.to_string();
        for i in 0..30 {
            let v = i % 3 - 1;
            train.push_str(&format!("{v},{v},{v},{v},{v},{v},1\n"));
            test.push_str(&format!("{v},{v},,{v},{v},{v},-1\n"));
        }
        fs::write(&train_path, train)?;
        fs::write(&test_path, test)?;

        let stage = validation(
            dir.path(),
            DataIngestionArtifact {
                trained_file_path: train_path,
                test_file_path: test_path,
            },
        );
        let artifact = stage.initiate_data_validation()?;

        assert!(!artifact.validation_status);
        let report: BTreeMap<String, ColumnDrift> =
            read_yaml_file(&artifact.drift_report_file_path)?;
        assert!(report["SSLfinal_State"].drift_status);
        assert!(report["SSLfinal_State"].p_value.is_nan());
        assert!(!report["URL_Length"].drift_status);
        Ok(())
    }

    #[test]
    fn test_shifted_distribution_is_flagged() -> Result<()> {
        let dir = tempdir()?;
        let train_path = dir.path().join("train.csv");
        let test_path = dir.path().join("test.csv");
        let header = "having_IP_Address,URL_Length,SSLfinal_State,Domain_registeration_length,Request_URL,web_traffic,Result\n";
        let mut train = header.to_string();
        let mut test = header.to_string();
        for i in 0..40 {
            let v = i % 3 - 1;
            train.push_str(&format!("-1,{v},{v},{v},{v},{v},-1\n"));
            test.push_str(&format!("1,{v},{v},{v},{v},{v},1\n"));
        }
        fs::write(&train_path, train)?;
        fs::write(&test_path, test)?;

        let stage = validation(
            dir.path(),
            DataIngestionArtifact {
                trained_file_path: train_path,
                test_file_path: test_path,
            },
        );
        let artifact = stage.initiate_data_validation()?;

        assert!(!artifact.validation_status);
        assert!(artifact.invalid_train_file_path.as_ref().unwrap().exists());
        let report: BTreeMap<String, ColumnDrift> =
            read_yaml_file(&artifact.drift_report_file_path)?;
        assert!(report["having_IP_Address"].drift_status);
        assert!(!report["URL_Length"].drift_status);
        Ok(())
    }
}
