// netsec-core/src/domain/project/configuration.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Parsed `pipeline.yaml`. Every stage config is derived from this tree.
#[derive(Debug, Deserialize, Serialize, Clone, Validate)]
pub struct PipelineSettings {
    #[validate(length(min = 1))]
    pub name: String,

    #[serde(default = "default_version")]
    pub version: String,

    #[serde(rename = "artifact-dir", default = "default_artifact_dir")]
    #[validate(length(min = 1))]
    pub artifact_dir: String,

    #[serde(rename = "schema-path", default = "default_schema_path")]
    pub schema_path: String,

    #[serde(rename = "target-column", default = "default_target_column")]
    #[validate(length(min = 1))]
    pub target_column: String,

    #[serde(default)]
    #[validate(nested)]
    pub ingestion: IngestionSettings,

    #[serde(default)]
    #[validate(nested)]
    pub validation: ValidationSettings,

    #[serde(default)]
    #[validate(nested)]
    pub transformation: TransformationSettings,

    #[serde(default)]
    #[validate(nested)]
    pub trainer: TrainerSettings,
}

#[derive(Debug, Deserialize, Serialize, Clone, Validate)]
#[serde(rename_all = "kebab-case", default)]
pub struct IngestionSettings {
    #[serde(rename = "database")]
    #[validate(length(min = 1))]
    pub database_name: String,

    #[serde(rename = "collection")]
    #[validate(length(min = 1))]
    pub collection_name: String,

    // Normally layered in from MONGO_DB_URL; never written back to disk.
    #[serde(skip_serializing)]
    pub database_url: Option<String>,

    pub feature_store_file: String,
    pub train_file: String,
    pub test_file: String,

    #[validate(range(exclusive_min = 0.0, exclusive_max = 1.0))]
    pub train_test_split_ratio: f64,

    pub random_seed: u64,
}

impl Default for IngestionSettings {
    fn default() -> Self {
        Self {
            database_name: "KRISHAI".to_string(),
            collection_name: "NetworkData".to_string(),
            database_url: None,
            feature_store_file: "phisingData.csv".to_string(),
            train_file: "train.csv".to_string(),
            test_file: "test.csv".to_string(),
            train_test_split_ratio: 0.2,
            random_seed: 42,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Validate)]
#[serde(rename_all = "kebab-case", default)]
pub struct ValidationSettings {
    /// p-value below which a column is reported as drifted.
    #[validate(range(exclusive_min = 0.0, exclusive_max = 1.0))]
    pub drift_threshold: f64,
    pub report_file: String,
}

impl Default for ValidationSettings {
    fn default() -> Self {
        Self {
            drift_threshold: 0.05,
            report_file: "report.yaml".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ImputerWeights {
    #[default]
    Uniform,
    Distance,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Validate)]
#[serde(rename_all = "kebab-case", default)]
pub struct ImputerSettings {
    #[validate(range(min = 1))]
    pub n_neighbors: usize,
    pub weights: ImputerWeights,
}

impl Default for ImputerSettings {
    fn default() -> Self {
        Self {
            n_neighbors: 3,
            weights: ImputerWeights::Uniform,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Validate, Default)]
#[serde(rename_all = "kebab-case", default)]
pub struct TransformationSettings {
    #[validate(nested)]
    pub imputer: ImputerSettings,
}

#[derive(Debug, Deserialize, Serialize, Clone, Validate)]
#[serde(rename_all = "kebab-case", default)]
pub struct TrainerSettings {
    #[validate(range(min = 0.0, max = 1.0))]
    pub expected_score: f64,

    #[validate(range(min = 0.0, max = 1.0))]
    pub overfitting_threshold: Option<f64>,

    #[validate(range(exclusive_min = 0.0))]
    pub learning_rate: f64,

    #[validate(range(min = 1))]
    pub max_iterations: usize,

    #[validate(range(exclusive_min = 0.0))]
    pub tolerance: f64,

    #[validate(range(min = 0.0))]
    pub l2_penalty: f64,
}

impl Default for TrainerSettings {
    fn default() -> Self {
        Self {
            expected_score: 0.6,
            overfitting_threshold: None,
            learning_rate: 0.1,
            max_iterations: 1000,
            tolerance: 1e-6,
            l2_penalty: 0.0,
        }
    }
}

fn default_version() -> String {
    "0.1.0".to_string()
}
fn default_artifact_dir() -> String {
    "Artifacts".to_string()
}
fn default_schema_path() -> String {
    "data_schema/schema.yaml".to_string()
}
fn default_target_column() -> String {
    "Result".to_string()
}
