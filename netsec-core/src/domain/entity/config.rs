// netsec-core/src/domain/entity/config.rs
//
// Immutable per-stage configuration, derived once from the run root and the
// parsed settings tree.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::domain::error::Stage;
use crate::domain::project::{DataSchema, ImputerSettings, PipelineSettings};

pub const TIMESTAMP_FORMAT: &str = "%m_%d_%Y_%H_%M_%S";
pub const ARTIFACT_CONTRACT_FILE: &str = "artifact.json";
pub const RUN_RESULTS_FILE: &str = "run_results.json";

/// Root of a single training run: `<project>/<artifact-dir>/<timestamp>`.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingPipelineConfig {
    pub pipeline_name: String,
    pub timestamp: String,
    pub artifact_dir: PathBuf,
}

impl TrainingPipelineConfig {
    pub fn new(project_dir: &Path, settings: &PipelineSettings, now: DateTime<Local>) -> Self {
        let timestamp = now.format(TIMESTAMP_FORMAT).to_string();
        Self {
            pipeline_name: settings.name.clone(),
            artifact_dir: project_dir.join(&settings.artifact_dir).join(&timestamp),
            timestamp,
        }
    }

    pub fn stage_dir(&self, stage: Stage) -> PathBuf {
        self.artifact_dir.join(stage.dir_name())
    }

    pub fn run_results_path(&self) -> PathBuf {
        self.artifact_dir.join(RUN_RESULTS_FILE)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DataIngestionConfig {
    pub data_ingestion_dir: PathBuf,
    pub feature_store_file_path: PathBuf,
    pub training_file_path: PathBuf,
    pub testing_file_path: PathBuf,
    pub train_test_split_ratio: f64,
    pub random_seed: u64,
    pub database_name: String,
    pub collection_name: String,
    pub connection_string: Option<String>,
}

impl DataIngestionConfig {
    pub fn new(root: &TrainingPipelineConfig, settings: &PipelineSettings) -> Self {
        let ingestion = &settings.ingestion;
        let dir = root.stage_dir(Stage::Ingestion);
        Self {
            feature_store_file_path: dir
                .join("feature_store")
                .join(&ingestion.feature_store_file),
            training_file_path: dir.join("ingested").join(&ingestion.train_file),
            testing_file_path: dir.join("ingested").join(&ingestion.test_file),
            data_ingestion_dir: dir,
            train_test_split_ratio: ingestion.train_test_split_ratio,
            random_seed: ingestion.random_seed,
            database_name: ingestion.database_name.clone(),
            collection_name: ingestion.collection_name.clone(),
            connection_string: ingestion.database_url.clone(),
        }
    }

    pub fn contract_path(&self) -> PathBuf {
        self.data_ingestion_dir.join(ARTIFACT_CONTRACT_FILE)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DataValidationConfig {
    pub data_validation_dir: PathBuf,
    pub valid_data_dir: PathBuf,
    pub invalid_data_dir: PathBuf,
    pub valid_train_file_path: PathBuf,
    pub valid_test_file_path: PathBuf,
    pub invalid_train_file_path: PathBuf,
    pub invalid_test_file_path: PathBuf,
    pub drift_report_file_path: PathBuf,
    pub drift_threshold: f64,
    pub schema: DataSchema,
}

impl DataValidationConfig {
    pub fn new(
        root: &TrainingPipelineConfig,
        settings: &PipelineSettings,
        schema: DataSchema,
    ) -> Self {
        let ingestion = &settings.ingestion;
        let dir = root.stage_dir(Stage::Validation);
        let valid_data_dir = dir.join("validated");
        let invalid_data_dir = dir.join("invalid");
        Self {
            valid_train_file_path: valid_data_dir.join(&ingestion.train_file),
            valid_test_file_path: valid_data_dir.join(&ingestion.test_file),
            invalid_train_file_path: invalid_data_dir.join(&ingestion.train_file),
            invalid_test_file_path: invalid_data_dir.join(&ingestion.test_file),
            drift_report_file_path: dir
                .join("drift_report")
                .join(&settings.validation.report_file),
            valid_data_dir,
            invalid_data_dir,
            data_validation_dir: dir,
            drift_threshold: settings.validation.drift_threshold,
            schema,
        }
    }

    pub fn contract_path(&self) -> PathBuf {
        self.data_validation_dir.join(ARTIFACT_CONTRACT_FILE)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DataTransformationConfig {
    pub data_transformation_dir: PathBuf,
    pub transformed_train_file_path: PathBuf,
    pub transformed_test_file_path: PathBuf,
    pub transformed_object_file_path: PathBuf,
    pub target_column: String,
    pub imputer: ImputerSettings,
}

impl DataTransformationConfig {
    pub fn new(root: &TrainingPipelineConfig, settings: &PipelineSettings) -> Self {
        let dir = root.stage_dir(Stage::Transformation);
        let transformed = dir.join("transformed");
        Self {
            transformed_train_file_path: transformed.join("train.npy"),
            transformed_test_file_path: transformed.join("test.npy"),
            transformed_object_file_path: dir
                .join("transformed_object")
                .join("preprocessing.json"),
            data_transformation_dir: dir,
            target_column: settings.target_column.clone(),
            imputer: settings.transformation.imputer.clone(),
        }
    }

    pub fn contract_path(&self) -> PathBuf {
        self.data_transformation_dir.join(ARTIFACT_CONTRACT_FILE)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModelTrainerConfig {
    pub model_trainer_dir: PathBuf,
    pub trained_model_file_path: PathBuf,
    pub expected_score: f64,
    pub overfitting_threshold: Option<f64>,
    pub learning_rate: f64,
    pub max_iterations: usize,
    pub tolerance: f64,
    pub l2_penalty: f64,
}

impl ModelTrainerConfig {
    pub fn new(root: &TrainingPipelineConfig, settings: &PipelineSettings) -> Self {
        let trainer = &settings.trainer;
        let dir = root.stage_dir(Stage::Training);
        Self {
            trained_model_file_path: dir.join("trained_model").join("model.json"),
            model_trainer_dir: dir,
            expected_score: trainer.expected_score,
            overfitting_threshold: trainer.overfitting_threshold,
            learning_rate: trainer.learning_rate,
            max_iterations: trainer.max_iterations,
            tolerance: trainer.tolerance,
            l2_penalty: trainer.l2_penalty,
        }
    }

    pub fn contract_path(&self) -> PathBuf {
        self.model_trainer_dir.join(ARTIFACT_CONTRACT_FILE)
    }
}
