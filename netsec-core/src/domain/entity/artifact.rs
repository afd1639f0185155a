// netsec-core/src/domain/entity/artifact.rs

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::error::{DomainError, Stage};

/// Typed record of what a stage produced.
///
/// `output_paths` lists every file the artifact points at; a stage may only
/// hand its artifact downstream once all of them exist.
pub trait Artifact: Serialize {
    const STAGE: Stage;

    fn output_paths(&self) -> Vec<&Path>;

    fn missing_outputs(&self) -> Vec<PathBuf> {
        self.output_paths()
            .into_iter()
            .filter(|p| !p.is_file())
            .map(Path::to_path_buf)
            .collect()
    }

    /// Fails unless every output path exists as a file.
    fn verify(&self) -> Result<(), DomainError> {
        let paths = self.missing_outputs();
        if paths.is_empty() {
            Ok(())
        } else {
            Err(DomainError::MissingOutputs {
                stage: Self::STAGE,
                paths,
            })
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataIngestionArtifact {
    pub trained_file_path: PathBuf,
    pub test_file_path: PathBuf,
}

impl Artifact for DataIngestionArtifact {
    const STAGE: Stage = Stage::Ingestion;

    fn output_paths(&self) -> Vec<&Path> {
        vec![&self.trained_file_path, &self.test_file_path]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataValidationArtifact {
    /// `false` when drift was detected. Schema failures never produce an artifact.
    pub validation_status: bool,
    pub valid_train_file_path: PathBuf,
    pub valid_test_file_path: PathBuf,
    pub invalid_train_file_path: Option<PathBuf>,
    pub invalid_test_file_path: Option<PathBuf>,
    pub drift_report_file_path: PathBuf,
}

impl Artifact for DataValidationArtifact {
    const STAGE: Stage = Stage::Validation;

    fn output_paths(&self) -> Vec<&Path> {
        let mut paths: Vec<&Path> = vec![
            &self.valid_train_file_path,
            &self.valid_test_file_path,
            &self.drift_report_file_path,
        ];
        paths.extend(self.invalid_train_file_path.as_deref());
        paths.extend(self.invalid_test_file_path.as_deref());
        paths
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataTransformationArtifact {
    pub transformed_object_file_path: PathBuf,
    pub transformed_train_file_path: PathBuf,
    pub transformed_test_file_path: PathBuf,
}

impl Artifact for DataTransformationArtifact {
    const STAGE: Stage = Stage::Transformation;

    fn output_paths(&self) -> Vec<&Path> {
        vec![
            &self.transformed_object_file_path,
            &self.transformed_train_file_path,
            &self.transformed_test_file_path,
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassificationMetricArtifact {
    pub f1_score: f64,
    pub precision_score: f64,
    pub recall_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelTrainerArtifact {
    pub trained_model_file_path: PathBuf,
    pub train_metric_artifact: ClassificationMetricArtifact,
    pub test_metric_artifact: ClassificationMetricArtifact,
}

impl Artifact for ModelTrainerArtifact {
    const STAGE: Stage = Stage::Training;

    fn output_paths(&self) -> Vec<&Path> {
        vec![&self.trained_model_file_path]
    }
}
