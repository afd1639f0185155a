// netsec-core/src/domain/entity/mod.rs

pub mod artifact;
pub mod config;

pub use artifact::{
    Artifact, ClassificationMetricArtifact, DataIngestionArtifact, DataTransformationArtifact,
    DataValidationArtifact, ModelTrainerArtifact,
};
pub use config::{
    DataIngestionConfig, DataTransformationConfig, DataValidationConfig, ModelTrainerConfig,
    TrainingPipelineConfig,
};
