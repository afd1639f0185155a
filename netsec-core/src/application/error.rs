// netsec-core/src/application/error.rs
//
// One error type per stage. They share the `StageFailure` capability so the
// driver and CLI can report which stage broke without matching on each type.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

use crate::domain::error::{DomainError, Stage};
use crate::infrastructure::error::InfrastructureError;

pub trait StageFailure: std::error::Error {
    fn stage(&self) -> Stage;
}

#[derive(Error, Debug, Diagnostic)]
pub enum IngestionError {
    #[error("Invalid train/test split ratio {0}: must lie strictly between 0 and 1")]
    #[diagnostic(
        code(netsec::ingestion::split_ratio),
        help("Set ingestion.train-test-split-ratio to a value such as 0.2.")
    )]
    InvalidSplitRatio(f64),

    #[error("No document store connection string configured")]
    #[diagnostic(
        code(netsec::ingestion::connection),
        help("Set MONGO_DB_URL (in the environment or .env), e.g. mongodb://localhost:27017 or file://store.")
    )]
    MissingConnectionString,

    #[error("Could not read collection '{database}.{collection}'")]
    #[diagnostic(code(netsec::ingestion::fetch))]
    Fetch {
        database: String,
        collection: String,
        #[source]
        #[diagnostic_source]
        source: InfrastructureError,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Infrastructure(#[from] InfrastructureError),
}

impl StageFailure for IngestionError {
    fn stage(&self) -> Stage {
        Stage::Ingestion
    }
}

#[derive(Error, Debug, Diagnostic)]
pub enum ValidationError {
    #[error(
        "Schema mismatch in {split} split: missing columns {missing:?}, unexpected columns {unexpected:?}"
    )]
    #[diagnostic(
        code(netsec::validation::schema),
        help("Update data_schema/schema.yaml or fix the source collection.")
    )]
    SchemaMismatch {
        split: &'static str,
        missing: Vec<String>,
        unexpected: Vec<String>,
    },

    #[error("The {split} split is empty ({path:?})")]
    #[diagnostic(
        code(netsec::validation::empty_split),
        help("The collection holds too few rows for the configured split ratio.")
    )]
    EmptySplit { split: &'static str, path: PathBuf },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Infrastructure(#[from] InfrastructureError),
}

impl StageFailure for ValidationError {
    fn stage(&self) -> Stage {
        Stage::Validation
    }
}

#[derive(Error, Debug, Diagnostic)]
pub enum TransformationError {
    #[error("Column '{column}' not found in {path:?}")]
    #[diagnostic(
        code(netsec::transformation::missing_column),
        help("Check target-column in pipeline.yaml.")
    )]
    MissingColumn { column: String, path: PathBuf },

    #[error("Test features {actual:?} do not match train features {expected:?}")]
    #[diagnostic(code(netsec::transformation::features))]
    FeatureMismatch {
        expected: Vec<String>,
        actual: Vec<String>,
    },

    #[error("Column '{column}' holds {count} non-numeric value(s)")]
    #[diagnostic(code(netsec::transformation::non_numeric))]
    NonNumeric { column: String, count: usize },

    #[error("Target value missing at row {row} of {path:?}")]
    #[diagnostic(code(netsec::transformation::missing_target))]
    MissingTarget { row: usize, path: PathBuf },

    #[error("Train split has no rows to fit the transformer on")]
    #[diagnostic(code(netsec::transformation::empty_train))]
    EmptyTrainSplit,

    #[error(transparent)]
    #[diagnostic(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Infrastructure(#[from] InfrastructureError),
}

impl StageFailure for TransformationError {
    fn stage(&self) -> Stage {
        Stage::Transformation
    }
}

#[derive(Error, Debug, Diagnostic)]
pub enum TrainingError {
    #[error("Array at {path:?} has {columns} column(s); expected features plus a target")]
    #[diagnostic(code(netsec::training::array_shape))]
    MalformedArray { path: PathBuf, columns: usize },

    #[error("Train f1 score {score:.4} is below the expected score {expected}")]
    #[diagnostic(
        code(netsec::training::below_expected),
        help("Lower trainer.expected-score or revisit the features.")
    )]
    BelowExpectedScore { score: f64, expected: f64 },

    #[error("Train/test f1 gap {gap:.4} exceeds the overfitting threshold {threshold}")]
    #[diagnostic(code(netsec::training::overfitting))]
    Overfitting { gap: f64, threshold: f64 },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Infrastructure(#[from] InfrastructureError),
}

impl StageFailure for TrainingError {
    fn stage(&self) -> Stage {
        Stage::Training
    }
}
