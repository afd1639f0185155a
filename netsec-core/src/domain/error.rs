// netsec-core/src/domain/error.rs

use std::fmt;
use std::path::PathBuf;

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The four stages of a training run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Ingestion,
    Validation,
    Transformation,
    Training,
}

impl Stage {
    /// Directory name of the stage under the run root.
    pub fn dir_name(self) -> &'static str {
        match self {
            Stage::Ingestion => "data_ingestion",
            Stage::Validation => "data_validation",
            Stage::Transformation => "data_transformation",
            Stage::Training => "model_trainer",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Stage::Ingestion => "ingestion",
            Stage::Validation => "validation",
            Stage::Transformation => "transformation",
            Stage::Training => "training",
        };
        f.write_str(label)
    }
}

#[derive(Error, Debug, Diagnostic, PartialEq)]
pub enum DomainError {
    #[error("Empty sample: {0}")]
    #[diagnostic(code(netsec::domain::empty_sample))]
    EmptySample(String),

    #[error("Shape mismatch: expected {expected} columns, got {actual}")]
    #[diagnostic(
        code(netsec::domain::shape),
        help("The transformer was fitted on a different feature layout.")
    )]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("Length mismatch: {left} labels vs {right} predictions")]
    #[diagnostic(code(netsec::domain::length))]
    LengthMismatch { left: usize, right: usize },

    #[error("Invalid target value {0}: binary targets must be 0 or 1")]
    #[diagnostic(code(netsec::domain::target))]
    InvalidTarget(f64),

    #[error("Training set contains a single class ({0})")]
    #[diagnostic(
        code(netsec::domain::single_class),
        help("A classifier needs both positive and negative examples.")
    )]
    SingleClass(f64),

    #[error("Optimisation diverged at iteration {iteration} (loss = {loss})")]
    #[diagnostic(
        code(netsec::domain::divergence),
        help("Lower trainer.learning-rate in pipeline.yaml.")
    )]
    Divergence { iteration: usize, loss: f64 },

    #[error("{stage} artifact points at missing files: {paths:?}")]
    #[diagnostic(code(netsec::domain::artifact_missing))]
    MissingOutputs { stage: Stage, paths: Vec<PathBuf> },

    #[error("Non-finite feature value at row {row}, column {column}")]
    #[diagnostic(code(netsec::domain::non_finite))]
    NonFinite { row: usize, column: usize },
}
