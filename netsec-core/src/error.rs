// netsec-core/src/error.rs

use std::panic::Location;

use miette::Diagnostic;
use thiserror::Error;

use crate::application::error::{
    IngestionError, StageFailure, TrainingError, TransformationError, ValidationError,
};
use crate::domain::error::Stage;
use crate::infrastructure::error::InfrastructureError;

/// Uniform failure type surfaced by the pipeline driver.
///
/// Stage variants keep the location of the `?` that propagated them, so a
/// failure printed by the CLI points at the exact call site in the driver.
#[derive(Error, Debug, Diagnostic)]
pub enum PipelineError {
    // --- STAGE FAILURES ---
    #[error("Data ingestion failed (at {location})")]
    #[diagnostic(code(netsec::pipeline::ingestion))]
    Ingestion {
        #[source]
        source: IngestionError,
        location: &'static Location<'static>,
    },

    #[error("Data validation failed (at {location})")]
    #[diagnostic(code(netsec::pipeline::validation))]
    Validation {
        #[source]
        source: ValidationError,
        location: &'static Location<'static>,
    },

    #[error("Data transformation failed (at {location})")]
    #[diagnostic(code(netsec::pipeline::transformation))]
    Transformation {
        #[source]
        source: TransformationError,
        location: &'static Location<'static>,
    },

    #[error("Model training failed (at {location})")]
    #[diagnostic(code(netsec::pipeline::training))]
    Training {
        #[source]
        source: TrainingError,
        location: &'static Location<'static>,
    },

    // --- OUTSIDE ANY STAGE (config loading, run summary, clean) ---
    #[error(transparent)]
    #[diagnostic(transparent)]
    Infrastructure(#[from] InfrastructureError),

    #[error("Unsafe path traversal detected: {0}")]
    #[diagnostic(
        code(netsec::pipeline::unsafe_path),
        help("artifact-dir must stay inside the project directory.")
    )]
    UnsafePath(String),
}

impl PipelineError {
    /// Stage that failed, `None` for failures outside the four stages.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            PipelineError::Ingestion { source, .. } => Some(source.stage()),
            PipelineError::Validation { source, .. } => Some(source.stage()),
            PipelineError::Transformation { source, .. } => Some(source.stage()),
            PipelineError::Training { source, .. } => Some(source.stage()),
            PipelineError::Infrastructure(_) | PipelineError::UnsafePath(_) => None,
        }
    }

    pub fn location(&self) -> Option<&'static Location<'static>> {
        match self {
            PipelineError::Ingestion { location, .. }
            | PipelineError::Validation { location, .. }
            | PipelineError::Transformation { location, .. }
            | PipelineError::Training { location, .. } => Some(location),
            PipelineError::Infrastructure(_) | PipelineError::UnsafePath(_) => None,
        }
    }
}

// Manual implementations: `#[track_caller]` makes `?` record its own site.
impl From<IngestionError> for PipelineError {
    #[track_caller]
    fn from(source: IngestionError) -> Self {
        PipelineError::Ingestion {
            source,
            location: Location::caller(),
        }
    }
}

impl From<ValidationError> for PipelineError {
    #[track_caller]
    fn from(source: ValidationError) -> Self {
        PipelineError::Validation {
            source,
            location: Location::caller(),
        }
    }
}

impl From<TransformationError> for PipelineError {
    #[track_caller]
    fn from(source: TransformationError) -> Self {
        PipelineError::Transformation {
            source,
            location: Location::caller(),
        }
    }
}

impl From<TrainingError> for PipelineError {
    #[track_caller]
    fn from(source: TrainingError) -> Self {
        PipelineError::Training {
            source,
            location: Location::caller(),
        }
    }
}

impl From<std::io::Error> for PipelineError {
    fn from(err: std::io::Error) -> Self {
        PipelineError::Infrastructure(InfrastructureError::Io(err))
    }
}
