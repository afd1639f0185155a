// netsec-core/src/application/mod.rs

pub mod clean;
pub mod error;
pub mod ingestion;
pub mod pipeline;
pub mod trainer;
pub mod transformation;
pub mod validation;

mod contract;

#[cfg(test)]
pub(crate) mod testing;

// --- RE-EXPORTS (FACADE PATTERN) ---
// The CLI only needs `use netsec_core::application::{run_pipeline, clean_artifacts};`.

pub use clean::clean_artifacts;
pub use error::{IngestionError, StageFailure, TrainingError, TransformationError, ValidationError};
pub use ingestion::{DataIngestion, open_document_store};
pub use pipeline::{RunResult, TrainingPipeline, run_pipeline};
pub use trainer::ModelTrainer;
pub use transformation::DataTransformation;
pub use validation::DataValidation;
