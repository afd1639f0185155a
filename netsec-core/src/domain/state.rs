// netsec-core/src/domain/state.rs

use crate::domain::entity::{
    DataIngestionArtifact, DataTransformationArtifact, DataValidationArtifact,
    ModelTrainerArtifact,
};
use crate::domain::error::Stage;

/// Position of a run in the fixed four-stage sequence.
///
/// Each state after `Start` carries the artifact that got it there, which is
/// the only input the next stage accepts. Failure is not a state: the driver
/// returns the wrapped error instead.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineState {
    Start,
    Ingested(DataIngestionArtifact),
    Validated(DataValidationArtifact),
    Transformed(DataTransformationArtifact),
    Trained(ModelTrainerArtifact),
}

impl PipelineState {
    /// Stage that runs from this state, `None` once training is done.
    pub fn next_stage(&self) -> Option<Stage> {
        match self {
            PipelineState::Start => Some(Stage::Ingestion),
            PipelineState::Ingested(_) => Some(Stage::Validation),
            PipelineState::Validated(_) => Some(Stage::Transformation),
            PipelineState::Transformed(_) => Some(Stage::Training),
            PipelineState::Trained(_) => None,
        }
    }

    /// Stage whose artifact this state holds.
    pub fn completed_stage(&self) -> Option<Stage> {
        match self {
            PipelineState::Start => None,
            PipelineState::Ingested(_) => Some(Stage::Ingestion),
            PipelineState::Validated(_) => Some(Stage::Validation),
            PipelineState::Transformed(_) => Some(Stage::Transformation),
            PipelineState::Trained(_) => Some(Stage::Training),
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.next_stage().is_none()
    }

    /// The carried artifact as YAML, for printing.
    pub fn artifact_yaml(&self) -> Result<Option<String>, serde_yaml::Error> {
        match self {
            PipelineState::Start => Ok(None),
            PipelineState::Ingested(a) => serde_yaml::to_string(a).map(Some),
            PipelineState::Validated(a) => serde_yaml::to_string(a).map(Some),
            PipelineState::Transformed(a) => serde_yaml::to_string(a).map(Some),
            PipelineState::Trained(a) => serde_yaml::to_string(a).map(Some),
        }
    }
}
