// netsec-core/src/domain/project/mod.rs

pub mod configuration;
pub mod schema;

pub use configuration::{
    ImputerSettings, ImputerWeights, IngestionSettings, PipelineSettings, TrainerSettings,
    TransformationSettings, ValidationSettings,
};
pub use schema::{ColumnSpec, DataSchema};
