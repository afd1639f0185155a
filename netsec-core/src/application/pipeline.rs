// netsec-core/src/application/pipeline.rs

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::application::clean::resolve_artifact_root;
use crate::application::ingestion::{DataIngestion, open_document_store};
use crate::application::trainer::ModelTrainer;
use crate::application::transformation::DataTransformation;
use crate::application::validation::DataValidation;
use crate::domain::entity::{
    ClassificationMetricArtifact, DataIngestionArtifact, DataIngestionConfig,
    DataTransformationArtifact, DataTransformationConfig, DataValidationArtifact,
    DataValidationConfig, ModelTrainerArtifact, ModelTrainerConfig, TrainingPipelineConfig,
};
use crate::domain::project::{DataSchema, PipelineSettings};
use crate::domain::state::PipelineState;
use crate::error::PipelineError;
use crate::infrastructure::config::{load_pipeline_settings, load_schema};
use crate::infrastructure::fs::save_json;
use crate::ports::DocumentStore;

/// Summary written to `run_results.json` once the last stage is done.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    pub pipeline: String,
    pub timestamp: String,
    pub artifact_dir: PathBuf,
    pub validation_status: bool,
    pub trained_model_file_path: PathBuf,
    pub train_metric: ClassificationMetricArtifact,
    pub test_metric: ClassificationMetricArtifact,
    pub duration_secs: f64,
}

/// Runs the four stages in order, each consuming the artifact of the one
/// before. All stage configs are derived from one settings tree and one
/// run timestamp.
pub struct TrainingPipeline<'a> {
    settings: PipelineSettings,
    schema: DataSchema,
    config: TrainingPipelineConfig,
    store: &'a dyn DocumentStore,
}

impl<'a> TrainingPipeline<'a> {
    pub fn new(
        project_dir: &Path,
        settings: PipelineSettings,
        schema: DataSchema,
        store: &'a dyn DocumentStore,
        now: DateTime<Local>,
    ) -> Result<Self, PipelineError> {
        resolve_artifact_root(project_dir, &settings.artifact_dir)?;
        let config = TrainingPipelineConfig::new(project_dir, &settings, now);
        Ok(Self {
            settings,
            schema,
            config,
            store,
        })
    }

    pub fn config(&self) -> &TrainingPipelineConfig {
        &self.config
    }

    pub async fn start_data_ingestion(&self) -> Result<DataIngestionArtifact, PipelineError> {
        println!("📥 Data ingestion...");
        let config = DataIngestionConfig::new(&self.config, &self.settings);
        let artifact = DataIngestion::new(config, self.store)
            .initiate_data_ingestion()
            .await?;
        Ok(artifact)
    }

    pub fn start_data_validation(
        &self,
        ingestion: DataIngestionArtifact,
    ) -> Result<DataValidationArtifact, PipelineError> {
        println!("🔍 Data validation...");
        let config = DataValidationConfig::new(&self.config, &self.settings, self.schema.clone());
        let artifact = DataValidation::new(ingestion, config).initiate_data_validation()?;
        if !artifact.validation_status {
            println!("   ⚠️  Drift detected, see {:?}", artifact.drift_report_file_path);
        }
        Ok(artifact)
    }

    pub fn start_data_transformation(
        &self,
        validation: DataValidationArtifact,
    ) -> Result<DataTransformationArtifact, PipelineError> {
        println!("🧮 Data transformation...");
        let config = DataTransformationConfig::new(&self.config, &self.settings);
        let artifact =
            DataTransformation::new(validation, config).initiate_data_transformation()?;
        Ok(artifact)
    }

    pub fn start_model_trainer(
        &self,
        transformation: DataTransformationArtifact,
    ) -> Result<ModelTrainerArtifact, PipelineError> {
        println!("🧠 Model training...");
        let config = ModelTrainerConfig::new(&self.config, &self.settings);
        let artifact = ModelTrainer::new(transformation, config).initiate_model_trainer()?;
        Ok(artifact)
    }

    /// Drives Start → Ingested → Validated → Transformed → Trained. The
    /// observer sees every state, including `Start`. The first failing stage
    /// ends the run.
    #[instrument(skip(self, observer), fields(run = %self.config.timestamp))]
    pub async fn run<F>(&self, mut observer: F) -> Result<RunResult, PipelineError>
    where
        F: FnMut(&PipelineState),
    {
        let start_time = std::time::Instant::now();
        let mut validation_status = true;
        let mut state = PipelineState::Start;
        observer(&state);

        let trained = loop {
            state = match state {
                PipelineState::Start => {
                    PipelineState::Ingested(self.start_data_ingestion().await?)
                }
                PipelineState::Ingested(artifact) => {
                    PipelineState::Validated(self.start_data_validation(artifact)?)
                }
                PipelineState::Validated(artifact) => {
                    validation_status = artifact.validation_status;
                    PipelineState::Transformed(self.start_data_transformation(artifact)?)
                }
                PipelineState::Transformed(artifact) => {
                    PipelineState::Trained(self.start_model_trainer(artifact)?)
                }
                PipelineState::Trained(artifact) => break artifact,
            };
            observer(&state);
        };

        let result = RunResult {
            pipeline: self.config.pipeline_name.clone(),
            timestamp: self.config.timestamp.clone(),
            artifact_dir: self.config.artifact_dir.clone(),
            validation_status,
            trained_model_file_path: trained.trained_model_file_path,
            train_metric: trained.train_metric_artifact,
            test_metric: trained.test_metric_artifact,
            duration_secs: start_time.elapsed().as_secs_f64(),
        };
        save_json(&self.config.run_results_path(), &result)?;

        println!(
            "✨ Done in {:.2}s. Train f1 {:.3}, test f1 {:.3}",
            result.duration_secs, result.train_metric.f1_score, result.test_metric.f1_score
        );
        Ok(result)
    }
}

/// Loads settings and schema from `project_dir`, connects the configured
/// document store and runs the whole pipeline.
pub async fn run_pipeline<F>(project_dir: &Path, observer: F) -> Result<RunResult, PipelineError>
where
    F: FnMut(&PipelineState),
{
    println!("🚀 Starting training pipeline...");
    let settings = load_pipeline_settings(project_dir)?;
    let schema = load_schema(project_dir, &settings)?;

    let now = Local::now();
    let root = TrainingPipelineConfig::new(project_dir, &settings, now);
    let store =
        open_document_store(&DataIngestionConfig::new(&root, &settings), project_dir).await?;

    let pipeline = TrainingPipeline::new(project_dir, settings, schema, store.as_ref(), now)?;
    pipeline.run(observer).await
}
