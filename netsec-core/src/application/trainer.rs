// netsec-core/src/application/trainer.rs

use std::path::Path;

use ndarray::{Array1, Array2, Axis, s};
use tracing::{info, instrument, warn};

use crate::application::contract::publish;
use crate::application::error::TrainingError;
use crate::domain::entity::{
    ClassificationMetricArtifact, DataTransformationArtifact, ModelTrainerArtifact,
    ModelTrainerConfig,
};
use crate::domain::features::Preprocessor;
use crate::domain::model::{FitParams, LogisticRegression, NetworkModel, classification_score};
use crate::infrastructure::fs::{load_json, save_json};
use crate::infrastructure::npy::load_array;

pub struct ModelTrainer {
    transformation_artifact: DataTransformationArtifact,
    config: ModelTrainerConfig,
}

impl ModelTrainer {
    pub fn new(
        transformation_artifact: DataTransformationArtifact,
        config: ModelTrainerConfig,
    ) -> Self {
        Self {
            transformation_artifact,
            config,
        }
    }

    pub fn config(&self) -> &ModelTrainerConfig {
        &self.config
    }

    fn fit_params(&self) -> FitParams {
        FitParams {
            learning_rate: self.config.learning_rate,
            max_iterations: self.config.max_iterations,
            tolerance: self.config.tolerance,
            l2_penalty: self.config.l2_penalty,
        }
    }

    /// Fits the classifier and scores it on both splits.
    pub fn train_model(
        &self,
        x_train: &Array2<f64>,
        y_train: &Array1<f64>,
        x_test: &Array2<f64>,
        y_test: &Array1<f64>,
    ) -> Result<
        (
            LogisticRegression,
            ClassificationMetricArtifact,
            ClassificationMetricArtifact,
        ),
        TrainingError,
    > {
        let (classifier, summary) =
            LogisticRegression::fit(x_train.view(), y_train.view(), &self.fit_params())?;
        if summary.converged {
            info!(
                iterations = summary.iterations,
                loss = summary.loss,
                "Classifier converged"
            );
        } else {
            warn!(
                iterations = summary.iterations,
                loss = summary.loss,
                "Classifier stopped at max-iterations before reaching tolerance"
            );
        }

        let train_metric = classification_score(
            y_train.view(),
            classifier.predict(x_train.view())?.view(),
        )?;
        let test_metric =
            classification_score(y_test.view(), classifier.predict(x_test.view())?.view())?;

        Ok((classifier, train_metric, test_metric))
    }

    fn check_quality(
        &self,
        train: &ClassificationMetricArtifact,
        test: &ClassificationMetricArtifact,
    ) -> Result<(), TrainingError> {
        if train.f1_score < self.config.expected_score {
            return Err(TrainingError::BelowExpectedScore {
                score: train.f1_score,
                expected: self.config.expected_score,
            });
        }
        if let Some(threshold) = self.config.overfitting_threshold {
            let gap = (train.f1_score - test.f1_score).abs();
            if gap > threshold {
                return Err(TrainingError::Overfitting { gap, threshold });
            }
        }
        Ok(())
    }

    #[instrument(skip(self), fields(dir = ?self.config.model_trainer_dir))]
    pub fn initiate_model_trainer(&self) -> Result<ModelTrainerArtifact, TrainingError> {
        let inputs = &self.transformation_artifact;
        let (x_train, y_train) = load_split(&inputs.transformed_train_file_path)?;
        let (x_test, y_test) = load_split(&inputs.transformed_test_file_path)?;

        let (classifier, train_metric, test_metric) =
            self.train_model(&x_train, &y_train, &x_test, &y_test)?;
        info!(
            train_f1 = train_metric.f1_score,
            test_f1 = test_metric.f1_score,
            "Model evaluated"
        );
        self.check_quality(&train_metric, &test_metric)?;

        let preprocessor: Preprocessor =
            load_json(&inputs.transformed_object_file_path)?;
        let model = NetworkModel::new(preprocessor, classifier);
        save_json(&self.config.trained_model_file_path, &model)?;

        let artifact = ModelTrainerArtifact {
            trained_model_file_path: self.config.trained_model_file_path.clone(),
            train_metric_artifact: train_metric,
            test_metric_artifact: test_metric,
        };
        publish(artifact, &self.config.contract_path())
    }
}

/// Splits a persisted `[features | target]` matrix.
fn load_split(path: &Path) -> Result<(Array2<f64>, Array1<f64>), TrainingError> {
    let array = load_array(path)?;
    let columns = array.ncols();
    if columns < 2 {
        return Err(TrainingError::MalformedArray {
            path: path.to_path_buf(),
            columns,
        });
    }
    let features = array.slice(s![.., ..columns - 1]).to_owned();
    let target = array.index_axis(Axis(1), columns - 1).to_owned();
    Ok((features, target))
}
