// netsec-core/src/application/transformation.rs

use std::path::Path;

use ndarray::{Array1, Array2, Axis, concatenate};
use tracing::{info, instrument};

use crate::application::contract::publish;
use crate::application::error::TransformationError;
use crate::domain::entity::{
    DataTransformationArtifact, DataTransformationConfig, DataValidationArtifact,
};
use crate::domain::error::DomainError;
use crate::domain::features::Preprocessor;
use crate::infrastructure::adapters::DataFrame;
use crate::infrastructure::fs::save_json;
use crate::infrastructure::npy::save_array;

/// Label value the raw data uses for the negative class.
const RAW_NEGATIVE_LABEL: f64 = -1.0;

pub struct DataTransformation {
    validation_artifact: DataValidationArtifact,
    config: DataTransformationConfig,
}

/// Feature matrix (NaN for missing cells) and mapped target of one split.
struct Split {
    features: Array2<f64>,
    target: Array1<f64>,
}

impl DataTransformation {
    pub fn new(
        validation_artifact: DataValidationArtifact,
        config: DataTransformationConfig,
    ) -> Self {
        Self {
            validation_artifact,
            config,
        }
    }

    pub fn config(&self) -> &DataTransformationConfig {
        &self.config
    }

    pub fn read_data(path: &Path) -> Result<DataFrame, TransformationError> {
        Ok(DataFrame::read_csv(path)?)
    }

    #[instrument(skip(self), fields(dir = ?self.config.data_transformation_dir))]
    pub fn initiate_data_transformation(
        &self,
    ) -> Result<DataTransformationArtifact, TransformationError> {
        let train_path = &self.validation_artifact.valid_train_file_path;
        let test_path = &self.validation_artifact.valid_test_file_path;
        let train = Self::read_data(train_path)?;
        let test = Self::read_data(test_path)?;

        let feature_names = self.feature_columns(&train, train_path)?;
        let test_features = self.feature_columns(&test, test_path)?;
        if !same_columns(&feature_names, &test_features) {
            return Err(TransformationError::FeatureMismatch {
                expected: feature_names,
                actual: test_features,
            });
        }
        if train.height()? == 0 {
            return Err(TransformationError::EmptyTrainSplit);
        }

        let train_split = self.extract(&train, &feature_names, train_path)?;
        let test_split = self.extract(&test, &feature_names, test_path)?;

        let (preprocessor, train_features) = Preprocessor::fit_transform(
            train_split.features.view(),
            feature_names,
            &self.config.imputer,
        )?;
        let test_features = preprocessor.transform(test_split.features.view())?;
        info!(
            train_rows = train_features.nrows(),
            test_rows = test_features.nrows(),
            features = train_features.ncols(),
            "Preprocessor fitted on train split"
        );

        save_array(
            &self.config.transformed_train_file_path,
            &with_target(train_features, &train_split.target)?,
        )?;
        save_array(
            &self.config.transformed_test_file_path,
            &with_target(test_features, &test_split.target)?,
        )?;
        save_json(&self.config.transformed_object_file_path, &preprocessor)?;

        let artifact = DataTransformationArtifact {
            transformed_object_file_path: self.config.transformed_object_file_path.clone(),
            transformed_train_file_path: self.config.transformed_train_file_path.clone(),
            transformed_test_file_path: self.config.transformed_test_file_path.clone(),
        };
        publish(artifact, &self.config.contract_path())
    }

    /// Every column except the target, in file order.
    fn feature_columns(
        &self,
        frame: &DataFrame,
        path: &Path,
    ) -> Result<Vec<String>, TransformationError> {
        let columns = frame.columns()?;
        if !columns.contains(&self.config.target_column) {
            return Err(TransformationError::MissingColumn {
                column: self.config.target_column.clone(),
                path: path.to_path_buf(),
            });
        }
        Ok(columns
            .into_iter()
            .filter(|c| c != &self.config.target_column)
            .collect())
    }

    fn extract(
        &self,
        frame: &DataFrame,
        feature_names: &[String],
        path: &Path,
    ) -> Result<Split, TransformationError> {
        for column in feature_names.iter().chain([&self.config.target_column]) {
            let count = frame.non_numeric_count(column)?;
            if count > 0 {
                return Err(TransformationError::NonNumeric {
                    column: column.clone(),
                    count,
                });
            }
        }

        let features = frame.to_matrix(feature_names)?;
        let target = frame
            .column_f64(&self.config.target_column)?
            .into_iter()
            .enumerate()
            .map(|(row, value)| match value {
                Some(v) if v == RAW_NEGATIVE_LABEL => Ok(0.0),
                Some(v) => Ok(v),
                None => Err(TransformationError::MissingTarget {
                    row,
                    path: path.to_path_buf(),
                }),
            })
            .collect::<Result<Array1<f64>, _>>()?;

        Ok(Split { features, target })
    }
}

fn same_columns(left: &[String], right: &[String]) -> bool {
    let mut l: Vec<&String> = left.iter().collect();
    let mut r: Vec<&String> = right.iter().collect();
    l.sort();
    r.sort();
    l == r
}

/// `[features | target]`, the layout the trainer expects.
fn with_target(features: Array2<f64>, target: &Array1<f64>) -> Result<Array2<f64>, DomainError> {
    let column = target.view().insert_axis(Axis(1));
    concatenate(Axis(1), &[features.view(), column]).map_err(|_| DomainError::LengthMismatch {
        left: target.len(),
        right: features.nrows(),
    })
}
