// netsec-core/src/domain/features/preprocessor.rs

use ndarray::{Array2, ArrayView2};
use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;
use crate::domain::features::{KnnImputer, StandardScaler};
use crate::domain::project::ImputerSettings;

/// Fitted feature transformer: KNN imputation followed by standard scaling.
/// Persisted next to the transformed arrays and reused at inference time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preprocessor {
    feature_names: Vec<String>,
    imputer: KnnImputer,
    scaler: StandardScaler,
}

impl Preprocessor {
    /// Fits on the training split only and returns the transformed training matrix.
    pub fn fit_transform(
        x: ArrayView2<'_, f64>,
        feature_names: Vec<String>,
        settings: &ImputerSettings,
    ) -> Result<(Self, Array2<f64>), DomainError> {
        if feature_names.len() != x.ncols() {
            return Err(DomainError::ShapeMismatch {
                expected: feature_names.len(),
                actual: x.ncols(),
            });
        }
        let imputer = KnnImputer::fit(x, settings)?;
        let imputed = imputer.transform(x)?;
        let scaler = StandardScaler::fit(imputed.view())?;
        let scaled = scaler.transform(imputed.view())?;
        ensure_finite(&scaled)?;

        let preprocessor = Self {
            feature_names,
            imputer,
            scaler,
        };
        Ok((preprocessor, scaled))
    }

    pub fn transform(&self, x: ArrayView2<'_, f64>) -> Result<Array2<f64>, DomainError> {
        let imputed = self.imputer.transform(x)?;
        let scaled = self.scaler.transform(imputed.view())?;
        ensure_finite(&scaled)?;
        Ok(scaled)
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }
}

fn ensure_finite(x: &Array2<f64>) -> Result<(), DomainError> {
    match x.indexed_iter().find(|(_, v)| !v.is_finite()) {
        Some(((row, column), _)) => Err(DomainError::NonFinite { row, column }),
        None => Ok(()),
    }
}
