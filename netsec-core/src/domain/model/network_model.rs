// netsec-core/src/domain/model/network_model.rs

use ndarray::{Array1, ArrayView2};
use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;
use crate::domain::features::Preprocessor;
use crate::domain::model::LogisticRegression;

/// What `model.json` holds: the fitted preprocessor and the classifier, so
/// raw feature rows can be scored without the transformation stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkModel {
    pub preprocessor: Preprocessor,
    pub classifier: LogisticRegression,
}

impl NetworkModel {
    pub fn new(preprocessor: Preprocessor, classifier: LogisticRegression) -> Self {
        Self {
            preprocessor,
            classifier,
        }
    }

    /// Raw rows (NaN for missing cells) in `feature_names()` order → 0/1 labels.
    pub fn predict(&self, raw: ArrayView2<'_, f64>) -> Result<Array1<f64>, DomainError> {
        let features = self.preprocessor.transform(raw)?;
        self.classifier.predict(features.view())
    }

    pub fn feature_names(&self) -> &[String] {
        self.preprocessor.feature_names()
    }
}
