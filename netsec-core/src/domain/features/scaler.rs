// netsec-core/src/domain/features/scaler.rs

use ndarray::{Array1, Array2, ArrayView2, Axis};
use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

/// Zero-mean / unit-variance scaling learned on the training split.
/// Constant columns keep a scale of 1 so they map to zero instead of NaN.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    mean: Array1<f64>,
    scale: Array1<f64>,
}

impl StandardScaler {
    pub fn fit(x: ArrayView2<'_, f64>) -> Result<Self, DomainError> {
        let mean = x
            .mean_axis(Axis(0))
            .ok_or_else(|| DomainError::EmptySample("scaler training rows".into()))?;
        let scale = x
            .std_axis(Axis(0), 0.0)
            .mapv(|s| if s.is_finite() && s > 0.0 { s } else { 1.0 });
        Ok(Self { mean, scale })
    }

    pub fn transform(&self, x: ArrayView2<'_, f64>) -> Result<Array2<f64>, DomainError> {
        if x.ncols() != self.mean.len() {
            return Err(DomainError::ShapeMismatch {
                expected: self.mean.len(),
                actual: x.ncols(),
            });
        }
        Ok((&x - &self.mean) / &self.scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_columns_are_centred_and_scaled() -> Result<(), DomainError> {
        let x = array![[1.0, 5.0], [3.0, 5.0]];
        let scaler = StandardScaler::fit(x.view())?;
        let out = scaler.transform(x.view())?;
        assert_eq!(out, array![[-1.0, 0.0], [1.0, 0.0]]);
        Ok(())
    }

    #[test]
    fn test_test_split_uses_training_statistics() -> Result<(), DomainError> {
        let scaler = StandardScaler::fit(array![[0.0], [2.0]].view())?;
        let out = scaler.transform(array![[4.0]].view())?;
        assert_eq!(out, array![[3.0]]);
        Ok(())
    }

    #[test]
    fn test_empty_input_is_rejected() {
        let empty = Array2::<f64>::zeros((0, 3));
        assert!(StandardScaler::fit(empty.view()).is_err());
    }
}
