// netsec-core/src/domain/features/imputer.rs

use ndarray::{Array2, ArrayView1, ArrayView2, Axis};
use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;
use crate::domain::project::{ImputerSettings, ImputerWeights};

/// Fills NaN cells from the `n_neighbors` closest training rows.
///
/// Distances use the nan-euclidean metric: only coordinates present in both
/// rows count, and the sum is rescaled by `n_features / n_present`. A cell
/// with no usable donor falls back to the training column mean (0.0 when the
/// whole training column is missing).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnnImputer {
    n_neighbors: usize,
    weights: ImputerWeights,
    #[serde(with = "nan_matrix")]
    fit_x: Array2<f64>,
    column_means: Vec<f64>,
}

impl KnnImputer {
    pub fn fit(x: ArrayView2<'_, f64>, settings: &ImputerSettings) -> Result<Self, DomainError> {
        if x.nrows() == 0 {
            return Err(DomainError::EmptySample("imputer training rows".into()));
        }
        let column_means = x
            .axis_iter(Axis(1))
            .map(|column| {
                let (sum, count) = column
                    .iter()
                    .filter(|v| !v.is_nan())
                    .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
                if count == 0 { 0.0 } else { sum / count as f64 }
            })
            .collect();

        Ok(Self {
            n_neighbors: settings.n_neighbors.max(1),
            weights: settings.weights,
            fit_x: x.to_owned(),
            column_means,
        })
    }

    pub fn n_features(&self) -> usize {
        self.fit_x.ncols()
    }

    pub fn transform(&self, x: ArrayView2<'_, f64>) -> Result<Array2<f64>, DomainError> {
        if x.ncols() != self.n_features() {
            return Err(DomainError::ShapeMismatch {
                expected: self.n_features(),
                actual: x.ncols(),
            });
        }

        let mut out = x.to_owned();
        for (row_idx, row) in x.axis_iter(Axis(0)).enumerate() {
            let missing: Vec<usize> = row
                .iter()
                .enumerate()
                .filter(|(_, v)| v.is_nan())
                .map(|(c, _)| c)
                .collect();
            if missing.is_empty() {
                continue;
            }

            let distances: Vec<Option<f64>> = self
                .fit_x
                .axis_iter(Axis(0))
                .map(|donor| nan_euclidean(row, donor))
                .collect();

            for column in missing {
                out[[row_idx, column]] = self.impute_cell(column, &distances);
            }
        }
        Ok(out)
    }

    fn impute_cell(&self, column: usize, distances: &[Option<f64>]) -> f64 {
        let mut donors: Vec<(f64, f64)> = distances
            .iter()
            .enumerate()
            .filter_map(|(r, d)| {
                let value = self.fit_x[[r, column]];
                match d {
                    Some(d) if !value.is_nan() => Some((*d, value)),
                    _ => None,
                }
            })
            .collect();
        if donors.is_empty() {
            return self.column_means[column];
        }
        donors.sort_by(|a, b| a.0.total_cmp(&b.0));
        donors.truncate(self.n_neighbors);

        match self.weights {
            ImputerWeights::Uniform => {
                donors.iter().map(|(_, v)| v).sum::<f64>() / donors.len() as f64
            }
            ImputerWeights::Distance => {
                // Exact matches take the whole weight.
                let exact: Vec<f64> = donors
                    .iter()
                    .filter(|(d, _)| *d == 0.0)
                    .map(|(_, v)| *v)
                    .collect();
                if !exact.is_empty() {
                    return exact.iter().sum::<f64>() / exact.len() as f64;
                }
                let (weighted, total) = donors
                    .iter()
                    .fold((0.0, 0.0), |(acc, w), (d, v)| (acc + v / d, w + 1.0 / d));
                weighted / total
            }
        }
    }
}

/// JSON has no NaN, and the donor matrix keeps the training gaps: missing
/// cells are written as `null` and read back as NaN.
mod nan_matrix {
    use ndarray::Array2;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    struct Matrix {
        shape: [usize; 2],
        data: Vec<Option<f64>>,
    }

    pub fn serialize<S: Serializer>(x: &Array2<f64>, serializer: S) -> Result<S::Ok, S::Error> {
        Matrix {
            shape: [x.nrows(), x.ncols()],
            data: x.iter().map(|v| (!v.is_nan()).then_some(*v)).collect(),
        }
        .serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Array2<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let matrix = Matrix::deserialize(deserializer)?;
        let data = matrix
            .data
            .into_iter()
            .map(|v| v.unwrap_or(f64::NAN))
            .collect();
        Array2::from_shape_vec((matrix.shape[0], matrix.shape[1]), data).map_err(D::Error::custom)
    }
}

fn nan_euclidean(a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> Option<f64> {
    let (sum, present) = a
        .iter()
        .zip(b.iter())
        .filter(|(x, y)| !x.is_nan() && !y.is_nan())
        .fold((0.0, 0usize), |(s, n), (x, y)| (s + (x - y).powi(2), n + 1));
    if present == 0 {
        return None;
    }
    Some((sum * a.len() as f64 / present as f64).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn settings(k: usize, weights: ImputerWeights) -> ImputerSettings {
        ImputerSettings {
            n_neighbors: k,
            weights,
        }
    }

    #[test]
    fn test_uniform_mean_of_nearest_neighbours() -> Result<(), DomainError> {
        let train = array![[1.0, 10.0], [2.0, 20.0], [3.0, 30.0], [100.0, 1000.0]];
        let imputer = KnnImputer::fit(train.view(), &settings(2, ImputerWeights::Uniform))?;

        let out = imputer.transform(array![[2.1, f64::NAN]].view())?;
        // Nearest on column 0 are 2.0 and 3.0 (or 1.0): 2.0 and 3.0 win.
        assert_eq!(out[[0, 1]], 25.0);
        assert_eq!(out[[0, 0]], 2.1);
        Ok(())
    }

    #[test]
    fn test_distance_weighting_prefers_exact_match() -> Result<(), DomainError> {
        let train = array![[1.0, 10.0], [2.0, 20.0], [3.0, 30.0]];
        let imputer = KnnImputer::fit(train.view(), &settings(3, ImputerWeights::Distance))?;
        let out = imputer.transform(array![[2.0, f64::NAN]].view())?;
        assert_eq!(out[[0, 1]], 20.0);
        Ok(())
    }

    #[test]
    fn test_donors_missing_the_column_are_skipped() -> Result<(), DomainError> {
        let train = array![[1.0, f64::NAN], [5.0, 50.0]];
        let imputer = KnnImputer::fit(train.view(), &settings(1, ImputerWeights::Uniform))?;
        let out = imputer.transform(array![[1.0, f64::NAN]].view())?;
        assert_eq!(out[[0, 1]], 50.0);
        Ok(())
    }

    #[test]
    fn test_falls_back_to_column_mean_without_overlap() -> Result<(), DomainError> {
        let train = array![[1.0, 2.0], [3.0, 4.0]];
        let imputer = KnnImputer::fit(train.view(), &settings(1, ImputerWeights::Uniform))?;
        let out = imputer.transform(array![[f64::NAN, f64::NAN]].view())?;
        assert_eq!(out, array![[2.0, 3.0]]);
        Ok(())
    }

    #[test]
    fn test_shape_mismatch_is_rejected() -> Result<(), DomainError> {
        let imputer = KnnImputer::fit(
            array![[1.0, 2.0]].view(),
            &settings(1, ImputerWeights::Uniform),
        )?;
        let res = imputer.transform(array![[1.0, 2.0, 3.0]].view());
        assert!(matches!(
            res,
            Err(DomainError::ShapeMismatch {
                expected: 2,
                actual: 3
            })
        ));
        Ok(())
    }

    #[test]
    fn test_missing_training_cells_survive_json() -> anyhow::Result<()> {
        let train = array![[1.0, f64::NAN], [2.0, 20.0], [3.0, 30.0]];
        let imputer = KnnImputer::fit(train.view(), &settings(1, ImputerWeights::Uniform))?;

        let json = serde_json::to_string(&imputer)?;
        let restored: KnnImputer = serde_json::from_str(&json)?;

        assert_eq!(restored.fit_x.dim(), (3, 2));
        assert!(restored.fit_x[[0, 1]].is_nan());
        assert_eq!(restored.fit_x[[2, 1]], 30.0);
        let query = array![[1.1, f64::NAN]];
        assert_eq!(restored.transform(query.view())?, imputer.transform(query.view())?);
        Ok(())
    }

    #[test]
    fn test_empty_training_set_is_rejected() {
        let empty = Array2::<f64>::zeros((0, 2));
        let res = KnnImputer::fit(empty.view(), &settings(3, ImputerWeights::Uniform));
        assert!(matches!(res, Err(DomainError::EmptySample(_))));
    }
}
