// netsec-core/src/domain/model/logistic.rs

use ndarray::{Array1, ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

const PROBA_EPS: f64 = 1e-15;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitParams {
    pub learning_rate: f64,
    pub max_iterations: usize,
    pub tolerance: f64,
    pub l2_penalty: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitSummary {
    pub iterations: usize,
    pub converged: bool,
    pub loss: f64,
}

/// Binary logistic regression fitted by full-batch gradient descent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticRegression {
    weights: Array1<f64>,
    intercept: f64,
}

impl LogisticRegression {
    /// Targets must be 0/1 and contain both classes.
    ///
    /// Stops once every gradient component is below `tolerance`; running out
    /// of iterations is reported through `FitSummary::converged`, while a
    /// non-finite loss or weight aborts with `DomainError::Divergence`.
    pub fn fit(
        x: ArrayView2<'_, f64>,
        y: ArrayView1<'_, f64>,
        params: &FitParams,
    ) -> Result<(Self, FitSummary), DomainError> {
        let n = x.nrows();
        if n == 0 {
            return Err(DomainError::EmptySample("training rows".into()));
        }
        if y.len() != n {
            return Err(DomainError::LengthMismatch {
                left: y.len(),
                right: n,
            });
        }
        if let Some(bad) = y.iter().find(|v| **v != 0.0 && **v != 1.0) {
            return Err(DomainError::InvalidTarget(*bad));
        }
        let first = y[0];
        if y.iter().all(|v| *v == first) {
            return Err(DomainError::SingleClass(first));
        }

        let mut model = Self {
            weights: Array1::zeros(x.ncols()),
            intercept: 0.0,
        };
        let n_f = n as f64;
        let mut summary = FitSummary {
            iterations: 0,
            converged: false,
            loss: f64::INFINITY,
        };

        for iteration in 1..=params.max_iterations {
            let proba = model.decision(x).mapv(sigmoid);
            let residual = &proba - &y;

            let grad_w = x.t().dot(&residual) / n_f + &model.weights * params.l2_penalty;
            let grad_b = residual.sum() / n_f;

            model.weights.scaled_add(-params.learning_rate, &grad_w);
            model.intercept -= params.learning_rate * grad_b;

            let penalty = 0.5 * params.l2_penalty * model.weights.dot(&model.weights);
            let loss = log_loss(&proba, y) + penalty;
            if !loss.is_finite()
                || !model.intercept.is_finite()
                || model.weights.iter().any(|w| !w.is_finite())
            {
                return Err(DomainError::Divergence { iteration, loss });
            }

            summary.iterations = iteration;
            summary.loss = loss;

            let max_grad = grad_w
                .iter()
                .fold(grad_b.abs(), |acc, g| acc.max(g.abs()));
            if max_grad < params.tolerance {
                summary.converged = true;
                break;
            }
        }

        Ok((model, summary))
    }

    pub fn n_features(&self) -> usize {
        self.weights.len()
    }

    pub fn predict_proba(&self, x: ArrayView2<'_, f64>) -> Result<Array1<f64>, DomainError> {
        self.check_width(x)?;
        Ok(self.decision(x).mapv(sigmoid))
    }

    /// Hard 0/1 labels at the 0.5 threshold.
    pub fn predict(&self, x: ArrayView2<'_, f64>) -> Result<Array1<f64>, DomainError> {
        Ok(self
            .predict_proba(x)?
            .mapv(|p| if p >= 0.5 { 1.0 } else { 0.0 }))
    }

    fn decision(&self, x: ArrayView2<'_, f64>) -> Array1<f64> {
        x.dot(&self.weights) + self.intercept
    }

    fn check_width(&self, x: ArrayView2<'_, f64>) -> Result<(), DomainError> {
        if x.ncols() != self.n_features() {
            return Err(DomainError::ShapeMismatch {
                expected: self.n_features(),
                actual: x.ncols(),
            });
        }
        Ok(())
    }
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

fn log_loss(proba: &Array1<f64>, y: ArrayView1<'_, f64>) -> f64 {
    let total: f64 = proba
        .iter()
        .zip(y.iter())
        .map(|(p, t)| {
            let p = p.clamp(PROBA_EPS, 1.0 - PROBA_EPS);
            -(t * p.ln() + (1.0 - t) * (1.0 - p).ln())
        })
        .sum();
    total / proba.len() as f64
}
