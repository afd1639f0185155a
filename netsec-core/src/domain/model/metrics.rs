// netsec-core/src/domain/model/metrics.rs

use ndarray::ArrayView1;

use crate::domain::entity::ClassificationMetricArtifact;
use crate::domain::error::DomainError;

/// Binary f1 / precision / recall with the positive class `1.0`.
/// An undefined ratio (no predicted or no actual positives) scores 0.
pub fn classification_score(
    y_true: ArrayView1<'_, f64>,
    y_pred: ArrayView1<'_, f64>,
) -> Result<ClassificationMetricArtifact, DomainError> {
    if y_true.len() != y_pred.len() {
        return Err(DomainError::LengthMismatch {
            left: y_true.len(),
            right: y_pred.len(),
        });
    }
    if y_true.is_empty() {
        return Err(DomainError::EmptySample("evaluation labels".into()));
    }

    let (mut tp, mut fp, mut fn_) = (0usize, 0usize, 0usize);
    for (t, p) in y_true.iter().zip(y_pred.iter()) {
        match (*t == 1.0, *p == 1.0) {
            (true, true) => tp += 1,
            (false, true) => fp += 1,
            (true, false) => fn_ += 1,
            (false, false) => {}
        }
    }

    let ratio = |num: usize, den: usize| if den == 0 { 0.0 } else { num as f64 / den as f64 };
    let precision = ratio(tp, tp + fp);
    let recall = ratio(tp, tp + fn_);
    let f1 = if precision + recall == 0.0 {
        0.0
    } else {
        2.0 * precision * recall / (precision + recall)
    };

    Ok(ClassificationMetricArtifact {
        f1_score: f1,
        precision_score: precision,
        recall_score: recall,
    })
}
