// netsec-core/src/domain/drift/ks.rs

use crate::domain::error::DomainError;

/// Result of a two-sample Kolmogorov-Smirnov test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KsOutcome {
    /// Largest distance between the two empirical CDFs, in [0, 1].
    pub statistic: f64,
    /// Asymptotic two-sided p-value.
    pub p_value: f64,
}

pub struct KsTest;

impl KsTest {
    /// Compares the distributions of `base` and `current`.
    /// NaN values are ignored; an empty sample (after filtering) is an error.
    pub fn two_sample(base: &[f64], current: &[f64]) -> Result<KsOutcome, DomainError> {
        let a = sorted_finite(base);
        let b = sorted_finite(current);
        if a.is_empty() {
            return Err(DomainError::EmptySample("base sample".into()));
        }
        if b.is_empty() {
            return Err(DomainError::EmptySample("current sample".into()));
        }
        let statistic = Self::statistic(&a, &b);

        let n1 = a.len() as f64;
        let n2 = b.len() as f64;
        let en = (n1 * n2 / (n1 + n2)).sqrt();
        let p_value = kolmogorov_survival((en + 0.12 + 0.11 / en) * statistic);

        Ok(KsOutcome { statistic, p_value })
    }

    // Walks both sorted samples one distinct value at a time so ties
    // move both CDFs together.
    fn statistic(a: &[f64], b: &[f64]) -> f64 {
        let (n1, n2) = (a.len(), b.len());
        let (mut i, mut j) = (0usize, 0usize);
        let mut d: f64 = 0.0;
        while i < n1 && j < n2 {
            let v = a[i].min(b[j]);
            while i < n1 && a[i] <= v {
                i += 1;
            }
            while j < n2 && b[j] <= v {
                j += 1;
            }
            d = d.max((i as f64 / n1 as f64 - j as f64 / n2 as f64).abs());
        }
        d
    }
}

fn sorted_finite(values: &[f64]) -> Vec<f64> {
    let mut out: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    out.sort_by(f64::total_cmp);
    out
}

/// Q_KS(lambda) = 2 * sum_{k>=1} (-1)^(k-1) exp(-2 k^2 lambda^2)
fn kolmogorov_survival(lambda: f64) -> f64 {
    // Series does not converge near zero, where Q_KS -> 1.
    if lambda < 1e-3 {
        return 1.0;
    }
    let a2 = -2.0 * lambda * lambda;
    let mut fac = 2.0;
    let mut sum = 0.0;
    let mut previous: f64 = 0.0;
    for k in 1..=100 {
        let kf = k as f64;
        let term = fac * (a2 * kf * kf).exp();
        sum += term;
        if term.abs() <= 1e-3 * previous || term.abs() <= 1e-8 * sum {
            return sum.clamp(0.0, 1.0);
        }
        fac = -fac;
        previous = term.abs();
    }
    1.0
}
