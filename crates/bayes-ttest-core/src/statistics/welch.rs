//! Welch's unequal-variance t-test, the frequentist counterpart of the
//! Bayesian comparison.

use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, StudentsT};

use super::{mean, variance};

/// Result of a two-sided Welch t-test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WelchTest {
    /// Difference of sample means (group 1 minus group 2).
    pub mean_difference: f64,

    /// t statistic.
    pub t: f64,

    /// Welch–Satterthwaite degrees of freedom.
    pub df: f64,

    /// Two-sided p-value under the null of equal means.
    pub p_value: f64,
}

/// Run Welch's t-test on two samples.
///
/// Returns `None` when either sample has fewer than two observations or
/// both have zero variance (the statistic is undefined).
pub fn welch_t_test(a: &[f64], b: &[f64]) -> Option<WelchTest> {
    if a.len() < 2 || b.len() < 2 {
        return None;
    }
    let (na, nb) = (a.len() as f64, b.len() as f64);
    let (va, vb) = (variance(a) / na, variance(b) / nb);
    let se2 = va + vb;
    if !(se2 > 0.0) {
        return None;
    }

    let mean_difference = mean(a) - mean(b);
    let t = mean_difference / se2.sqrt();
    let df = se2 * se2 / (va * va / (na - 1.0) + vb * vb / (nb - 1.0));

    let dist = StudentsT::new(0.0, 1.0, df).ok()?;
    let p_value = (2.0 * (1.0 - dist.cdf(t.abs()))).clamp(0.0, 1.0);

    Some(WelchTest {
        mean_difference,
        t,
        df,
        p_value,
    })
}
