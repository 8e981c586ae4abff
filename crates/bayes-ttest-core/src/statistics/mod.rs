//! Trace statistics: moments, credible intervals and chain diagnostics.
//!
//! - **Moments**: mean, unbiased variance, standard deviation
//! - **Credible intervals**: highest posterior density interval
//! - **Mixing**: effective sample size and split R-hat

pub mod welch;

use crate::constants::ESS_MAX_LAG;

/// Arithmetic mean. `NaN` for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Unbiased sample variance. `NaN` with fewer than two values.
pub fn variance(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return f64::NAN;
    }
    let m = mean(values);
    values.iter().map(|&x| (x - m) * (x - m)).sum::<f64>() / (n - 1) as f64
}

/// Unbiased sample standard deviation.
pub fn std_dev(values: &[f64]) -> f64 {
    variance(values).sqrt()
}

/// Fraction of values strictly greater than zero.
pub fn fraction_positive(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().filter(|&&x| x > 0.0).count() as f64 / values.len() as f64
}

/// Highest posterior density interval containing `mass` of the draws.
///
/// Returns the narrowest window over the sorted draws that spans
/// `floor(mass * n)` positions. `None` for an empty slice or a mass outside
/// `(0, 1]`.
pub fn hpd_interval(values: &[f64], mass: f64) -> Option<(f64, f64)> {
    if values.is_empty() || !(mass > 0.0 && mass <= 1.0) {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let n = sorted.len();
    let span = ((mass * n as f64).floor() as usize).min(n - 1);
    let (low_idx, _) = (0..n - span)
        .map(|i| (i, sorted[i + span] - sorted[i]))
        .min_by(|a, b| a.1.total_cmp(&b.1))?;

    Some((sorted[low_idx], sorted[low_idx + span]))
}

/// Compute effective sample size of a chain accounting for autocorrelation.
///
/// ESS = N / (1 + 2 * Σ_k ρ_k)
/// where ρ_k is the lag-k autocorrelation, summed until it first drops
/// below 0.05.
pub fn effective_sample_size(chain: &[f64]) -> f64 {
    let n = chain.len();
    if n < 2 {
        return n as f64;
    }

    let mean = mean(chain);
    let var: f64 = chain.iter().map(|&x| (x - mean) * (x - mean)).sum::<f64>() / n as f64;

    if var < 1e-12 {
        return n as f64;
    }

    let mut sum_rho = 0.0;
    for k in 1..=ESS_MAX_LAG.min(n / 2) {
        let rho_k = autocorrelation(chain, k, mean, var);
        if rho_k < 0.05 {
            break;
        }
        sum_rho += rho_k;
    }

    n as f64 / (1.0 + 2.0 * sum_rho)
}

/// Compute lag-k autocorrelation.
fn autocorrelation(chain: &[f64], k: usize, mean: f64, var: f64) -> f64 {
    let n = chain.len();
    if k >= n {
        return 0.0;
    }

    let cov: f64 = (0..(n - k))
        .map(|i| (chain[i] - mean) * (chain[i + k] - mean))
        .sum::<f64>()
        / (n - k) as f64;

    cov / var
}

/// Split potential scale reduction factor (split R-hat).
///
/// Each chain is cut into two halves (the middle draw is dropped for odd
/// lengths) and the between/within-half variances are compared. Values near
/// 1 indicate the halves agree. `None` when a half would hold fewer than two
/// draws or the chains have different lengths.
pub fn split_rhat(chains: &[&[f64]]) -> Option<f64> {
    let len = chains.first()?.len();
    if chains.iter().any(|c| c.len() != len) {
        return None;
    }
    let half = len / 2;
    if half < 2 {
        return None;
    }

    let halves: Vec<&[f64]> = chains
        .iter()
        .flat_map(|c| [&c[..half], &c[len - half..]])
        .collect();

    let n = half as f64;
    let within = mean(&halves.iter().map(|h| variance(h)).collect::<Vec<_>>());
    let half_means: Vec<f64> = halves.iter().map(|h| mean(h)).collect();
    let between = n * variance(&half_means);

    if within <= 0.0 {
        return Some(if between <= 0.0 { 1.0 } else { f64::INFINITY });
    }

    let var_hat = (n - 1.0) / n * within + between / n;
    Some((var_hat / within).sqrt())
}
