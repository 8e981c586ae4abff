//! Per-draw derived quantities.
//!
//! Every derivation is an elementwise map over aligned traces, so the
//! uncertainty of the inputs carries over draw by draw:
//!
//! ```text
//! Δμ_k = μ1_k − μ2_k
//! d_k  = (μ1_k − μ2_k) / √((σ1_k² + σ2_k²) / 2)
//! η_k  = ln ν_k
//! ```
//!
//! All functions are pure: the same input traces always give bit-identical
//! outputs.

use core::fmt;

use crate::engine::PosteriorTraces;
use crate::types::{Parameter, Trace};

/// Errors raised while deriving quantities from traces.
#[derive(Debug, Clone, PartialEq)]
pub enum DeriveError {
    /// Two traces that must be aligned have different lengths.
    LengthMismatch {
        /// Left-hand parameter.
        left: Parameter,
        /// Right-hand parameter.
        right: Parameter,
    },

    /// A draw that must be strictly positive is not.
    NonPositive {
        /// Offending parameter.
        parameter: Parameter,
        /// Draw index.
        index: usize,
        /// The draw.
        value: f64,
    },

    /// A required trace is missing from the engine output.
    MissingTrace {
        /// Missing parameter.
        parameter: Parameter,
    },

    /// A required trace has no draws.
    EmptyTrace {
        /// Empty parameter.
        parameter: Parameter,
    },
}

impl fmt::Display for DeriveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeriveError::LengthMismatch { left, right } => {
                write!(f, "traces of '{}' and '{}' have different lengths", left, right)
            }
            DeriveError::NonPositive {
                parameter,
                index,
                value,
            } => write!(
                f,
                "draw {} of '{}' is {} but must be strictly positive",
                index, parameter, value
            ),
            DeriveError::MissingTrace { parameter } => {
                write!(f, "sampling engine returned no trace for '{}'", parameter)
            }
            DeriveError::EmptyTrace { parameter } => {
                write!(f, "trace of '{}' has no draws", parameter)
            }
        }
    }
}

impl std::error::Error for DeriveError {}

fn check_aligned(
    (left, a): (Parameter, &Trace),
    (right, b): (Parameter, &Trace),
) -> Result<(), DeriveError> {
    if a.len() != b.len() {
        return Err(DeriveError::LengthMismatch { left, right });
    }
    Ok(())
}

fn check_positive(parameter: Parameter, trace: &Trace) -> Result<(), DeriveError> {
    match trace
        .values()
        .iter()
        .position(|&v| !(v > 0.0 && v.is_finite()))
    {
        Some(index) => Err(DeriveError::NonPositive {
            parameter,
            index,
            value: trace.values()[index],
        }),
        None => Ok(()),
    }
}

/// Elementwise `mu_1 − mu_2`.
pub fn difference_of_means(mu_1: &Trace, mu_2: &Trace) -> Result<Trace, DeriveError> {
    check_aligned((Parameter::Mu1, mu_1), (Parameter::Mu2, mu_2))?;
    Ok(mu_1
        .values()
        .iter()
        .zip(mu_2.values())
        .map(|(a, b)| a - b)
        .collect::<Vec<_>>()
        .into())
}

/// Elementwise `sigma_1 − sigma_2`.
pub fn difference_of_scales(sigma_1: &Trace, sigma_2: &Trace) -> Result<Trace, DeriveError> {
    check_aligned((Parameter::Sigma1, sigma_1), (Parameter::Sigma2, sigma_2))?;
    Ok(sigma_1
        .values()
        .iter()
        .zip(sigma_2.values())
        .map(|(a, b)| a - b)
        .collect::<Vec<_>>()
        .into())
}

/// Standardized effect size per draw: the difference of means divided by
/// the root mean square of the two scales.
///
/// Both scale traces must be strictly positive at every draw.
pub fn effect_size(
    mu_1: &Trace,
    mu_2: &Trace,
    sigma_1: &Trace,
    sigma_2: &Trace,
) -> Result<Trace, DeriveError> {
    check_aligned((Parameter::Mu1, mu_1), (Parameter::Mu2, mu_2))?;
    check_aligned((Parameter::Mu1, mu_1), (Parameter::Sigma1, sigma_1))?;
    check_aligned((Parameter::Mu1, mu_1), (Parameter::Sigma2, sigma_2))?;
    check_positive(Parameter::Sigma1, sigma_1)?;
    check_positive(Parameter::Sigma2, sigma_2)?;

    let values = mu_1
        .values()
        .iter()
        .zip(mu_2.values())
        .zip(sigma_1.values().iter().zip(sigma_2.values()))
        .map(|((m1, m2), (s1, s2))| (m1 - m2) / ((s1 * s1 + s2 * s2) / 2.0).sqrt())
        .collect::<Vec<_>>();
    Ok(values.into())
}

/// Natural log of the degrees-of-freedom trace.
///
/// Low values indicate heavy tails; values above ln 30 ≈ 3.4 mean the data
/// look essentially normal.
pub fn normality(nu: &Trace) -> Result<Trace, DeriveError> {
    check_positive(Parameter::Nu, nu)?;
    Ok(nu.values().iter().map(|v| v.ln()).collect::<Vec<_>>().into())
}

/// All derived traces of one comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedTraces {
    /// `mu_1 − mu_2`.
    pub difference_of_means: Trace,
    /// `sigma_1 − sigma_2`.
    pub difference_of_scales: Trace,
    /// Standardized effect size.
    pub effect_size: Trace,
    /// `ln nu`.
    pub normality: Trace,
}

/// Derive every quantity from an engine's output.
pub fn derive_all(posterior: &PosteriorTraces) -> Result<DerivedTraces, DeriveError> {
    let get = |parameter: Parameter| -> Result<&Trace, DeriveError> {
        let trace = posterior
            .get(parameter)
            .ok_or(DeriveError::MissingTrace { parameter })?;
        if trace.is_empty() {
            return Err(DeriveError::EmptyTrace { parameter });
        }
        Ok(trace)
    };

    let (mu_1, mu_2) = (get(Parameter::Mu1)?, get(Parameter::Mu2)?);
    let (sigma_1, sigma_2) = (get(Parameter::Sigma1)?, get(Parameter::Sigma2)?);
    let nu = get(Parameter::Nu)?;

    Ok(DerivedTraces {
        difference_of_means: difference_of_means(mu_1, mu_2)?,
        difference_of_scales: difference_of_scales(sigma_1, sigma_2)?,
        effect_size: effect_size(mu_1, mu_2, sigma_1, sigma_2)?,
        normality: normality(nu)?,
    })
}
