//! Core data types: observed samples, parameter identifiers and traces.

use core::fmt;

use serde::{Deserialize, Serialize};

/// One of the two groups under comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Group {
    /// First group (labelled `1` in parameter names).
    First,
    /// Second group (labelled `2` in parameter names).
    Second,
}

impl Group {
    /// Both groups in label order.
    pub const BOTH: [Group; 2] = [Group::First, Group::Second];

    /// Numeric label used in parameter and node names.
    pub fn label(self) -> u8 {
        match self {
            Group::First => 1,
            Group::Second => 2,
        }
    }
}

/// Latent parameters of the two-group Student-t model.
///
/// The group means and scales are per group; `Nu` is the shared
/// degrees-of-freedom (robustness) parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Parameter {
    /// Location of group 1.
    #[serde(rename = "mu_1")]
    Mu1,
    /// Location of group 2.
    #[serde(rename = "mu_2")]
    Mu2,
    /// Scale of group 1.
    #[serde(rename = "sigma_1")]
    Sigma1,
    /// Scale of group 2.
    #[serde(rename = "sigma_2")]
    Sigma2,
    /// Shared degrees of freedom.
    Nu,
}

impl Parameter {
    /// All latent parameters in update order.
    pub const ALL: [Parameter; 5] = [
        Parameter::Mu1,
        Parameter::Mu2,
        Parameter::Sigma1,
        Parameter::Sigma2,
        Parameter::Nu,
    ];

    /// Location parameter of `group`.
    pub fn mean(group: Group) -> Self {
        match group {
            Group::First => Parameter::Mu1,
            Group::Second => Parameter::Mu2,
        }
    }

    /// Scale parameter of `group`.
    pub fn scale(group: Group) -> Self {
        match group {
            Group::First => Parameter::Sigma1,
            Group::Second => Parameter::Sigma2,
        }
    }

    /// Stable name used in logs, reports and JSON.
    pub fn name(self) -> &'static str {
        match self {
            Parameter::Mu1 => "mu_1",
            Parameter::Mu2 => "mu_2",
            Parameter::Sigma1 => "sigma_1",
            Parameter::Sigma2 => "sigma_2",
            Parameter::Nu => "nu",
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An observed sample: an ordered, immutable sequence of real numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sample {
    values: Vec<f64>,
}

impl Sample {
    /// Wrap a vector of observations.
    pub fn new(values: Vec<f64>) -> Self {
        Self { values }
    }

    /// Observations in their original order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if the sample holds no observations.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Sum of the observations.
    pub fn sum(&self) -> f64 {
        self.values.iter().sum()
    }

    /// Arithmetic mean, or `None` for an empty sample.
    pub fn mean(&self) -> Option<f64> {
        if self.values.is_empty() {
            None
        } else {
            Some(self.sum() / self.values.len() as f64)
        }
    }
}

impl From<Vec<f64>> for Sample {
    fn from(values: Vec<f64>) -> Self {
        Self::new(values)
    }
}

impl From<&[f64]> for Sample {
    fn from(values: &[f64]) -> Self {
        Self::new(values.to_vec())
    }
}

/// Ordered draws for one quantity, as produced by a sampling engine or
/// derived from other traces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Trace {
    values: Vec<f64>,
}

impl Trace {
    /// Wrap a vector of draws.
    pub fn new(values: Vec<f64>) -> Self {
        Self { values }
    }

    /// Draws in sampling order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of draws.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if the trace holds no draws.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Posterior mean estimate (average of the draws).
    ///
    /// Returns `NaN` for an empty trace.
    pub fn mean(&self) -> f64 {
        crate::statistics::mean(&self.values)
    }

    /// Consume the trace, returning its draws.
    pub fn into_inner(self) -> Vec<f64> {
        self.values
    }
}

impl From<Vec<f64>> for Trace {
    fn from(values: Vec<f64>) -> Self {
        Self::new(values)
    }
}
