//! Errors returned by [`BayesianTwoGroupComparator::compare`](crate::BayesianTwoGroupComparator::compare).

use std::fmt;

use bayes_ttest_core::analysis::DeriveError;
use bayes_ttest_core::{ConfigError, ModelError, SamplingError};

/// Why a comparison could not produce a result.
///
/// Visualization failures are not errors here; they are attached to the
/// returned result as a warning instead.
#[derive(Debug, Clone, PartialEq)]
pub enum ComparisonError {
    /// The caller supplied a group collection whose size is not 2.
    InvalidGroupCount {
        /// Number of groups supplied.
        got: usize,
    },

    /// Synthetic generation was requested with a sample size of zero.
    InvalidSampleSize,

    /// The run protocol or credible mass was rejected before sampling.
    InvalidRunConfig(ConfigError),

    /// A sample cannot parameterise the model (empty, non-finite, constant).
    InvalidSample(ModelError),

    /// The sampling engine failed; propagated verbatim.
    SamplingFailed(SamplingError),

    /// The engine returned traces that cannot be reduced: a trace is
    /// missing, empty or misaligned, or a scale draw is not positive.
    ///
    /// This covers invalid engine output that the engine itself did not
    /// report as a failure.
    Derivation(DeriveError),
}

impl fmt::Display for ComparisonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComparisonError::InvalidGroupCount { got } => {
                write!(f, "expected exactly 2 groups, got {}", got)
            }
            ComparisonError::InvalidSampleSize => {
                write!(f, "synthetic sample size must be positive")
            }
            ComparisonError::InvalidRunConfig(e) => write!(f, "invalid run configuration: {}", e),
            ComparisonError::InvalidSample(e) => write!(f, "invalid sample: {}", e),
            ComparisonError::SamplingFailed(e) => write!(f, "sampling failed: {}", e),
            ComparisonError::Derivation(e) => write!(f, "could not summarize traces: {}", e),
        }
    }
}

impl std::error::Error for ComparisonError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ComparisonError::InvalidRunConfig(e) => Some(e),
            ComparisonError::InvalidSample(e) => Some(e),
            ComparisonError::SamplingFailed(e) => Some(e),
            ComparisonError::Derivation(e) => Some(e),
            _ => None,
        }
    }
}

impl From<SamplingError> for ComparisonError {
    fn from(e: SamplingError) -> Self {
        ComparisonError::SamplingFailed(e)
    }
}

impl From<ModelError> for ComparisonError {
    fn from(e: ModelError) -> Self {
        ComparisonError::InvalidSample(e)
    }
}

impl From<DeriveError> for ComparisonError {
    fn from(e: DeriveError) -> Self {
        ComparisonError::Derivation(e)
    }
}
