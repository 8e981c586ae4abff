//! Result types for a two-group comparison.

use core::fmt;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::RunConfig;
use crate::model::{PooledStats, PriorSpec};
use crate::statistics::welch::WelchTest;
use crate::types::{Parameter, Trace};

/// Posterior summary of one scalar quantity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuantitySummary {
    /// Posterior mean (average of the draws).
    pub mean: f64,

    /// Posterior standard deviation.
    pub std_dev: f64,

    /// Highest posterior density interval at the configured mass.
    pub hpd: (f64, f64),

    /// Fraction of draws strictly above zero.
    pub prob_positive: f64,
}

/// Mixing diagnostics of one latent parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParameterDiagnostics {
    /// Effective sample size, summed over chains.
    pub ess: f64,

    /// Split R-hat across all chains; `None` for very short traces.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rhat: Option<f64>,

    /// Post-burn-in acceptance rate, if the engine reports one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acceptance_rate: Option<f64>,
}

/// Summaries of the quantities derived from the parameter traces.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedSummaries {
    /// `mu_1 − mu_2`.
    pub difference_of_means: QuantitySummary,
    /// `sigma_1 − sigma_2`.
    pub difference_of_scales: QuantitySummary,
    /// Standardized effect size.
    pub effect_size: QuantitySummary,
    /// `ln nu`.
    pub normality: QuantitySummary,
}

/// Full traces kept for plotting or downstream analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultTraces {
    /// Draws of `mu_1`.
    pub group1_mean: Trace,
    /// Draws of `mu_2`.
    pub group2_mean: Trace,
    /// Draws of `mu_1 − mu_2`.
    pub difference_of_means: Trace,
    /// Draws of the effect size.
    pub effect_size: Trace,
}

/// Non-fatal conditions noticed during a comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ComparisonWarning {
    /// Rendering failed; the numeric result is unaffected.
    VisualizationFailed {
        /// Renderer error message.
        message: String,
    },

    /// Few effectively independent draws for a parameter.
    LowEffectiveSampleSize {
        /// Affected parameter.
        parameter: Parameter,
        /// Its ESS.
        ess: f64,
    },

    /// Chain halves disagree for a parameter.
    HighRhat {
        /// Affected parameter.
        parameter: Parameter,
        /// Its split R-hat.
        rhat: f64,
    },
}

impl fmt::Display for ComparisonWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComparisonWarning::VisualizationFailed { message } => {
                write!(f, "visualization failed: {}", message)
            }
            ComparisonWarning::LowEffectiveSampleSize { parameter, ess } => write!(
                f,
                "low effective sample size for '{}': {:.0}",
                parameter, ess
            ),
            ComparisonWarning::HighRhat { parameter, rhat } => {
                write!(f, "high R-hat for '{}': {:.3}", parameter, rhat)
            }
        }
    }
}

/// Outcome of comparing two groups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    /// Posterior mean of `mu_1`.
    pub group1_mean: f64,

    /// Posterior mean of `mu_2`.
    pub group2_mean: f64,

    /// Posterior mean of `mu_1 − mu_2`.
    pub difference_of_means: f64,

    /// Posterior mean of the standardized effect size.
    pub effect_size: f64,

    /// Posterior mean of `ln nu`.
    pub normality: f64,

    /// Summaries of every latent parameter.
    pub parameters: BTreeMap<Parameter, QuantitySummary>,

    /// Summaries of the derived quantities.
    pub derived: DerivedSummaries,

    /// Mixing diagnostics per latent parameter.
    pub diagnostics: BTreeMap<Parameter, ParameterDiagnostics>,

    /// Priors the model was fitted with.
    pub priors: BTreeMap<Parameter, PriorSpec>,

    /// Pooled statistics the priors were derived from.
    pub pooled: PooledStats,

    /// Run protocol used.
    pub run: RunConfig,

    /// Number of chains behind the traces.
    pub chains: usize,

    /// Credible mass of the HPD intervals.
    pub credible_mass: f64,

    /// Sampling engine name.
    pub engine: String,

    /// Welch's t-test on the same samples, for contrast.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequentist: Option<WelchTest>,

    /// Full traces, present when visualization or trace retention was
    /// requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub traces: Option<ResultTraces>,

    /// Non-fatal conditions.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<ComparisonWarning>,
}

impl ComparisonResult {
    /// Posterior probability that group 1's mean exceeds group 2's.
    pub fn prob_group1_greater(&self) -> f64 {
        self.derived.difference_of_means.prob_positive
    }

    /// True if the HPD interval of the difference of means excludes zero.
    pub fn credible_difference(&self) -> bool {
        let (low, high) = self.derived.difference_of_means.hpd;
        low > 0.0 || high < 0.0
    }

    /// True if any diagnostic warning was raised.
    pub fn has_mixing_warnings(&self) -> bool {
        self.warnings.iter().any(|w| {
            matches!(
                w,
                ComparisonWarning::LowEffectiveSampleSize { .. } | ComparisonWarning::HighRhat { .. }
            )
        })
    }
}
