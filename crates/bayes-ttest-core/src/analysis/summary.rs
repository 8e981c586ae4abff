//! Reduction of posterior traces into a [`ComparisonResult`].

use std::collections::BTreeMap;

use crate::config::RunConfig;
use crate::constants::{DEFAULT_CREDIBLE_MASS, LOW_ESS_WARNING};
use crate::engine::PosteriorTraces;
use crate::model::ModelSpec;
use crate::result::{
    ComparisonResult, ComparisonWarning, DerivedSummaries, ParameterDiagnostics, QuantitySummary,
    ResultTraces,
};
use crate::statistics::{self, welch::WelchTest};
use crate::types::Parameter;

use super::derive::{DeriveError, DerivedTraces};

/// Knobs for [`summarize`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SummaryOptions {
    /// Mass of the HPD intervals.
    pub credible_mass: f64,

    /// Keep the full mean and difference traces in the result.
    pub keep_traces: bool,

    /// Split R-hat above which a warning is attached.
    pub rhat_warning: f64,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self {
            credible_mass: DEFAULT_CREDIBLE_MASS,
            keep_traces: false,
            rhat_warning: 1.1,
        }
    }
}

/// Summarize one trace.
pub fn summarize_quantity(values: &[f64], mass: f64) -> QuantitySummary {
    QuantitySummary {
        mean: statistics::mean(values),
        std_dev: statistics::std_dev(values),
        hpd: statistics::hpd_interval(values, mass).unwrap_or((f64::NAN, f64::NAN)),
        prob_positive: statistics::fraction_positive(values),
    }
}

/// Assemble the comparison result from the model, the engine output and the
/// derived traces.
pub fn summarize(
    model: &ModelSpec,
    posterior: &PosteriorTraces,
    derived: DerivedTraces,
    run: &RunConfig,
    engine: &str,
    frequentist: Option<WelchTest>,
    options: &SummaryOptions,
) -> Result<ComparisonResult, DeriveError> {
    let mass = options.credible_mass;

    let mut parameters = BTreeMap::new();
    let mut diagnostics = BTreeMap::new();
    let mut warnings = Vec::new();

    for parameter in Parameter::ALL {
        let trace = posterior
            .get(parameter)
            .ok_or(DeriveError::MissingTrace { parameter })?;
        parameters.insert(parameter, summarize_quantity(trace.values(), mass));

        let chains = posterior.chain_slices(parameter);
        let ess: f64 = chains
            .iter()
            .map(|c| statistics::effective_sample_size(c))
            .sum();
        let rhat = statistics::split_rhat(&chains);

        if ess < LOW_ESS_WARNING {
            tracing::warn!(%parameter, ess, "low effective sample size");
            warnings.push(ComparisonWarning::LowEffectiveSampleSize { parameter, ess });
        }
        if let Some(rhat) = rhat.filter(|&r| r > options.rhat_warning) {
            tracing::warn!(%parameter, rhat, "chain halves disagree");
            warnings.push(ComparisonWarning::HighRhat { parameter, rhat });
        }

        diagnostics.insert(
            parameter,
            ParameterDiagnostics {
                ess,
                rhat,
                acceptance_rate: posterior.acceptance_rate(parameter),
            },
        );
    }

    let derived_summaries = DerivedSummaries {
        difference_of_means: summarize_quantity(derived.difference_of_means.values(), mass),
        difference_of_scales: summarize_quantity(derived.difference_of_scales.values(), mass),
        effect_size: summarize_quantity(derived.effect_size.values(), mass),
        normality: summarize_quantity(derived.normality.values(), mass),
    };

    let traces = if options.keep_traces {
        let trace = |parameter| {
            posterior
                .get(parameter)
                .cloned()
                .ok_or(DeriveError::MissingTrace { parameter })
        };
        Some(ResultTraces {
            group1_mean: trace(Parameter::Mu1)?,
            group2_mean: trace(Parameter::Mu2)?,
            difference_of_means: derived.difference_of_means,
            effect_size: derived.effect_size,
        })
    } else {
        None
    };

    let priors = model.latents.iter().map(|l| (l.parameter, l.prior)).collect();

    Ok(ComparisonResult {
        group1_mean: parameters[&Parameter::Mu1].mean,
        group2_mean: parameters[&Parameter::Mu2].mean,
        difference_of_means: derived_summaries.difference_of_means.mean,
        effect_size: derived_summaries.effect_size.mean,
        normality: derived_summaries.normality.mean,
        parameters,
        derived: derived_summaries,
        diagnostics,
        priors,
        pooled: model.pooled,
        run: *run,
        chains: posterior.chains(),
        credible_mass: mass,
        engine: engine.to_string(),
        frequentist,
        traces,
        warnings,
    })
}
