//! Sampling engine seam.
//!
//! Orchestration code only talks to [`SamplingEngine`]: hand it a
//! [`ModelSpec`] and a [`RunConfig`], get back one [`Trace`] per latent
//! parameter. Any MCMC or variational backend can sit behind the trait; the
//! crate bundles [`MetropolisEngine`].

mod metropolis;

pub use metropolis::{MetropolisConfig, MetropolisEngine};

use core::fmt;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, RunConfig};
use crate::model::ModelSpec;
use crate::types::{Parameter, Trace};

/// Failures signalled by a sampling engine.
#[derive(Debug, Clone, PartialEq)]
pub enum SamplingError {
    /// Run or engine configuration rejected before sampling.
    InvalidConfig(ConfigError),

    /// The starting point has zero posterior density.
    ZeroDensityStart {
        /// Parameter whose prior or likelihood vanished.
        parameter: Parameter,
    },

    /// The chain produced a NaN or infinite draw.
    NonFiniteDraw {
        /// Offending parameter.
        parameter: Parameter,
        /// Iteration at which it appeared.
        iteration: usize,
    },

    /// Chains disagree more than the configured threshold allows.
    NotConverged {
        /// Worst parameter.
        parameter: Parameter,
        /// Its split R-hat.
        rhat: f64,
        /// Configured threshold.
        threshold: f64,
    },

    /// The model references a parameter that has no latent definition.
    UnknownParameter {
        /// Name of the observed node.
        node: String,
        /// Missing parameter.
        parameter: Parameter,
    },

    /// Backend-specific failure from a third-party engine.
    Backend(String),
}

impl fmt::Display for SamplingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SamplingError::InvalidConfig(e) => write!(f, "invalid sampling configuration: {}", e),
            SamplingError::ZeroDensityStart { parameter } => write!(
                f,
                "initial value of '{}' has zero posterior density",
                parameter
            ),
            SamplingError::NonFiniteDraw {
                parameter,
                iteration,
            } => write!(
                f,
                "non-finite draw for '{}' at iteration {}",
                parameter, iteration
            ),
            SamplingError::NotConverged {
                parameter,
                rhat,
                threshold,
            } => write!(
                f,
                "chains did not converge: R-hat for '{}' is {:.3} (threshold {:.3})",
                parameter, rhat, threshold
            ),
            SamplingError::UnknownParameter { node, parameter } => write!(
                f,
                "observed node '{}' references undefined parameter '{}'",
                node, parameter
            ),
            SamplingError::Backend(message) => write!(f, "sampling backend failed: {}", message),
        }
    }
}

impl std::error::Error for SamplingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SamplingError::InvalidConfig(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for SamplingError {
    fn from(e: ConfigError) -> Self {
        SamplingError::InvalidConfig(e)
    }
}

/// Traces returned by an engine, one per latent parameter.
///
/// With several chains each trace is the concatenation of the per-chain
/// traces in chain order, every chain contributing the same number of draws.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PosteriorTraces {
    traces: BTreeMap<Parameter, Trace>,
    chains: usize,
    acceptance: BTreeMap<Parameter, f64>,
}

impl PosteriorTraces {
    /// Traces from a single chain.
    pub fn new(traces: BTreeMap<Parameter, Trace>) -> Self {
        Self {
            traces,
            chains: 1,
            acceptance: BTreeMap::new(),
        }
    }

    /// Record how many chains were concatenated.
    pub fn with_chains(mut self, chains: usize) -> Self {
        self.chains = chains.max(1);
        self
    }

    /// Record per-parameter acceptance rates.
    pub fn with_acceptance(mut self, acceptance: BTreeMap<Parameter, f64>) -> Self {
        self.acceptance = acceptance;
        self
    }

    /// Trace of one parameter.
    pub fn get(&self, parameter: Parameter) -> Option<&Trace> {
        self.traces.get(&parameter)
    }

    /// Number of concatenated chains.
    pub fn chains(&self) -> usize {
        self.chains
    }

    /// Acceptance rate of a parameter's proposals, if the engine reports it.
    pub fn acceptance_rate(&self, parameter: Parameter) -> Option<f64> {
        self.acceptance.get(&parameter).copied()
    }

    /// Iterate over `(parameter, trace)` pairs in parameter order.
    pub fn iter(&self) -> impl Iterator<Item = (Parameter, &Trace)> {
        self.traces.iter().map(|(p, t)| (*p, t))
    }

    /// Per-chain slices of one parameter's trace.
    pub fn chain_slices(&self, parameter: Parameter) -> Vec<&[f64]> {
        match self.traces.get(&parameter) {
            Some(trace) if !trace.is_empty() => {
                let per_chain = trace.len() / self.chains;
                trace.values().chunks(per_chain.max(1)).collect()
            }
            _ => Vec::new(),
        }
    }

    /// Take ownership of the trace map.
    pub fn into_traces(self) -> BTreeMap<Parameter, Trace> {
        self.traces
    }
}

/// A backend that fits a [`ModelSpec`] and returns posterior traces.
///
/// Implementations must validate `run` before doing any work, must not
/// retry internally on failure, and must return traces of
/// `run.retained_len()` draws per chain for every latent parameter.
/// `fit` takes `&self`, so one engine may serve concurrent comparisons.
pub trait SamplingEngine: Send + Sync {
    /// Fit the model and return its traces.
    fn fit(&self, model: &ModelSpec, run: &RunConfig) -> Result<PosteriorTraces, SamplingError>;

    /// Short backend name for logs and reports.
    fn name(&self) -> &'static str {
        "custom"
    }
}

impl<E: SamplingEngine + ?Sized> SamplingEngine for Box<E> {
    fn fit(&self, model: &ModelSpec, run: &RunConfig) -> Result<PosteriorTraces, SamplingError> {
        (**self).fit(model, run)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_error_messages() {
        let err = SamplingError::NonFiniteDraw {
            parameter: Parameter::Sigma2,
            iteration: 1234,
        };
        assert_eq!(
            err.to_string(),
            "non-finite draw for 'sigma_2' at iteration 1234"
        );

        let err = SamplingError::NotConverged {
            parameter: Parameter::Nu,
            rhat: 1.25,
            threshold: 1.01,
        };
        assert_eq!(
            err.to_string(),
            "chains did not converge: R-hat for 'nu' is 1.250 (threshold 1.010)"
        );
    }

    #[test]
    fn test_config_error_source() {
        let err = SamplingError::from(ConfigError::ZeroThin);
        assert_eq!(err, SamplingError::InvalidConfig(ConfigError::ZeroThin));
        assert!(err.source().is_some());
        assert!(SamplingError::Backend("x".to_string()).source().is_none());
    }
}
