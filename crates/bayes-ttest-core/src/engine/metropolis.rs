//! Adaptive random-walk Metropolis-within-Gibbs sampler.
//!
//! Each iteration visits the latent parameters in model order and proposes a
//! scalar Gaussian step for one parameter at a time:
//!
//! ```text
//! θ'_i = θ_i + s_i · z,   z ~ N(0, 1)
//! accept with probability min(1, p(θ' | y) / p(θ | y))
//! ```
//!
//! Only the likelihood nodes that depend on `θ_i` are re-evaluated. During
//! burn-in the step size `s_i` is rescaled every `tune_interval` iterations
//! from the acceptance rate of the last window; after burn-in it is frozen so
//! the retained chain is a valid Markov chain.

use std::collections::BTreeMap;
use std::f64::consts::PI;

use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, StandardNormal};
use rand_xoshiro::Xoshiro256PlusPlus;
use statrs::function::gamma::ln_gamma;

use super::{PosteriorTraces, SamplingEngine, SamplingError};
use crate::config::{ConfigError, RunConfig};
use crate::constants::{DEFAULT_SEED, DEFAULT_TUNE_INTERVAL};
use crate::model::{ModelSpec, PriorSpec};
use crate::statistics::split_rhat;
use crate::types::{Parameter, Trace};

/// Configuration for [`MetropolisEngine`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetropolisConfig {
    /// Base RNG seed; chain `c` uses `seed + c`.
    pub seed: u64,

    /// Number of independent chains. Default: 1.
    pub chains: usize,

    /// Burn-in iterations between step-size adjustments. Default: 100.
    pub tune_interval: usize,

    /// Fail with [`SamplingError::NotConverged`] when any split R-hat exceeds
    /// this value. Default: None (diagnostics only).
    pub rhat_threshold: Option<f64>,
}

impl Default for MetropolisConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            chains: 1,
            tune_interval: DEFAULT_TUNE_INTERVAL,
            rhat_threshold: None,
        }
    }
}

impl MetropolisConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.chains == 0 {
            return Err(ConfigError::ZeroChains);
        }
        if let Some(threshold) = self.rhat_threshold {
            if !(threshold.is_finite() && threshold > 1.0) {
                return Err(ConfigError::InvalidConvergenceThreshold);
            }
        }
        Ok(())
    }
}

/// Bundled sampling engine: adaptive Metropolis-within-Gibbs over the
/// latent parameters of a [`ModelSpec`].
///
/// Deterministic: the same seed, model and run configuration always produce
/// bit-identical traces, with or without the `parallel` feature.
#[derive(Debug, Clone, Default)]
pub struct MetropolisEngine {
    config: MetropolisConfig,
}

impl MetropolisEngine {
    /// Create an engine with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine from an explicit configuration.
    pub fn with_config(config: MetropolisConfig) -> Self {
        Self { config }
    }

    /// Set the base RNG seed.
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    /// Set the number of independent chains.
    pub fn chains(mut self, chains: usize) -> Self {
        self.config.chains = chains;
        self
    }

    /// Set the burn-in tuning interval.
    pub fn tune_interval(mut self, iterations: usize) -> Self {
        self.config.tune_interval = iterations;
        self
    }

    /// Require every split R-hat to stay at or below `threshold`.
    pub fn rhat_threshold(mut self, threshold: f64) -> Self {
        self.config.rhat_threshold = Some(threshold);
        self
    }

    /// Current configuration.
    pub fn config(&self) -> &MetropolisConfig {
        &self.config
    }

    fn run_chains(
        &self,
        model: &ModelSpec,
        run: &RunConfig,
    ) -> Result<Vec<ChainOutput>, SamplingError> {
        let run_one = |chain: usize| {
            let seed = self.config.seed.wrapping_add(chain as u64);
            ChainSampler::new(model, seed, self.config.tune_interval)?.run(run, chain)
        };

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            if self.config.chains > 1 {
                return (0..self.config.chains).into_par_iter().map(run_one).collect();
            }
        }

        (0..self.config.chains).map(run_one).collect()
    }
}

impl SamplingEngine for MetropolisEngine {
    fn fit(&self, model: &ModelSpec, run: &RunConfig) -> Result<PosteriorTraces, SamplingError> {
        run.validate()?;
        self.config.validate()?;

        let chains = self.run_chains(model, run)?;

        let n_latent = model.latents.len();
        let mut merged: Vec<Vec<f64>> = (0..n_latent)
            .map(|_| Vec::with_capacity(run.retained_len() * chains.len()))
            .collect();
        let mut acceptance = vec![0.0; n_latent];
        for chain in &chains {
            for i in 0..n_latent {
                merged[i].extend_from_slice(&chain.draws[i]);
                acceptance[i] += chain.acceptance[i] / chains.len() as f64;
            }
        }

        let traces: BTreeMap<Parameter, Trace> = model
            .latents
            .iter()
            .zip(merged)
            .map(|(latent, draws)| (latent.parameter, Trace::new(draws)))
            .collect();
        let acceptance: BTreeMap<Parameter, f64> = model
            .latents
            .iter()
            .zip(acceptance)
            .map(|(latent, rate)| (latent.parameter, rate))
            .collect();

        let posterior = PosteriorTraces::new(traces)
            .with_chains(chains.len())
            .with_acceptance(acceptance);

        if let Some(threshold) = self.config.rhat_threshold {
            check_convergence(&posterior, threshold)?;
        }

        Ok(posterior)
    }

    fn name(&self) -> &'static str {
        "metropolis"
    }
}

/// Fail on the parameter with the worst split R-hat above `threshold`.
fn check_convergence(posterior: &PosteriorTraces, threshold: f64) -> Result<(), SamplingError> {
    let worst = posterior
        .iter()
        .filter_map(|(parameter, _)| {
            split_rhat(&posterior.chain_slices(parameter)).map(|rhat| (parameter, rhat))
        })
        .max_by(|a, b| a.1.total_cmp(&b.1));

    match worst {
        Some((parameter, rhat)) if rhat > threshold => Err(SamplingError::NotConverged {
            parameter,
            rhat,
            threshold,
        }),
        _ => Ok(()),
    }
}

/// Retained draws and post-burn-in acceptance rates of one chain.
struct ChainOutput {
    draws: Vec<Vec<f64>>,
    acceptance: Vec<f64>,
}

/// Likelihood node resolved to latent indices.
struct Node<'a> {
    data: &'a [f64],
    location: usize,
    scale: usize,
    dof: usize,
}

/// Single-chain sampler state.
struct ChainSampler<'a> {
    priors: Vec<PriorSpec>,
    parameters: Vec<Parameter>,
    nodes: Vec<Node<'a>>,
    /// Node indices whose likelihood depends on each latent.
    dependents: Vec<Vec<usize>>,
    state: Vec<f64>,
    steps: Vec<f64>,
    prior_lp: Vec<f64>,
    node_ll: Vec<f64>,
    tune_interval: usize,
    rng: Xoshiro256PlusPlus,
}

impl<'a> ChainSampler<'a> {
    fn new(model: &'a ModelSpec, seed: u64, tune_interval: usize) -> Result<Self, SamplingError> {
        let index_of = |node: &str, parameter: Parameter| {
            model
                .latents
                .iter()
                .position(|l| l.parameter == parameter)
                .ok_or_else(|| SamplingError::UnknownParameter {
                    node: node.to_string(),
                    parameter,
                })
        };

        let nodes = model
            .observed
            .iter()
            .map(|o| {
                Ok(Node {
                    data: o.data.values(),
                    location: index_of(&o.name, o.location)?,
                    scale: index_of(&o.name, o.scale)?,
                    dof: index_of(&o.name, o.dof)?,
                })
            })
            .collect::<Result<Vec<_>, SamplingError>>()?;

        let dependents = (0..model.latents.len())
            .map(|i| {
                nodes
                    .iter()
                    .enumerate()
                    .filter(|(_, n)| n.location == i || n.scale == i || n.dof == i)
                    .map(|(j, _)| j)
                    .collect()
            })
            .collect();

        let priors: Vec<PriorSpec> = model.latents.iter().map(|l| l.prior).collect();
        let parameters: Vec<Parameter> = model.latents.iter().map(|l| l.parameter).collect();
        let state: Vec<f64> = model.latents.iter().map(|l| l.initial).collect();

        let prior_lp: Vec<f64> = priors
            .iter()
            .zip(&state)
            .map(|(prior, &x)| prior.ln_density(x))
            .collect();
        if let Some(i) = prior_lp.iter().position(|lp| !lp.is_finite()) {
            return Err(SamplingError::ZeroDensityStart {
                parameter: parameters[i],
            });
        }

        let node_ll: Vec<f64> = nodes.iter().map(|n| n.ln_likelihood(&state)).collect();
        if let Some(j) = node_ll.iter().position(|ll| !ll.is_finite()) {
            return Err(SamplingError::ZeroDensityStart {
                parameter: parameters[nodes[j].scale],
            });
        }

        Ok(Self {
            priors,
            parameters,
            nodes,
            dependents,
            state,
            steps: model.latents.iter().map(|l| l.proposal_scale).collect(),
            prior_lp,
            node_ll,
            tune_interval: tune_interval.max(1),
            rng: Xoshiro256PlusPlus::seed_from_u64(seed),
        })
    }

    fn run(mut self, run: &RunConfig, chain: usize) -> Result<ChainOutput, SamplingError> {
        let n_latent = self.state.len();
        let mut draws: Vec<Vec<f64>> = (0..n_latent)
            .map(|_| Vec::with_capacity(run.retained_len()))
            .collect();

        let mut window_accepts = vec![0usize; n_latent];
        let mut kept_accepts = vec![0usize; n_latent];

        for t in 0..run.total_iterations {
            for i in 0..n_latent {
                if self.update(i) {
                    window_accepts[i] += 1;
                    if t >= run.burn_in {
                        kept_accepts[i] += 1;
                    }
                }
            }

            if t < run.burn_in && (t + 1) % self.tune_interval == 0 {
                for i in 0..n_latent {
                    let rate = window_accepts[i] as f64 / self.tune_interval as f64;
                    self.steps[i] *= tune_factor(rate);
                    window_accepts[i] = 0;
                }
            }

            if run.keeps(t) {
                for i in 0..n_latent {
                    let value = self.state[i];
                    if !value.is_finite() {
                        return Err(SamplingError::NonFiniteDraw {
                            parameter: self.parameters[i],
                            iteration: t,
                        });
                    }
                    draws[i].push(value);
                }
            }
        }

        let post_burn = (run.total_iterations - run.burn_in) as f64;
        let acceptance: Vec<f64> = kept_accepts.iter().map(|&a| a as f64 / post_burn).collect();

        tracing::debug!(
            chain,
            retained = run.retained_len(),
            acceptance = ?acceptance,
            steps = ?self.steps,
            "metropolis chain finished"
        );

        Ok(ChainOutput { draws, acceptance })
    }

    /// One Metropolis update of latent `i`. Returns true if accepted.
    fn update(&mut self, i: usize) -> bool {
        let current = self.state[i];
        let z: f64 = StandardNormal.sample(&mut self.rng);
        let proposal = current + self.steps[i] * z;

        let prior = self.priors[i];
        if !prior.contains(proposal) {
            return false;
        }
        let proposal_lp = prior.ln_density(proposal);

        self.state[i] = proposal;
        let mut log_ratio = proposal_lp - self.prior_lp[i];
        let mut proposal_ll = Vec::with_capacity(self.dependents[i].len());
        for &j in &self.dependents[i] {
            let ll = self.nodes[j].ln_likelihood(&self.state);
            log_ratio += ll - self.node_ll[j];
            proposal_ll.push(ll);
        }

        let u: f64 = self.rng.random();
        if log_ratio.is_nan() || u.ln() >= log_ratio {
            self.state[i] = current;
            return false;
        }

        self.prior_lp[i] = proposal_lp;
        for (&j, ll) in self.dependents[i].iter().zip(proposal_ll) {
            self.node_ll[j] = ll;
        }
        true
    }
}

impl Node<'_> {
    fn ln_likelihood(&self, state: &[f64]) -> f64 {
        student_t_ln_likelihood(
            self.data,
            state[self.location],
            state[self.scale],
            state[self.dof],
        )
    }
}

/// Joint log-density of `data` under a Student-t location-scale
/// distribution. `-∞` for a non-positive scale or degrees of freedom.
pub(crate) fn student_t_ln_likelihood(data: &[f64], mu: f64, sigma: f64, nu: f64) -> f64 {
    if !(sigma > 0.0 && nu > 0.0) {
        return f64::NEG_INFINITY;
    }
    let n = data.len() as f64;
    let norm =
        ln_gamma(0.5 * (nu + 1.0)) - ln_gamma(0.5 * nu) - 0.5 * (nu * PI).ln() - sigma.ln();
    let tail: f64 = data
        .iter()
        .map(|&x| {
            let z = (x - mu) / sigma;
            (z * z / nu).ln_1p()
        })
        .sum();
    n * norm - 0.5 * (nu + 1.0) * tail
}

/// Step-size multiplier for a burn-in window with acceptance `rate`.
fn tune_factor(rate: f64) -> f64 {
    match rate {
        r if r < 0.001 => 0.1,
        r if r < 0.05 => 0.5,
        r if r < 0.2 => 0.9,
        r if r > 0.95 => 10.0,
        r if r > 0.75 => 2.0,
        r if r > 0.5 => 1.1,
        _ => 1.0,
    }
}
