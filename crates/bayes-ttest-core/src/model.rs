//! Model description handed to a sampling engine.
//!
//! The two-group model is a robust (Student-t) location-scale model:
//!
//! ```text
//! μ_g ~ N(m, v·N)              precision 1 / (v·N)
//! σ_g ~ U(s / 1000, s · 1000)  s = √v
//! ν   ~ 1 + Exp(1/29)
//! y_g ~ t_ν(μ_g, σ_g)          g ∈ {1, 2}
//! ```
//!
//! where `m`, `v` and `N` are the mean, variance and size of the pooled
//! sample. Priors are diffuse: they only fix the order of
//! magnitude of the data, not its location relative to either group.

use core::fmt;

use serde::{Deserialize, Serialize};
use statrs::distribution::{Continuous, Exp, Normal, Uniform};

use crate::constants::{NU_MINUS_ONE_PRIOR_MEAN, NU_OFFSET, SCALE_PRIOR_SPAN};
use crate::types::{Group, Parameter, Sample};

/// Errors raised while building a model from observed samples.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    /// A group has no observations.
    EmptySample {
        /// The empty group.
        group: Group,
    },

    /// An observation is NaN or infinite.
    NonFiniteValue {
        /// Group holding the value.
        group: Group,
        /// Position within the group (0-indexed).
        index: usize,
    },

    /// Every pooled observation is identical, so no prior scale exists.
    ZeroPooledVariance,
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::EmptySample { group } => {
                write!(f, "group {} has no observations", group.label())
            }
            ModelError::NonFiniteValue { group, index } => write!(
                f,
                "group {} has a non-finite value at index {}",
                group.label(),
                index
            ),
            ModelError::ZeroPooledVariance => {
                write!(f, "pooled sample has zero variance; priors cannot be scaled")
            }
        }
    }
}

impl std::error::Error for ModelError {}

/// Prior distribution family with its shape parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "snake_case")]
pub enum PriorSpec {
    /// Normal prior parameterised by precision (1 / variance).
    Normal {
        /// Centre.
        mean: f64,
        /// Inverse variance.
        precision: f64,
    },

    /// Flat prior on `[lower, upper]`.
    Uniform {
        /// Lower bound.
        lower: f64,
        /// Upper bound.
        upper: f64,
    },

    /// Exponential prior shifted right by `offset`.
    Exponential {
        /// Rate of the exponential component.
        rate: f64,
        /// Lower bound of the support.
        offset: f64,
    },
}

impl PriorSpec {
    /// Log density at `x`, `-∞` outside the support or for invalid shapes.
    pub fn ln_density(&self, x: f64) -> f64 {
        match *self {
            PriorSpec::Normal { mean, precision } => Normal::new(mean, precision.recip().sqrt())
                .map_or(f64::NEG_INFINITY, |d| d.ln_pdf(x)),
            PriorSpec::Uniform { lower, upper } => {
                if !(lower..=upper).contains(&x) {
                    return f64::NEG_INFINITY;
                }
                Uniform::new(lower, upper).map_or(f64::NEG_INFINITY, |d| d.ln_pdf(x))
            }
            PriorSpec::Exponential { rate, offset } => {
                if x < offset {
                    return f64::NEG_INFINITY;
                }
                Exp::new(rate).map_or(f64::NEG_INFINITY, |d| d.ln_pdf(x - offset))
            }
        }
    }

    /// Whether `x` lies in the support of the prior.
    pub fn contains(&self, x: f64) -> bool {
        if !x.is_finite() {
            return false;
        }
        match *self {
            PriorSpec::Normal { .. } => true,
            PriorSpec::Uniform { lower, upper } => (lower..=upper).contains(&x),
            PriorSpec::Exponential { offset, .. } => x >= offset,
        }
    }

    /// Prior mean.
    pub fn mean(&self) -> f64 {
        match *self {
            PriorSpec::Normal { mean, .. } => mean,
            PriorSpec::Uniform { lower, upper } => 0.5 * (lower + upper),
            PriorSpec::Exponential { rate, offset } => offset + rate.recip(),
        }
    }
}

/// A latent parameter: its prior, starting value and proposal scale hint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatentSpec {
    /// Which parameter this is.
    pub parameter: Parameter,
    /// Prior distribution.
    pub prior: PriorSpec,
    /// Starting value for the chain; inside the prior support.
    pub initial: f64,
    /// Typical step size for random-walk proposals.
    pub proposal_scale: f64,
}

/// Observed data under a Student-t location-scale likelihood.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservedSpec {
    /// Node name, unique within a model.
    pub name: String,
    /// Group the data belongs to.
    pub group: Group,
    /// The observations.
    pub data: Sample,
    /// Location parameter.
    pub location: Parameter,
    /// Scale parameter.
    pub scale: Parameter,
    /// Degrees-of-freedom parameter.
    pub dof: Parameter,
}

impl ObservedSpec {
    /// Whether this node's likelihood depends on `parameter`.
    pub fn depends_on(&self, parameter: Parameter) -> bool {
        self.location == parameter || self.scale == parameter || self.dof == parameter
    }
}

/// Size, mean and variance of the two samples taken together.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PooledStats {
    /// Total number of observations.
    pub count: usize,
    /// Mean of the concatenated samples.
    pub mean: f64,
    /// Population variance (divisor `count`) of the concatenated samples.
    pub variance: f64,
}

impl PooledStats {
    /// Pool two samples.
    ///
    /// Per-group sums are combined with a single addition, so swapping the
    /// groups yields bit-identical statistics.
    pub fn from_samples(a: &Sample, b: &Sample) -> Self {
        let count = a.len() + b.len();
        if count == 0 {
            return Self {
                count,
                mean: f64::NAN,
                variance: f64::NAN,
            };
        }
        let mean = (a.sum() + b.sum()) / count as f64;
        let squares = |s: &Sample| -> f64 {
            s.values().iter().map(|&x| (x - mean) * (x - mean)).sum()
        };
        let variance = (squares(a) + squares(b)) / count as f64;
        Self {
            count,
            mean,
            variance,
        }
    }

    /// Square root of the pooled variance.
    pub fn std_dev(&self) -> f64 {
        self.variance.sqrt()
    }
}

/// Named latent parameters with priors plus observed-data conditionals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSpec {
    /// Latent parameters in update order.
    pub latents: Vec<LatentSpec>,
    /// Likelihood nodes.
    pub observed: Vec<ObservedSpec>,
    /// Pooled statistics the priors were derived from.
    pub pooled: PooledStats,
}

impl ModelSpec {
    /// Build the robust two-group model for samples `a` (group 1) and `b`
    /// (group 2).
    pub fn two_group(a: &Sample, b: &Sample) -> Result<Self, ModelError> {
        for (group, sample) in Group::BOTH.into_iter().zip([a, b]) {
            if sample.is_empty() {
                return Err(ModelError::EmptySample { group });
            }
            if let Some(index) = sample.values().iter().position(|x| !x.is_finite()) {
                return Err(ModelError::NonFiniteValue { group, index });
            }
        }

        let pooled = PooledStats::from_samples(a, b);
        if !(pooled.variance > 0.0) {
            return Err(ModelError::ZeroPooledVariance);
        }
        let pooled_sd = pooled.std_dev();

        let mean_prior = PriorSpec::Normal {
            mean: pooled.mean,
            precision: 1.0 / (pooled.variance * pooled.count as f64),
        };
        let scale_prior = PriorSpec::Uniform {
            lower: pooled_sd / SCALE_PRIOR_SPAN,
            upper: pooled_sd * SCALE_PRIOR_SPAN,
        };
        let nu_prior = PriorSpec::Exponential {
            rate: 1.0 / NU_MINUS_ONE_PRIOR_MEAN,
            offset: NU_OFFSET,
        };

        let mut latents = Vec::with_capacity(Parameter::ALL.len());
        for (group, sample) in Group::BOTH.into_iter().zip([a, b]) {
            let n = sample.len() as f64;
            latents.push(LatentSpec {
                parameter: Parameter::mean(group),
                prior: mean_prior,
                initial: sample.mean().unwrap_or(pooled.mean),
                proposal_scale: pooled_sd / n.sqrt(),
            });
        }
        for (group, sample) in Group::BOTH.into_iter().zip([a, b]) {
            let n = sample.len() as f64;
            latents.push(LatentSpec {
                parameter: Parameter::scale(group),
                prior: scale_prior,
                initial: initial_scale(sample, pooled_sd),
                proposal_scale: pooled_sd / (2.0 * n).sqrt(),
            });
        }
        latents.push(LatentSpec {
            parameter: Parameter::Nu,
            prior: nu_prior,
            initial: nu_prior.mean(),
            proposal_scale: 5.0,
        });

        let observed = Group::BOTH
            .into_iter()
            .zip([a, b])
            .map(|(group, sample)| ObservedSpec {
                name: format!("t_{}", group.label()),
                group,
                data: sample.clone(),
                location: Parameter::mean(group),
                scale: Parameter::scale(group),
                dof: Parameter::Nu,
            })
            .collect();

        tracing::debug!(
            pooled_mean = pooled.mean,
            pooled_variance = pooled.variance,
            pooled_count = pooled.count,
            "built two-group model"
        );

        Ok(Self {
            latents,
            observed,
            pooled,
        })
    }

    /// Look up a latent parameter.
    pub fn latent(&self, parameter: Parameter) -> Option<&LatentSpec> {
        self.latents.iter().find(|l| l.parameter == parameter)
    }

    /// Prior of a latent parameter.
    pub fn prior(&self, parameter: Parameter) -> Option<PriorSpec> {
        self.latent(parameter).map(|l| l.prior)
    }
}

/// Starting scale for a group: its own spread when it has one, otherwise the
/// pooled spread. Always inside the scale prior's support.
fn initial_scale(sample: &Sample, pooled_sd: f64) -> f64 {
    let own = sample.mean().map(|m| {
        let ss: f64 = sample.values().iter().map(|&x| (x - m) * (x - m)).sum();
        (ss / sample.len() as f64).sqrt()
    });
    let sd = match own {
        Some(sd) if sd > 0.0 => sd,
        _ => pooled_sd,
    };
    sd.clamp(pooled_sd / SCALE_PRIOR_SPAN, pooled_sd * SCALE_PRIOR_SPAN)
}
