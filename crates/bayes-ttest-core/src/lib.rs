//! Core inference machinery for robust Bayesian two-group comparison.
//!
//! This crate holds everything that does not need a terminal or a file
//! system: the data model, prior construction from pooled statistics, run
//! configuration, the [`SamplingEngine`](engine::SamplingEngine) seam with a
//! bundled Metropolis implementation, trace statistics and the pure
//! reductions from parameter traces to difference of means, effect size and
//! normality.
//!
//! # Features
//!
//! - `parallel` (default): run independent chains on the rayon thread pool
//!
//! # Usage
//!
//! This crate is typically used through the main `bayes-ttest` crate, which
//! provides the comparator, synthetic data, rendering and the CLI.
//!
//! ```ignore
//! use bayes_ttest_core::{
//!     config::RunConfig,
//!     engine::{MetropolisEngine, SamplingEngine},
//!     model::ModelSpec,
//!     types::Sample,
//! };
//!
//! let model = ModelSpec::two_group(&Sample::new(a), &Sample::new(b))?;
//! let traces = MetropolisEngine::default().fit(&model, &RunConfig::default())?;
//! ```

pub mod analysis;
pub mod config;
pub mod constants;
pub mod engine;
pub mod model;
pub mod result;
pub mod statistics;
pub mod types;

// Re-export commonly used items at crate root
pub use config::{ConfigError, RunConfig};
pub use engine::{MetropolisConfig, MetropolisEngine, PosteriorTraces, SamplingEngine, SamplingError};
pub use model::{ModelError, ModelSpec, PriorSpec};
pub use result::{ComparisonResult, ComparisonWarning, ParameterDiagnostics, QuantitySummary};
pub use statistics::welch::WelchTest;
pub use types::{Group, Parameter, Sample, Trace};
