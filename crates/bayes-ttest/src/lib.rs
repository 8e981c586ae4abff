//! # bayes-ttest
//!
//! Robust Bayesian estimation for comparing two groups.
//!
//! Instead of a p-value, the comparison returns posterior distributions for
//! each group's mean and scale, the difference of means, a standardized
//! effect size, and a normality indicator from a shared degrees-of-freedom
//! parameter. A Welch t-test on the same data is included for contrast.
//!
//! The model is a Student-t likelihood per group, so a few outliers widen
//! the tails instead of dragging the means:
//!
//! ```text
//! y_g ~ t_ν(μ_g, σ_g),   g ∈ {1, 2}
//! ```
//!
//! Sampling is delegated to a [`SamplingEngine`]; the bundled
//! [`MetropolisEngine`] is used unless another is supplied.
//!
//! ## Quick Start
//!
//! ```ignore
//! use bayes_ttest::{BayesianTwoGroupComparator, Config, RunConfig, Sample};
//!
//! let groups = [Sample::new(drug), Sample::new(placebo)];
//! let comparator = BayesianTwoGroupComparator::with_config(
//!     Config::default().run(RunConfig::new(20_000, 5_000, 2)),
//! );
//! let result = comparator.compare(Some(&groups[..]), 0, false)?;
//!
//! println!("P(drug > placebo) = {:.1}%", result.prob_group1_greater() * 100.0);
//! println!("effect size = {:.2}", result.effect_size);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// Core modules
mod comparator;
mod config;
mod error;

// Functional modules
pub mod data;
pub mod output;
pub mod synthetic;

// Re-exports for public API
pub use comparator::BayesianTwoGroupComparator;
pub use config::Config;
pub use error::ComparisonError;
pub use output::{DensityPanel, PosteriorRenderer, TerminalRenderer, VisualizationError};
pub use synthetic::{NormalPairGenerator, SampleGenerator, SyntheticError};

pub use bayes_ttest_core::{
    analysis::DeriveError, statistics::welch::WelchTest, ComparisonResult, ComparisonWarning,
    ConfigError, MetropolisConfig, MetropolisEngine, ModelError, ModelSpec, Parameter,
    PosteriorTraces, PriorSpec, QuantitySummary, RunConfig, Sample, SamplingEngine, SamplingError,
    Trace,
};
