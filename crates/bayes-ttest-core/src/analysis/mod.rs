//! Posterior reductions.
//!
//! - **Derivations** (`derive`): per-draw difference of means, effect size
//!   and normality traces
//! - **Summaries** (`summary`): point estimates, credible intervals and
//!   mixing diagnostics assembled into a [`ComparisonResult`](crate::result::ComparisonResult)

pub mod derive;
pub mod summary;

pub use derive::{
    derive_all, difference_of_means, difference_of_scales, effect_size, normality, DeriveError,
    DerivedTraces,
};
pub use summary::{summarize, summarize_quantity, SummaryOptions};
