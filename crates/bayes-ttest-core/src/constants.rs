//! Constants shared by prior construction and the bundled engine.

/// Default deterministic seed for RNG operations.
///
/// Same seed + same data = same traces. The value `0x6265737474` is
/// "bestt" encoded in ASCII.
pub const DEFAULT_SEED: u64 = 0x6265737474;

// =============================================================================
// Default run protocol
// =============================================================================

/// Default total number of sampler iterations.
pub const DEFAULT_TOTAL_ITERATIONS: usize = 40_000;

/// Default number of leading iterations discarded as burn-in.
pub const DEFAULT_BURN_IN: usize = 10_000;

/// Default thinning stride applied after burn-in.
pub const DEFAULT_THIN: usize = 2;

// =============================================================================
// Prior shape constants
// =============================================================================

/// Width factor of the uniform scale prior on each side of the pooled
/// standard deviation (three orders of magnitude).
pub const SCALE_PRIOR_SPAN: f64 = 1000.0;

/// Mean of the exponential prior on `ν - 1`.
///
/// Puts roughly equal prior mass on heavy-tailed (ν < 30) and nearly normal
/// (ν > 30) likelihoods.
pub const NU_MINUS_ONE_PRIOR_MEAN: f64 = 29.0;

/// Lower bound of the degrees-of-freedom support.
pub const NU_OFFSET: f64 = 1.0;

// =============================================================================
// Engine tuning
// =============================================================================

/// Burn-in iterations between proposal scale adjustments.
pub const DEFAULT_TUNE_INTERVAL: usize = 100;

/// Default credible mass for HPD intervals.
pub const DEFAULT_CREDIBLE_MASS: f64 = 0.95;

/// Maximum autocorrelation lag inspected by the ESS estimator.
pub const ESS_MAX_LAG: usize = 50;

/// ESS at or below which a parameter is flagged as poorly mixed.
pub const LOW_ESS_WARNING: f64 = 100.0;
