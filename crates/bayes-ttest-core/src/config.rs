//! Sampling run protocol: total iterations, burn-in and thinning.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_BURN_IN, DEFAULT_THIN, DEFAULT_TOTAL_ITERATIONS};

/// Errors raised when a run configuration is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// `total_iterations` was zero.
    ZeroIterations,

    /// Burn-in would discard every iteration.
    BurnInTooLong {
        /// Requested burn-in.
        burn_in: usize,
        /// Requested total iterations.
        total: usize,
    },

    /// Thinning stride was zero.
    ZeroThin,

    /// Engine asked to run zero chains.
    ZeroChains,

    /// Convergence threshold was not a finite value above 1.
    InvalidConvergenceThreshold,

    /// Credible interval mass outside `(0, 1]`.
    InvalidCredibleMass,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroIterations => write!(f, "total iterations must be positive"),
            ConfigError::BurnInTooLong { burn_in, total } => write!(
                f,
                "burn-in ({}) must be smaller than total iterations ({})",
                burn_in, total
            ),
            ConfigError::ZeroThin => write!(f, "thinning stride must be at least 1"),
            ConfigError::ZeroChains => write!(f, "at least one chain is required"),
            ConfigError::InvalidConvergenceThreshold => {
                write!(f, "R-hat threshold must be a finite value greater than 1")
            }
            ConfigError::InvalidCredibleMass => {
                write!(f, "credible mass must lie in (0, 1]")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// How long to run the sampler and which draws to keep.
///
/// The first `burn_in` iterations are discarded; of the remainder every
/// `thin`-th draw is retained, starting with the first post-burn-in draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Total sampler iterations, burn-in included.
    pub total_iterations: usize,

    /// Leading iterations discarded before any draw is kept.
    pub burn_in: usize,

    /// Keep one draw out of every `thin`.
    pub thin: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            total_iterations: DEFAULT_TOTAL_ITERATIONS,
            burn_in: DEFAULT_BURN_IN,
            thin: DEFAULT_THIN,
        }
    }
}

impl RunConfig {
    /// Create a run configuration. Call [`validate`](Self::validate) before use.
    pub fn new(total_iterations: usize, burn_in: usize, thin: usize) -> Self {
        Self {
            total_iterations,
            burn_in,
            thin,
        }
    }

    /// Set total iterations.
    pub fn total_iterations(mut self, n: usize) -> Self {
        self.total_iterations = n;
        self
    }

    /// Set burn-in length.
    pub fn burn_in(mut self, n: usize) -> Self {
        self.burn_in = n;
        self
    }

    /// Set thinning stride.
    pub fn thin(mut self, n: usize) -> Self {
        self.thin = n;
        self
    }

    /// Check that at least one draw survives burn-in and thinning.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.total_iterations == 0 {
            return Err(ConfigError::ZeroIterations);
        }
        if self.burn_in >= self.total_iterations {
            return Err(ConfigError::BurnInTooLong {
                burn_in: self.burn_in,
                total: self.total_iterations,
            });
        }
        if self.thin == 0 {
            return Err(ConfigError::ZeroThin);
        }
        Ok(())
    }

    /// Number of draws retained per chain.
    ///
    /// Equals `(total_iterations - burn_in) / thin` when the stride divides
    /// the post-burn-in length, rounded up otherwise. Zero for an invalid
    /// configuration.
    pub fn retained_len(&self) -> usize {
        if self.validate().is_err() {
            return 0;
        }
        (self.total_iterations - self.burn_in).div_ceil(self.thin)
    }

    /// Whether the draw at `iteration` (0-based) is kept.
    #[inline]
    pub fn keeps(&self, iteration: usize) -> bool {
        iteration >= self.burn_in && (iteration - self.burn_in) % self.thin == 0
    }
}
