//! Synthetic two-group data.
//!
//! Used when `compare` is called without groups, and by tests that need
//! data with a known location offset.

use std::fmt;

use bayes_ttest_core::constants::DEFAULT_SEED;
use bayes_ttest_core::Sample;
use rand::SeedableRng;
use rand_distr::{Distribution, StandardNormal};
use rand_xoshiro::Xoshiro256PlusPlus;

/// Something that can produce a pair of samples of a given size.
pub trait SampleGenerator: Send + Sync {
    /// Generate two samples of `size` observations each.
    fn generate(&self, size: usize) -> (Sample, Sample);
}

/// Invalid generator parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SyntheticError {
    /// A mean was NaN or infinite.
    NonFiniteMean,
    /// Standard deviation was negative, NaN or infinite.
    InvalidStdDev(f64),
}

impl fmt::Display for SyntheticError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyntheticError::NonFiniteMean => write!(f, "group means must be finite"),
            SyntheticError::InvalidStdDev(sd) => {
                write!(f, "standard deviation must be finite and non-negative, got {}", sd)
            }
        }
    }
}

impl std::error::Error for SyntheticError {}

/// Two normal groups sharing a standard deviation, differing only in mean.
///
/// Draws come from a seeded `Xoshiro256PlusPlus`, group 1 first, so a given
/// seed always yields the same pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalPairGenerator {
    mean1: f64,
    mean2: f64,
    std_dev: f64,
    seed: u64,
}

impl Default for NormalPairGenerator {
    /// Means 0 and 1, unit standard deviation.
    fn default() -> Self {
        Self {
            mean1: 0.0,
            mean2: 1.0,
            std_dev: 1.0,
            seed: DEFAULT_SEED,
        }
    }
}

impl NormalPairGenerator {
    /// Create a generator with explicit means and shared standard deviation.
    pub fn new(mean1: f64, mean2: f64, std_dev: f64) -> Result<Self, SyntheticError> {
        if !(mean1.is_finite() && mean2.is_finite()) {
            return Err(SyntheticError::NonFiniteMean);
        }
        if !(std_dev.is_finite() && std_dev >= 0.0) {
            return Err(SyntheticError::InvalidStdDev(std_dev));
        }
        Ok(Self {
            mean1,
            mean2,
            std_dev,
            seed: DEFAULT_SEED,
        })
    }

    /// Set the RNG seed.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Location offset of group 2 relative to group 1.
    pub fn offset(&self) -> f64 {
        self.mean2 - self.mean1
    }
}

impl SampleGenerator for NormalPairGenerator {
    fn generate(&self, size: usize) -> (Sample, Sample) {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(self.seed);
        let mut draw = |mean: f64| -> Sample {
            (0..size)
                .map(|_| {
                    let z: f64 = StandardNormal.sample(&mut rng);
                    mean + self.std_dev * z
                })
                .collect::<Vec<_>>()
                .into()
        };
        let first = draw(self.mean1);
        let second = draw(self.mean2);
        (first, second)
    }
}
