//! Configuration for [`BayesianTwoGroupComparator`](crate::BayesianTwoGroupComparator).

use bayes_ttest_core::constants::{DEFAULT_CREDIBLE_MASS, DEFAULT_SEED};
use bayes_ttest_core::{ConfigError, RunConfig};

/// Environment variable overriding [`Config::seed`].
pub const ENV_SEED: &str = "BAYES_TTEST_SEED";
/// Environment variable overriding [`RunConfig::total_iterations`].
pub const ENV_ITERATIONS: &str = "BAYES_TTEST_ITERATIONS";
/// Environment variable overriding [`RunConfig::burn_in`].
pub const ENV_BURN_IN: &str = "BAYES_TTEST_BURN_IN";
/// Environment variable overriding [`RunConfig::thin`].
pub const ENV_THIN: &str = "BAYES_TTEST_THIN";
/// Environment variable overriding [`Config::chains`].
pub const ENV_CHAINS: &str = "BAYES_TTEST_CHAINS";

/// Comparator settings.
///
/// Nothing here is global: every comparator carries its own copy, and the
/// seed makes repeated runs on the same data reproducible.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Sampling protocol. Default: 40,000 iterations, 10,000 burn-in, stride 2.
    pub run: RunConfig,

    /// Seed for the default engine and the default synthetic generator.
    pub seed: u64,

    /// Chains run by the default engine. Default: 1.
    pub chains: usize,

    /// Mass of reported HPD intervals. Default: 0.95.
    pub credible_mass: f64,

    /// Keep full traces in the result even without visualization.
    /// Default: false.
    pub keep_traces: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            run: RunConfig::default(),
            seed: DEFAULT_SEED,
            chains: 1,
            credible_mass: DEFAULT_CREDIBLE_MASS,
            keep_traces: false,
        }
    }
}

impl Config {
    /// Defaults overridden by any `BAYES_TTEST_*` variables that parse.
    ///
    /// Unparsable values are ignored with a warning.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Apply `BAYES_TTEST_*` overrides on top of `self`.
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(seed) = env_parse::<u64>(ENV_SEED) {
            self.seed = seed;
        }
        if let Some(n) = env_parse::<usize>(ENV_ITERATIONS) {
            self.run.total_iterations = n;
        }
        if let Some(n) = env_parse::<usize>(ENV_BURN_IN) {
            self.run.burn_in = n;
        }
        if let Some(n) = env_parse::<usize>(ENV_THIN) {
            self.run.thin = n;
        }
        if let Some(n) = env_parse::<usize>(ENV_CHAINS) {
            self.chains = n;
        }
        self
    }

    /// Check the run protocol and the credible mass.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.run.validate()?;
        if !(self.credible_mass > 0.0 && self.credible_mass <= 1.0) {
            return Err(ConfigError::InvalidCredibleMass);
        }
        Ok(())
    }

    /// Set the run protocol.
    pub fn run(mut self, run: RunConfig) -> Self {
        self.run = run;
        self
    }

    /// Set the seed.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the number of chains.
    pub fn chains(mut self, chains: usize) -> Self {
        self.chains = chains;
        self
    }

    /// Set the HPD mass.
    pub fn credible_mass(mut self, mass: f64) -> Self {
        self.credible_mass = mass;
        self
    }

    /// Keep full traces in every result.
    pub fn keep_traces(mut self, keep: bool) -> Self {
        self.keep_traces = keep;
        self
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(key, value = %raw, "ignoring unparsable environment override");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let config = Config::default()
            .run(RunConfig::new(500, 100, 4))
            .seed(9)
            .chains(2)
            .credible_mass(0.9)
            .keep_traces(true);
        assert_eq!(config.run.retained_len(), 100);
        assert_eq!(config.seed, 9);
        assert_eq!(config.chains, 2);
        assert_eq!(config.credible_mass, 0.9);
        assert!(config.keep_traces);
    }

    #[test]
    fn test_validate_credible_mass() {
        assert_eq!(Config::default().validate(), Ok(()));
        assert_eq!(Config::default().credible_mass(1.0).validate(), Ok(()));
        for mass in [0.0, -0.5, 1.5, f64::NAN] {
            assert_eq!(
                Config::default().credible_mass(mass).validate(),
                Err(ConfigError::InvalidCredibleMass),
                "mass {}",
                mass
            );
        }
        assert_eq!(
            Config::default().run(RunConfig::new(10, 10, 1)).validate(),
            Err(ConfigError::BurnInTooLong {
                burn_in: 10,
                total: 10
            })
        );
    }

    #[test]
    fn test_env_overrides() {
        // Only this test touches these variables
        std::env::set_var(ENV_ITERATIONS, "1200");
        std::env::set_var(ENV_BURN_IN, "200");
        std::env::set_var(ENV_THIN, "not-a-number");
        let config = Config::from_env();
        std::env::remove_var(ENV_ITERATIONS);
        std::env::remove_var(ENV_BURN_IN);
        std::env::remove_var(ENV_THIN);

        assert_eq!(config.run.total_iterations, 1200);
        assert_eq!(config.run.burn_in, 200);
        assert_eq!(config.run.thin, RunConfig::default().thin);
    }
}
