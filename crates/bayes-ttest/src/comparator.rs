//! The two-group comparator: priors → evidence → sampling → summaries.

use bayes_ttest_core::analysis::{derive_all, summarize, SummaryOptions};
use bayes_ttest_core::statistics::welch::welch_t_test;
use bayes_ttest_core::{
    ComparisonResult, ComparisonWarning, MetropolisEngine, ModelSpec, RunConfig, Sample,
    SamplingEngine,
};

use crate::config::Config;
use crate::error::ComparisonError;
use crate::output::{DensityPanel, PosteriorRenderer, TerminalRenderer, VisualizationError};
use crate::synthetic::{NormalPairGenerator, SampleGenerator};

/// Robust Bayesian comparison of two groups.
///
/// Builds a Student-t model with diffuse priors scaled by the pooled data,
/// hands it to a [`SamplingEngine`], and reduces the traces to group means,
/// difference of means, effect size and a normality indicator.
///
/// The comparator holds no mutable state: `compare` takes `&self` and may be
/// called from several threads at once.
///
/// # Example
///
/// ```ignore
/// use bayes_ttest::{BayesianTwoGroupComparator, Sample};
///
/// let groups = [Sample::new(treated), Sample::new(control)];
/// let result = BayesianTwoGroupComparator::new().compare(Some(&groups[..]), 0, false)?;
/// println!("effect size: {:.2}", result.effect_size);
/// ```
pub struct BayesianTwoGroupComparator {
    config: Config,
    engine: Box<dyn SamplingEngine>,
    renderer: Option<Box<dyn PosteriorRenderer>>,
    generator: Box<dyn SampleGenerator>,
}

impl Default for BayesianTwoGroupComparator {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for BayesianTwoGroupComparator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BayesianTwoGroupComparator")
            .field("config", &self.config)
            .field("engine", &self.engine.name())
            .field("renderer", &self.renderer.is_some())
            .finish_non_exhaustive()
    }
}

impl BayesianTwoGroupComparator {
    /// Comparator with default configuration, the bundled Metropolis engine,
    /// a terminal renderer and a normal synthetic generator.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Comparator with explicit configuration and default collaborators
    /// seeded from `config.seed`.
    pub fn with_config(config: Config) -> Self {
        let engine = MetropolisEngine::new()
            .seed(config.seed)
            .chains(config.chains);
        let generator = NormalPairGenerator::default().seed(config.seed);
        Self {
            config,
            engine: Box::new(engine),
            renderer: Some(Box::new(TerminalRenderer::stdout())),
            generator: Box::new(generator),
        }
    }

    /// Replace the sampling engine.
    pub fn engine(mut self, engine: impl SamplingEngine + 'static) -> Self {
        self.engine = Box::new(engine);
        self
    }

    /// Replace the renderer used when `visualize` is requested.
    pub fn renderer(mut self, renderer: impl PosteriorRenderer + 'static) -> Self {
        self.renderer = Some(Box::new(renderer));
        self
    }

    /// Detach the renderer; visualization requests then produce a warning.
    pub fn without_renderer(mut self) -> Self {
        self.renderer = None;
        self
    }

    /// Replace the synthetic data generator.
    pub fn generator(mut self, generator: impl SampleGenerator + 'static) -> Self {
        self.generator = Box::new(generator);
        self
    }

    /// Replace the run protocol.
    pub fn run_config(mut self, run: RunConfig) -> Self {
        self.config.run = run;
        self
    }

    /// Current configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Compare two groups.
    ///
    /// * `groups` - exactly two samples, or `None` to generate two samples
    ///   of `sample_size` observations with the configured generator
    /// * `sample_size` - synthetic sample size; ignored when `groups` is set
    /// * `visualize` - render posterior densities and keep the full traces
    ///   in the result
    ///
    /// # Errors
    ///
    /// Group count, sample size, run protocol and credible mass are checked
    /// before any sampling. Engine failures are returned as
    /// [`ComparisonError::SamplingFailed`] without retry. Rendering failures
    /// never fail the call; they are attached to the result as
    /// [`ComparisonWarning::VisualizationFailed`].
    pub fn compare(
        &self,
        groups: Option<&[Sample]>,
        sample_size: usize,
        visualize: bool,
    ) -> Result<ComparisonResult, ComparisonError> {
        let generated;
        let (first, second) = match groups {
            Some([first, second]) => (first, second),
            Some(other) => {
                return Err(ComparisonError::InvalidGroupCount { got: other.len() });
            }
            None => {
                if sample_size == 0 {
                    return Err(ComparisonError::InvalidSampleSize);
                }
                generated = self.generator.generate(sample_size);
                (&generated.0, &generated.1)
            }
        };

        self.config
            .validate()
            .map_err(ComparisonError::InvalidRunConfig)?;

        let model = ModelSpec::two_group(first, second)?;

        tracing::info!(
            group1 = first.len(),
            group2 = second.len(),
            engine = self.engine.name(),
            iterations = self.config.run.total_iterations,
            burn_in = self.config.run.burn_in,
            thin = self.config.run.thin,
            "starting comparison"
        );

        let posterior = self.engine.fit(&model, &self.config.run)?;
        let derived = derive_all(&posterior)?;
        let frequentist = welch_t_test(first.values(), second.values());

        let options = SummaryOptions {
            credible_mass: self.config.credible_mass,
            keep_traces: visualize || self.config.keep_traces,
            ..SummaryOptions::default()
        };
        let mut result = summarize(
            &model,
            &posterior,
            derived,
            &self.config.run,
            self.engine.name(),
            frequentist,
            &options,
        )?;

        if visualize {
            if let Err(e) = self.render(&result) {
                tracing::warn!(error = %e, "visualization failed; returning numeric result");
                result.warnings.push(ComparisonWarning::VisualizationFailed {
                    message: e.to_string(),
                });
            }
        }

        tracing::info!(
            group1_mean = result.group1_mean,
            group2_mean = result.group2_mean,
            difference = result.difference_of_means,
            effect_size = result.effect_size,
            normality = result.normality,
            "comparison finished"
        );

        Ok(result)
    }

    /// Compare two borrowed samples.
    pub fn compare_samples(
        &self,
        first: &Sample,
        second: &Sample,
        visualize: bool,
    ) -> Result<ComparisonResult, ComparisonError> {
        let groups = [first.clone(), second.clone()];
        self.compare(Some(&groups[..]), 0, visualize)
    }

    /// Draw the group-mean and difference-of-means posteriors of a result
    /// that carries traces.
    pub fn render(&self, result: &ComparisonResult) -> Result<(), VisualizationError> {
        let renderer = self
            .renderer
            .as_ref()
            .ok_or(VisualizationError::Unavailable)?;
        let traces = result.traces.as_ref().ok_or(VisualizationError::NoPanels)?;

        let panels = [
            DensityPanel::new("Posterior group means")
                .series("mu_1", &traces.group1_mean)
                .series("mu_2", &traces.group2_mean),
            DensityPanel::new("Difference of means (mu_1 - mu_2)")
                .series("diff", &traces.difference_of_means)
                .reference(0.0),
        ];
        renderer.render(&panels, true)
    }
}
