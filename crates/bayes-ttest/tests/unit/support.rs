//! Test engines and renderers.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use bayes_ttest::{
    DensityPanel, ModelSpec, Parameter, PosteriorRenderer, PosteriorTraces, RunConfig,
    SamplingEngine, SamplingError, Trace, VisualizationError,
};

/// Short protocol for Metropolis-backed tests.
pub fn short_run() -> RunConfig {
    RunConfig::new(6000, 2000, 2)
}

/// Engine whose traces are a deterministic function of each group's data:
/// `mu_g` wobbles around the group mean, `sigma_g` around its spread.
///
/// Swapping the groups swaps the traces exactly, and every call is counted.
#[derive(Default, Clone)]
pub struct PlugInEngine {
    pub calls: Arc<AtomicUsize>,
    pub models: Arc<Mutex<Vec<ModelSpec>>>,
}

impl PlugInEngine {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl SamplingEngine for PlugInEngine {
    fn fit(&self, model: &ModelSpec, run: &RunConfig) -> Result<PosteriorTraces, SamplingError> {
        run.validate()?;
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.models.lock().unwrap().push(model.clone());

        let n = run.retained_len();
        let wobble = |k: usize| ((k % 7) as f64 - 3.0) * 0.01;
        let mut traces = BTreeMap::new();
        for node in &model.observed {
            let data = node.data.values();
            let mean = data.iter().sum::<f64>() / data.len() as f64;
            let spread = (data.iter().map(|x| (x - mean).powi(2)).sum::<f64>()
                / data.len() as f64)
                .sqrt()
                .max(1e-3);
            traces.insert(
                node.location,
                Trace::new((0..n).map(|k| mean + wobble(k)).collect()),
            );
            traces.insert(
                node.scale,
                Trace::new((0..n).map(|k| spread * (1.0 + wobble(k))).collect()),
            );
        }
        traces.insert(Parameter::Nu, Trace::new(vec![30.0; n]));
        Ok(PosteriorTraces::new(traces))
    }

    fn name(&self) -> &'static str {
        "plug-in"
    }
}

/// Engine that always fails with a backend error.
#[derive(Default, Clone)]
pub struct FailingEngine {
    pub calls: Arc<AtomicUsize>,
}

impl SamplingEngine for FailingEngine {
    fn fit(&self, _model: &ModelSpec, _run: &RunConfig) -> Result<PosteriorTraces, SamplingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(SamplingError::Backend("likelihood overflow".to_string()))
    }
}

/// Engine that returns a zero scale draw.
pub struct DegenerateScaleEngine;

impl SamplingEngine for DegenerateScaleEngine {
    fn fit(&self, _model: &ModelSpec, _run: &RunConfig) -> Result<PosteriorTraces, SamplingError> {
        let mut traces = BTreeMap::new();
        for parameter in Parameter::ALL {
            traces.insert(parameter, Trace::new(vec![1.0, 1.0, 1.0]));
        }
        traces.insert(Parameter::Sigma1, Trace::new(vec![1.0, 0.0, 1.0]));
        Ok(PosteriorTraces::new(traces))
    }
}

/// Renderer that always fails.
pub struct FailingRenderer;

impl PosteriorRenderer for FailingRenderer {
    fn render(&self, _panels: &[DensityPanel<'_>], _show: bool) -> Result<(), VisualizationError> {
        Err(VisualizationError::Io(std::io::Error::other("display closed")))
    }
}

/// Renderer that records panel titles and series lengths.
#[derive(Default, Clone)]
pub struct RecordingRenderer {
    pub panels: Arc<Mutex<Vec<(String, Vec<usize>)>>>,
}

impl PosteriorRenderer for RecordingRenderer {
    fn render(&self, panels: &[DensityPanel<'_>], _show: bool) -> Result<(), VisualizationError> {
        let mut seen = self.panels.lock().unwrap();
        for panel in panels {
            seen.push((
                panel.title.clone(),
                panel.series.iter().map(|(_, t)| t.len()).collect(),
            ));
        }
        Ok(())
    }
}
