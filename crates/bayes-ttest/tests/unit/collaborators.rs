//! Engine and renderer failures.

use bayes_ttest::{
    BayesianTwoGroupComparator, ComparisonError, ComparisonWarning, Config, DeriveError,
    MetropolisEngine, Parameter, RunConfig, Sample, SamplingError,
};

use crate::support::{
    DegenerateScaleEngine, FailingEngine, FailingRenderer, PlugInEngine, RecordingRenderer,
};

fn groups() -> [Sample; 2] {
    [
        Sample::new(vec![4.1, 5.3, 4.8, 5.9, 5.0, 4.4]),
        Sample::new(vec![3.2, 3.9, 4.4, 3.1, 3.6, 4.0]),
    ]
}

fn config() -> Config {
    Config::default().run(RunConfig::new(300, 100, 1))
}

#[test]
fn engine_failure_is_propagated_without_retry() {
    let engine = FailingEngine::default();
    let comparator = BayesianTwoGroupComparator::with_config(config())
        .engine(engine.clone())
        .without_renderer();

    let err = comparator
        .compare(Some(&groups()[..]), 0, false)
        .unwrap_err();

    assert_eq!(
        err,
        ComparisonError::SamplingFailed(SamplingError::Backend(
            "likelihood overflow".to_string()
        ))
    );
    assert_eq!(engine.calls.load(std::sync::atomic::Ordering::SeqCst), 1);
}

#[test]
fn unconverged_chains_surface_as_sampling_failure() {
    let engine = MetropolisEngine::new()
        .seed(4)
        .chains(2)
        .rhat_threshold(1.0 + 1e-9);
    let comparator = BayesianTwoGroupComparator::with_config(
        Config::default().run(RunConfig::new(400, 100, 1)),
    )
    .engine(engine)
    .without_renderer();

    let err = comparator
        .compare(Some(&groups()[..]), 0, false)
        .unwrap_err();

    assert!(
        matches!(
            err,
            ComparisonError::SamplingFailed(SamplingError::NotConverged { .. })
        ),
        "{:?}",
        err
    );
}

#[test]
fn non_positive_scale_draw_fails_derivation() {
    let comparator = BayesianTwoGroupComparator::with_config(config())
        .engine(DegenerateScaleEngine)
        .without_renderer();

    let err = comparator
        .compare(Some(&groups()[..]), 0, false)
        .unwrap_err();

    assert!(matches!(
        err,
        ComparisonError::Derivation(DeriveError::NonPositive {
            parameter: Parameter::Sigma1,
            index: 1,
            ..
        })
    ));
}

#[test]
fn renderer_failure_keeps_numeric_result() {
    let comparator = BayesianTwoGroupComparator::with_config(config())
        .engine(PlugInEngine::default())
        .renderer(FailingRenderer);

    let result = comparator
        .compare(Some(&groups()[..]), 0, true)
        .expect("rendering failures never fail the comparison");

    assert!(result.difference_of_means > 0.0);
    assert!(result.traces.is_some());
    assert!(result
        .warnings
        .iter()
        .any(|w| matches!(w, ComparisonWarning::VisualizationFailed { .. })));
}

#[test]
fn missing_renderer_is_a_warning() {
    let comparator = BayesianTwoGroupComparator::with_config(config())
        .engine(PlugInEngine::default())
        .without_renderer();

    let result = comparator.compare(Some(&groups()[..]), 0, true).unwrap();
    assert!(result
        .warnings
        .iter()
        .any(|w| matches!(w, ComparisonWarning::VisualizationFailed { .. })));
}

#[test]
fn visualize_passes_posterior_panels_to_renderer() {
    let renderer = RecordingRenderer::default();
    let comparator = BayesianTwoGroupComparator::with_config(config())
        .engine(PlugInEngine::default())
        .renderer(renderer.clone());

    let result = comparator.compare(Some(&groups()[..]), 0, true).unwrap();
    assert!(!result
        .warnings
        .iter()
        .any(|w| matches!(w, ComparisonWarning::VisualizationFailed { .. })));

    let panels = renderer.panels.lock().unwrap();
    assert_eq!(panels.len(), 2);
    assert_eq!(panels[0].1, vec![200, 200]);
    assert_eq!(panels[1].1, vec![200]);
}

#[test]
fn no_visualize_skips_renderer_and_traces() {
    let renderer = RecordingRenderer::default();
    let comparator = BayesianTwoGroupComparator::with_config(config())
        .engine(PlugInEngine::default())
        .renderer(renderer.clone());

    let result = comparator.compare(Some(&groups()[..]), 0, false).unwrap();
    assert!(result.traces.is_none());
    assert!(renderer.panels.lock().unwrap().is_empty());
}

#[test]
fn result_reports_engine_and_protocol() {
    let comparator = BayesianTwoGroupComparator::with_config(config())
        .engine(PlugInEngine::default())
        .without_renderer();

    let result = comparator.compare(Some(&groups()[..]), 0, false).unwrap();
    assert_eq!(result.engine, "plug-in");
    assert_eq!(result.run, RunConfig::new(300, 100, 1));
    assert_eq!(result.parameters.len(), Parameter::ALL.len());
    assert!(result.frequentist.is_some());
}
