//! Input validation happens before any sampling.

use bayes_ttest::{
    BayesianTwoGroupComparator, ComparisonError, Config, ConfigError, ModelError, RunConfig,
    Sample,
};

use crate::support::PlugInEngine;

fn sample(values: &[f64]) -> Sample {
    Sample::new(values.to_vec())
}

fn comparator(engine: &PlugInEngine) -> BayesianTwoGroupComparator {
    BayesianTwoGroupComparator::with_config(Config::default().run(RunConfig::new(200, 50, 1)))
        .engine(engine.clone())
        .without_renderer()
}

#[test]
fn wrong_group_counts_are_rejected() {
    let engine = PlugInEngine::default();
    let comparator = comparator(&engine);
    let a = sample(&[1.0, 2.0, 3.0]);

    for groups in [vec![], vec![a.clone()], vec![a.clone(), a.clone(), a.clone()]] {
        let err = comparator.compare(Some(&groups[..]), 10, false).unwrap_err();
        assert_eq!(err, ComparisonError::InvalidGroupCount { got: groups.len() });
    }
    assert_eq!(engine.calls(), 0, "no sampling for invalid group counts");
}

#[test]
fn exactly_two_groups_succeed() {
    let engine = PlugInEngine::default();
    let groups = [sample(&[1.0, 2.0, 3.0]), sample(&[2.0, 3.5, 4.0])];
    let result = comparator(&engine).compare(Some(&groups[..]), 0, false);
    assert!(result.is_ok(), "{:?}", result.err());
    assert_eq!(engine.calls(), 1);
}

#[test]
fn synthetic_generation_needs_positive_size() {
    let engine = PlugInEngine::default();
    let err = comparator(&engine).compare(None, 0, false).unwrap_err();
    assert_eq!(err, ComparisonError::InvalidSampleSize);
    assert_eq!(engine.calls(), 0);
}

#[test]
fn synthetic_generation_uses_sample_size() {
    let engine = PlugInEngine::default();
    comparator(&engine).compare(None, 25, false).unwrap();
    let models = engine.models.lock().unwrap();
    assert_eq!(models[0].observed[0].data.len(), 25);
    assert_eq!(models[0].observed[1].data.len(), 25);
}

#[test]
fn burn_in_covering_every_iteration_fails_before_sampling() {
    let engine = PlugInEngine::default();
    let groups = [sample(&[1.0, 2.0]), sample(&[3.0, 4.0])];

    for run in [RunConfig::new(100, 100, 1), RunConfig::new(100, 150, 1)] {
        let err = comparator(&engine)
            .run_config(run)
            .compare(Some(&groups[..]), 0, false)
            .unwrap_err();
        assert!(matches!(
            err,
            ComparisonError::InvalidRunConfig(ConfigError::BurnInTooLong { .. })
        ));
    }

    let err = comparator(&engine)
        .run_config(RunConfig::new(100, 10, 0))
        .compare(Some(&groups[..]), 0, false)
        .unwrap_err();
    assert_eq!(err, ComparisonError::InvalidRunConfig(ConfigError::ZeroThin));

    assert_eq!(engine.calls(), 0);
}

#[test]
fn credible_mass_outside_unit_interval_fails_before_sampling() {
    let engine = PlugInEngine::default();
    let groups = [sample(&[1.0, 2.0]), sample(&[3.0, 4.0])];

    for mass in [0.0, 1.5] {
        let comparator = BayesianTwoGroupComparator::with_config(
            Config::default()
                .run(RunConfig::new(200, 50, 1))
                .credible_mass(mass),
        )
        .engine(engine.clone())
        .without_renderer();

        let err = comparator.compare(Some(&groups[..]), 0, false).unwrap_err();
        assert_eq!(
            err,
            ComparisonError::InvalidRunConfig(ConfigError::InvalidCredibleMass)
        );
    }
    assert_eq!(engine.calls(), 0);
}

#[test]
fn unusable_samples_are_reported() {
    let engine = PlugInEngine::default();
    let constant = [sample(&[2.0, 2.0]), sample(&[2.0])];
    let err = comparator(&engine)
        .compare(Some(&constant[..]), 0, false)
        .unwrap_err();
    assert_eq!(
        err,
        ComparisonError::InvalidSample(ModelError::ZeroPooledVariance)
    );

    let empty = [sample(&[]), sample(&[1.0, 2.0])];
    let err = comparator(&engine)
        .compare(Some(&empty[..]), 0, false)
        .unwrap_err();
    assert!(matches!(
        err,
        ComparisonError::InvalidSample(ModelError::EmptySample { .. })
    ));
    assert_eq!(engine.calls(), 0);
}
