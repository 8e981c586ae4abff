//! Group order only changes signs.

use bayes_ttest::{BayesianTwoGroupComparator, Config, Parameter, RunConfig, Sample};

use crate::support::{short_run, PlugInEngine};

fn drug() -> Sample {
    Sample::new(vec![
        101.0, 100.0, 102.0, 104.0, 102.0, 97.0, 105.0, 105.0, 98.0, 101.0, 100.0, 123.0, 105.0,
        103.0, 100.0, 95.0, 102.0, 106.0, 109.0, 102.0,
    ])
}

fn placebo() -> Sample {
    Sample::new(vec![
        99.0, 101.0, 100.0, 101.0, 102.0, 100.0, 97.0, 101.0, 104.0, 101.0, 102.0, 102.0, 100.0,
        105.0, 88.0, 101.0, 100.0, 104.0, 100.0, 100.0,
    ])
}

#[test]
fn swapped_groups_share_prior_centering() {
    let engine = PlugInEngine::default();
    let comparator =
        BayesianTwoGroupComparator::with_config(Config::default().run(RunConfig::new(200, 50, 1)))
            .engine(engine.clone())
            .without_renderer();

    comparator.compare_samples(&drug(), &placebo(), false).unwrap();
    comparator.compare_samples(&placebo(), &drug(), false).unwrap();

    let models = engine.models.lock().unwrap();
    let (forward, backward) = (&models[0], &models[1]);
    assert_eq!(forward.pooled, backward.pooled);
    for parameter in Parameter::ALL {
        assert_eq!(forward.prior(parameter), backward.prior(parameter));
    }
}

#[test]
fn swapped_groups_negate_difference_and_effect() {
    let comparator = BayesianTwoGroupComparator::with_config(
        Config::default()
            .run(RunConfig::new(200, 50, 1))
            .keep_traces(true),
    )
    .engine(PlugInEngine::default())
    .without_renderer();

    let forward = comparator.compare_samples(&drug(), &placebo(), false).unwrap();
    let backward = comparator.compare_samples(&placebo(), &drug(), false).unwrap();

    let (f, b) = (forward.traces.unwrap(), backward.traces.unwrap());
    for (x, y) in f
        .difference_of_means
        .values()
        .iter()
        .zip(b.difference_of_means.values())
    {
        assert_eq!(*x, -*y);
    }
    for (x, y) in f.effect_size.values().iter().zip(b.effect_size.values()) {
        assert_eq!(*x, -*y);
    }
    assert_eq!(forward.normality, backward.normality);
}

#[test]
fn swapped_groups_mirror_metropolis_posterior() {
    let comparator = BayesianTwoGroupComparator::with_config(Config::default().run(short_run()))
        .without_renderer();

    let forward = comparator.compare_samples(&drug(), &placebo(), false).unwrap();
    let backward = comparator.compare_samples(&placebo(), &drug(), false).unwrap();

    assert_eq!(forward.pooled, backward.pooled);
    assert!((forward.difference_of_means + backward.difference_of_means).abs() < 0.4);
    assert!((forward.group1_mean - backward.group2_mean).abs() < 0.4);
    assert!(forward.difference_of_means > 0.0);
    assert!(backward.difference_of_means < 0.0);
}
