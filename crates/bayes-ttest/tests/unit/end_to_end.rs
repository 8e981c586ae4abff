//! Metropolis-backed scenarios with a shortened protocol.

use bayes_ttest::{
    BayesianTwoGroupComparator, Config, NormalPairGenerator, Parameter, Sample,
};

use crate::support::short_run;

fn comparator(seed: u64) -> BayesianTwoGroupComparator {
    BayesianTwoGroupComparator::with_config(Config::default().run(short_run()).seed(seed))
        .without_renderer()
}

#[test]
fn injected_offset_is_recovered() {
    let generator = NormalPairGenerator::new(2.0, 0.0, 1.0).unwrap().seed(7);
    let result = comparator(11)
        .generator(generator)
        .compare(None, 40, false)
        .unwrap();

    let diff = result.difference_of_means;
    assert!((diff - 2.0).abs() < (diff - 0.0).abs(), "diff = {diff}");
    assert!(result.effect_size > 0.0);
    assert!(result.prob_group1_greater() > 0.99);
    assert!(result.credible_difference());

    let welch = result.frequentist.unwrap();
    assert!(welch.p_value < 0.001);
}

#[test]
fn identical_samples_show_no_difference() {
    let sample: Vec<f64> = (0..30).map(|i| ((i * 37) % 30) as f64 / 10.0).collect();
    let result = comparator(3)
        .compare_samples(&Sample::new(sample.clone()), &Sample::new(sample), false)
        .unwrap();

    assert!(result.difference_of_means.abs() < 0.2, "{}", result.difference_of_means);
    assert!(result.effect_size.abs() < 0.2, "{}", result.effect_size);
    let (lo, hi) = result.derived.difference_of_means.hpd;
    assert!(lo < 0.0 && hi > 0.0);
    assert!(!result.credible_difference());
}

#[test]
fn outlier_does_not_drag_group_mean() {
    let mut bulk: Vec<f64> = (0..20).map(|i| -1.0 + i as f64 / 10.0).collect();
    let other = bulk.clone();
    bulk.push(50.0);

    let result = comparator(5)
        .compare_samples(&Sample::new(bulk), &Sample::new(other), false)
        .unwrap();

    // Arithmetic mean of the contaminated group is about 2.3.
    assert!(result.group1_mean.abs() < 1.0, "mu_1 = {}", result.group1_mean);
    // A heavy tail shows up as a small normality parameter.
    assert!(result.normality < 3.0, "log nu = {}", result.normality);
}

#[test]
fn same_seed_same_result() {
    let a = Sample::new(vec![1.2, 0.4, 2.2, 1.9, 0.8, 1.5, 1.1, 2.6]);
    let b = Sample::new(vec![0.3, -0.4, 0.9, 0.1, 0.6, -0.2, 0.5, 0.0]);

    let first = comparator(42).compare_samples(&a, &b, false).unwrap();
    let second = comparator(42).compare_samples(&a, &b, false).unwrap();
    assert_eq!(first, second);
}

#[test]
fn concurrent_comparisons_are_independent() {
    let a = Sample::new(vec![1.2, 0.4, 2.2, 1.9, 0.8, 1.5, 1.1, 2.6]);
    let b = Sample::new(vec![0.3, -0.4, 0.9, 0.1, 0.6, -0.2, 0.5, 0.0]);
    let comparator = comparator(9);

    let sequential = comparator.compare_samples(&a, &b, false).unwrap();
    let (left, right) = std::thread::scope(|s| {
        let left = s.spawn(|| comparator.compare_samples(&a, &b, false));
        let right = s.spawn(|| comparator.compare_samples(&b, &a, false));
        (left.join().unwrap(), right.join().unwrap())
    });

    assert_eq!(left.unwrap(), sequential);
    let right = right.unwrap();
    assert_eq!(right.pooled, sequential.pooled);
    assert!(right.difference_of_means < 0.0);
}

#[test]
fn diagnostics_cover_every_parameter() {
    let result = comparator(1)
        .compare(None, 40, false)
        .unwrap();

    for parameter in Parameter::ALL {
        let diag = &result.diagnostics[&parameter];
        assert!(diag.ess > 0.0);
        assert!(diag.rhat.is_some(), "split halves give an R-hat for {parameter}");
        let rate = diag.acceptance_rate.unwrap();
        assert!(rate > 0.0 && rate < 1.0);
    }
}
