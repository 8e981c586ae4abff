//! JSON serialization for comparison results.

use bayes_ttest_core::ComparisonResult;

/// Serialize a result to a compact JSON string.
///
/// # Errors
///
/// Returns an error if serialization fails (should not happen for ComparisonResult).
pub fn to_json(result: &ComparisonResult) -> Result<String, serde_json::Error> {
    serde_json::to_string(result)
}

/// Serialize a result to a pretty-printed JSON string.
///
/// # Errors
///
/// Returns an error if serialization fails (should not happen for ComparisonResult).
pub fn to_json_pretty(result: &ComparisonResult) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BayesianTwoGroupComparator, Config};
    use bayes_ttest_core::{RunConfig, Sample};

    fn make_result(keep_traces: bool) -> ComparisonResult {
        let config = Config::default()
            .run(RunConfig::new(1500, 500, 1))
            .keep_traces(keep_traces);
        let groups = [
            Sample::new(vec![1.0, 1.4, 0.7, 1.9, 1.2]),
            Sample::new(vec![0.2, 0.5, -0.3, 0.1, 0.4]),
        ];
        BayesianTwoGroupComparator::with_config(config)
            .compare(Some(&groups[..]), 0, false)
            .unwrap()
    }

    #[test]
    fn test_json_field_names() {
        let json = to_json(&make_result(false)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        for key in ["group1_mean", "group2_mean", "effect_size", "normality", "priors"] {
            assert!(value.get(key).is_some(), "missing {}", key);
        }
        assert!(value["parameters"].get("mu_1").is_some());
        assert!(value["parameters"].get("nu").is_some());
        assert_eq!(value["priors"]["sigma_2"]["family"], "uniform");
        assert_eq!(value["priors"]["nu"]["family"], "exponential");
        assert!(value.get("traces").is_none());
    }

    #[test]
    fn test_json_includes_traces_when_kept() {
        let json = to_json_pretty(&make_result(true)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let diff = value["traces"]["difference_of_means"].as_array().unwrap();
        assert_eq!(diff.len(), 1000);
    }
}
