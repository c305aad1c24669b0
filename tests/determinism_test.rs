//! Repeated runs over the same tree produce the same findings.

mod common;

use pretty_assertions::assert_eq;
use unitymap::{AnalysisResult, AnalyzerConfig, ProjectAnalyzer};

/// Everything except the timestamp and elapsed time.
fn fingerprint(result: &AnalysisResult) -> serde_json::Value {
    let mut value = serde_json::to_value(result).unwrap();
    let object = value.as_object_mut().unwrap();
    object.remove("timestamp");
    object.remove("elapsed_time");
    value
}

#[test]
fn test_two_runs_produce_identical_results() {
    let project = common::sample_project();
    let analyzer = ProjectAnalyzer::new(AnalyzerConfig::default());

    let first = analyzer.analyze(project.path());
    let second = analyzer.analyze(project.path());

    assert!(first.success);
    assert_eq!(fingerprint(&first), fingerprint(&second));
}

#[test]
fn test_parallel_and_sequential_runs_agree() {
    let project = common::sample_project();
    let parallel = ProjectAnalyzer::new(AnalyzerConfig {
        parallel: true,
        ..AnalyzerConfig::default()
    })
    .analyze(project.path());
    let sequential = ProjectAnalyzer::new(AnalyzerConfig {
        parallel: false,
        ..AnalyzerConfig::default()
    })
    .analyze(project.path());

    assert_eq!(fingerprint(&parallel), fingerprint(&sequential));
}

#[test]
fn test_regenerated_lists_match_the_run() {
    let project = common::sample_project();
    let analyzer = ProjectAnalyzer::new(AnalyzerConfig::default());
    let result = analyzer.analyze(project.path());

    assert_eq!(analyzer.get_insights(&result), result.insights);
    assert_eq!(analyzer.get_recommendations(&result), result.recommendations);
}
