use super::{observation_severity, percent, InsightGenerator};
use crate::architecture::is_test_class;
use crate::config::AnalyzerConfig;
use crate::core::{AnalysisResult, FolderKind, Insight, InsightType, Severity};
use crate::errors::AnalysisError;

pub struct TestingInsights;

/// Projects with at least this many classes and no tests rate `High`.
const LARGE_PROJECT_CLASSES: usize = 50;

impl InsightGenerator for TestingInsights {
    fn insight_type(&self) -> InsightType {
        InsightType::Testing
    }

    fn generate(
        &self,
        result: &AnalysisResult,
        _config: &AnalyzerConfig,
    ) -> Result<Vec<Insight>, AnalysisError> {
        let Some(scripts) = &result.scripts else {
            return Ok(Vec::new());
        };
        let (tests, production): (Vec<_>, Vec<_>) =
            scripts.classes.iter().partition(|c| is_test_class(c));
        if production.is_empty() {
            return Ok(Vec::new());
        }
        let has_test_folder = result
            .structure
            .as_ref()
            .is_some_and(|s| s.folders.iter().any(|f| f.kind == FolderKind::Tests));

        let insight = if tests.is_empty() {
            let severity = if production.len() >= LARGE_PROJECT_CLASSES {
                Severity::High
            } else {
                Severity::Medium
            };
            let severity = observation_severity(result, severity);
            Insight::new(
                InsightType::Testing,
                severity,
                "No automated tests",
                format!(
                    "None of the {} classes is covered by a test fixture.",
                    production.len()
                ),
            )
            .with_confidence(if has_test_folder { 0.6 } else { 0.85 })
        } else {
            let ratio = tests.len() as f64 / production.len() as f64;
            let severity = if ratio < 0.1 { Severity::Low } else { Severity::Info };
            let severity = observation_severity(result, severity);
            Insight::new(
                InsightType::Testing,
                severity,
                "Test coverage by class count",
                format!(
                    "{} test classes for {} production classes ({}).",
                    tests.len(),
                    production.len(),
                    percent(ratio)
                ),
            )
            .with_confidence(0.6)
        };
        Ok(vec![insight.with_context("test_folder", has_test_folder)])
    }
}
