//! Insight Generator.
//!
//! Seven independent category generators read the same [`AnalysisResult`].
//! Each returns an explicit `Result`; a failed category contributes one
//! synthetic Critical insight instead of its partial output. Generators
//! skip sub-results that are absent.
//!
//! Output order is severity descending, then confidence descending, with
//! ties kept in generator order.

mod architecture;
mod code_quality;
mod dependencies;
mod maintainability;
mod performance;
mod structure;
mod testing;

pub use architecture::ArchitectureInsights;
pub use code_quality::CodeQualityInsights;
pub use dependencies::DependencyInsights;
pub use maintainability::MaintainabilityInsights;
pub use performance::PerformanceInsights;
pub use structure::StructureInsights;
pub use testing::TestingInsights;

use crate::config::AnalyzerConfig;
use crate::core::{AnalysisResult, Insight, InsightType, Severity};
use crate::errors::AnalysisError;
use crate::metrics::issue_counts;
use tracing::{debug, warn};

/// One insight category.
pub trait InsightGenerator: Send + Sync {
    fn insight_type(&self) -> InsightType;

    fn generate(
        &self,
        result: &AnalysisResult,
        config: &AnalyzerConfig,
    ) -> Result<Vec<Insight>, AnalysisError>;
}

pub struct InsightEngine {
    generators: Vec<Box<dyn InsightGenerator>>,
}

impl Default for InsightEngine {
    fn default() -> Self {
        Self::with_generators(vec![
            Box::new(StructureInsights),
            Box::new(CodeQualityInsights),
            Box::new(PerformanceInsights),
            Box::new(ArchitectureInsights),
            Box::new(DependencyInsights),
            Box::new(MaintainabilityInsights),
            Box::new(TestingInsights),
        ])
    }
}

impl InsightEngine {
    pub fn with_generators(generators: Vec<Box<dyn InsightGenerator>>) -> Self {
        Self { generators }
    }

    pub fn generator_count(&self) -> usize {
        self.generators.len()
    }

    /// Run every generator. Never fails.
    pub fn generate(&self, result: &AnalysisResult, config: &AnalyzerConfig) -> Vec<Insight> {
        let mut insights: Vec<Insight> = self
            .generators
            .iter()
            .flat_map(|generator| match generator.generate(result, config) {
                Ok(insights) => insights,
                Err(e) => {
                    warn!(
                        category = generator.insight_type().label(),
                        error = %e,
                        "insight generator failed"
                    );
                    vec![failure_insight(generator.insight_type(), &e)]
                }
            })
            .collect();
        sort_insights(&mut insights);
        debug!(insights = insights.len(), "insights generated");
        insights
    }
}

/// Severity descending, then confidence descending; stable.
pub fn sort_insights(insights: &mut [Insight]) {
    insights.sort_by(|a, b| {
        b.severity
            .cmp(&a.severity)
            .then_with(|| b.confidence.total_cmp(&a.confidence))
    });
}

fn failure_insight(insight_type: InsightType, error: &AnalysisError) -> Insight {
    Insight::new(
        insight_type,
        Severity::Critical,
        format!("Could not generate {} insights", insight_type.label()),
        error.to_string(),
    )
    .with_context("error_category", error.category())
}

/// `High` from `high` issues, `Medium` from `medium`, otherwise `Low`.
pub(crate) fn graded(count: usize, medium: usize, high: usize) -> Severity {
    match count {
        c if c >= high => Severity::High,
        c if c >= medium => Severity::Medium,
        _ => Severity::Low,
    }
}

/// At most `limit` evidence lines, with a trailing count of the rest.
pub(crate) fn evidence<I>(items: I, limit: usize) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let items: Vec<String> = items.into_iter().collect();
    let rest = items.len().saturating_sub(limit);
    let mut lines: Vec<String> = items.into_iter().take(limit).collect();
    if rest > 0 {
        lines.push(format!("... and {} more", rest));
    }
    lines
}

pub(crate) fn percent(ratio: f64) -> String {
    format!("{:.0}%", ratio * 100.0)
}

/// Severity for an observation that no issue backs: `Info` while the
/// structure, code and performance issue lists are all empty.
pub(crate) fn observation_severity(result: &AnalysisResult, severity: Severity) -> Severity {
    if issue_counts(result).total() == 0 {
        Severity::Info
    } else {
        severity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    struct Failing;

    impl InsightGenerator for Failing {
        fn insight_type(&self) -> InsightType {
            InsightType::Performance
        }

        fn generate(
            &self,
            _: &AnalysisResult,
            _: &AnalyzerConfig,
        ) -> Result<Vec<Insight>, AnalysisError> {
            Err(AnalysisError::generator("performance", "inconsistent input"))
        }
    }

    struct Fixed(Vec<Insight>);

    impl InsightGenerator for Fixed {
        fn insight_type(&self) -> InsightType {
            InsightType::Structure
        }

        fn generate(
            &self,
            _: &AnalysisResult,
            _: &AnalyzerConfig,
        ) -> Result<Vec<Insight>, AnalysisError> {
            Ok(self.0.clone())
        }
    }

    fn insight(severity: Severity, confidence: f64, title: &str) -> Insight {
        Insight::new(InsightType::Structure, severity, title, "").with_confidence(confidence)
    }

    #[test]
    fn test_failed_generator_becomes_one_critical_insight() {
        let engine = InsightEngine::with_generators(vec![
            Box::new(Fixed(vec![insight(Severity::Low, 0.5, "kept")])),
            Box::new(Failing),
        ]);
        let insights = engine.generate(&AnalysisResult::empty("/p"), &AnalyzerConfig::default());
        assert_eq!(insights.len(), 2);
        assert_eq!(insights[0].severity, Severity::Critical);
        assert_eq!(insights[0].insight_type, InsightType::Performance);
        assert!(insights[0].description.contains("inconsistent input"));
        assert_eq!(insights[1].title, "kept");
    }

    #[test]
    fn test_ordering_is_severity_then_confidence_and_stable() {
        let engine = InsightEngine::with_generators(vec![Box::new(Fixed(vec![
            insight(Severity::Low, 0.9, "low"),
            insight(Severity::High, 0.5, "high-a"),
            insight(Severity::High, 0.8, "high-b"),
            insight(Severity::High, 0.5, "high-c"),
        ]))]);
        let titles: Vec<_> = engine
            .generate(&AnalysisResult::empty("/p"), &AnalyzerConfig::default())
            .into_iter()
            .map(|i| i.title)
            .collect();
        assert_eq!(titles, vec!["high-b", "high-a", "high-c", "low"]);
    }

    #[test]
    fn test_all_sub_results_absent_yields_nothing() {
        let insights = InsightEngine::default()
            .generate(&AnalysisResult::empty("/p"), &AnalyzerConfig::default());
        assert!(insights.is_empty());
    }

    #[test]
    fn test_helpers() {
        assert_eq!(graded(1, 5, 20), Severity::Low);
        assert_eq!(graded(5, 5, 20), Severity::Medium);
        assert_eq!(graded(25, 5, 20), Severity::High);
        let lines = evidence((0..5).map(|i| i.to_string()), 3);
        assert_eq!(lines, vec!["0", "1", "2", "... and 2 more"]);
        assert_eq!(percent(0.456), "46%");
    }
}
