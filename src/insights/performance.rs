use super::{evidence, percent, InsightGenerator};
use crate::config::AnalyzerConfig;
use crate::core::{
    AnalysisResult, Insight, InsightType, IssueSeverity, PerformanceIssue, PerformanceIssueKind,
    Severity,
};
use crate::errors::AnalysisError;

pub struct PerformanceInsights;

struct KindSummary {
    kind: PerformanceIssueKind,
    severity: Severity,
    title: &'static str,
    description: &'static str,
    confidence: f64,
}

const SUMMARIES: &[KindSummary] = &[
    KindSummary {
        kind: PerformanceIssueKind::ExpensiveCallInHotPath,
        severity: Severity::High,
        title: "Expensive lookups in per-frame callbacks",
        description: "Component lookups, scene searches or messaging run every frame instead of being cached.",
        confidence: 0.85,
    },
    KindSummary {
        kind: PerformanceIssueKind::AllocationInHotPath,
        severity: Severity::Medium,
        title: "Allocations in per-frame callbacks",
        description: "Per-frame heap allocations cause garbage collection spikes.",
        confidence: 0.75,
    },
    KindSummary {
        kind: PerformanceIssueKind::ComplexHotPath,
        severity: Severity::Medium,
        title: "Complex per-frame logic",
        description: "Highly branched Update methods are hard to profile and optimise.",
        confidence: 0.7,
    },
    KindSummary {
        kind: PerformanceIssueKind::EmptyUnityCallback,
        severity: Severity::Low,
        title: "Empty Unity callbacks",
        description: "Unity invokes empty message methods anyway; delete them.",
        confidence: 0.95,
    },
    KindSummary {
        kind: PerformanceIssueKind::LargeTexture,
        severity: Severity::Medium,
        title: "Large textures",
        description: "Large source textures inflate build size and memory unless import settings compensate.",
        confidence: 0.6,
    },
    KindSummary {
        kind: PerformanceIssueKind::LargeAudio,
        severity: Severity::Medium,
        title: "Large audio clips",
        description: "Large clips loaded fully into memory increase load times.",
        confidence: 0.6,
    },
];

impl InsightGenerator for PerformanceInsights {
    fn insight_type(&self) -> InsightType {
        InsightType::Performance
    }

    fn generate(
        &self,
        result: &AnalysisResult,
        _config: &AnalyzerConfig,
    ) -> Result<Vec<Insight>, AnalysisError> {
        let Some(performance) = &result.performance else {
            return Ok(Vec::new());
        };
        if !(0.0..=1.0).contains(&performance.performance_score) {
            return Err(AnalysisError::generator(
                InsightType::Performance.label(),
                format!("performance score {} is out of range", performance.performance_score),
            ));
        }

        let mut insights: Vec<Insight> = SUMMARIES
            .iter()
            .filter_map(|summary| {
                let issues: Vec<&PerformanceIssue> = performance
                    .issues
                    .iter()
                    .filter(|i| i.kind == summary.kind)
                    .collect();
                if issues.is_empty() {
                    return None;
                }
                let severity = if issues.iter().any(|i| i.severity == IssueSeverity::Critical) {
                    Severity::Critical
                } else {
                    summary.severity
                };
                Some(
                    Insight::new(
                        InsightType::Performance,
                        severity,
                        summary.title,
                        summary.description,
                    )
                    .with_confidence(summary.confidence)
                    .with_context("count", issues.len())
                    .with_evidence(evidence(
                        issues
                            .iter()
                            .map(|i| format!("{}: {}", i.location, i.description)),
                        5,
                    )),
                )
            })
            .collect();

        if performance.hot_path_methods > 0 || !performance.issues.is_empty() {
            insights.push(
                Insight::new(
                    InsightType::Performance,
                    Severity::Info,
                    "Performance score",
                    format!(
                        "Performance score {} across {} per-frame callbacks.",
                        percent(performance.performance_score),
                        performance.hot_path_methods
                    ),
                )
                .with_context("score", format!("{:.2}", performance.performance_score)),
            );
        }
        Ok(insights)
    }
}
