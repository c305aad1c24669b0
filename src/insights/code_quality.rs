use super::{evidence, graded, InsightGenerator};
use crate::config::AnalyzerConfig;
use crate::core::{
    AnalysisResult, CodeIssue, CodeIssueKind, Insight, InsightType, IssueSeverity, Severity,
};
use crate::errors::AnalysisError;

pub struct CodeQualityInsights;

impl InsightGenerator for CodeQualityInsights {
    fn insight_type(&self) -> InsightType {
        InsightType::CodeQuality
    }

    fn generate(
        &self,
        result: &AnalysisResult,
        config: &AnalyzerConfig,
    ) -> Result<Vec<Insight>, AnalysisError> {
        let Some(scripts) = &result.scripts else {
            return Ok(Vec::new());
        };
        let of_kind = |kind: CodeIssueKind| -> Vec<&CodeIssue> {
            scripts.issues.iter().filter(|i| i.kind == kind).collect()
        };
        let mut insights = Vec::new();

        let god_classes = of_kind(CodeIssueKind::GodClass);
        if !god_classes.is_empty() {
            let severity = if god_classes.iter().any(|i| i.severity == IssueSeverity::Critical) {
                Severity::Critical
            } else {
                Severity::High
            };
            insights.push(
                Insight::new(
                    InsightType::CodeQuality,
                    severity,
                    "Oversized classes",
                    format!(
                        "{} classes exceed {} methods or {} lines and likely carry several responsibilities.",
                        god_classes.len(),
                        config.thresholds.god_class_methods,
                        config.thresholds.god_class_lines
                    ),
                )
                .with_confidence(0.85)
                .with_evidence(evidence(god_classes.iter().map(|i| i.message.clone()), 5)),
            );
        }

        let complex = of_kind(CodeIssueKind::HighComplexity);
        if !complex.is_empty() {
            insights.push(
                Insight::new(
                    InsightType::CodeQuality,
                    graded(complex.len(), 3, 10),
                    "Complex methods",
                    format!(
                        "{} methods exceed cyclomatic complexity {}.",
                        complex.len(),
                        config.thresholds.complexity_threshold
                    ),
                )
                .with_confidence(0.8)
                .with_context("max_complexity", scripts.metrics.max_method_complexity)
                .with_evidence(evidence(complex.iter().map(|i| i.message.clone()), 5)),
            );
        }

        let long = of_kind(CodeIssueKind::LongMethod);
        if !long.is_empty() {
            insights.push(
                Insight::new(
                    InsightType::CodeQuality,
                    graded(long.len(), 5, 15),
                    "Long methods",
                    format!(
                        "{} methods are longer than {} lines.",
                        long.len(),
                        config.thresholds.long_method_lines
                    ),
                )
                .with_confidence(0.75)
                .with_evidence(evidence(long.iter().map(|i| i.message.clone()), 5)),
            );
        }

        let exposed = of_kind(CodeIssueKind::PublicFieldExposure);
        if !exposed.is_empty() {
            insights.push(
                Insight::new(
                    InsightType::CodeQuality,
                    Severity::Low,
                    "Public mutable fields",
                    "Several classes expose state through public fields instead of serialized private fields.",
                )
                .with_confidence(0.6)
                .with_evidence(evidence(exposed.iter().map(|i| i.class_name.clone()), 5)),
            );
        }

        if !scripts.warnings.is_empty() {
            insights.push(
                Insight::new(
                    InsightType::CodeQuality,
                    Severity::Low,
                    "Some scripts could not be analyzed",
                    format!(
                        "{} source files were skipped; their classes are missing from every metric.",
                        scripts.warnings.len()
                    ),
                )
                .with_confidence(1.0)
                .with_evidence(evidence(
                    scripts
                        .warnings
                        .iter()
                        .map(|w| format!("{}: {}", w.path.display(), w.message)),
                    5,
                )),
            );
        }

        if !scripts.classes.is_empty() {
            insights.push(
                Insight::new(
                    InsightType::CodeQuality,
                    Severity::Info,
                    "Code size and complexity",
                    format!(
                        "{} classes with {} methods; average method complexity {:.1}.",
                        scripts.metrics.total_classes,
                        scripts.metrics.total_methods,
                        scripts.metrics.average_method_complexity
                    ),
                )
                .with_context("lines_of_code", scripts.metrics.total_lines_of_code),
            );
        }
        Ok(insights)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ScriptAnalysis;
    use std::path::PathBuf;

    fn issue(kind: CodeIssueKind, severity: IssueSeverity) -> CodeIssue {
        CodeIssue {
            kind,
            severity,
            class_name: "Game.Boss".into(),
            method_name: None,
            file_path: PathBuf::from("Assets/Scripts/Boss.cs"),
            line: 1,
            message: "Boss is big".into(),
        }
    }

    #[test]
    fn test_critical_god_class_is_critical_insight() {
        let mut result = AnalysisResult::empty("/p");
        result.scripts = Some(ScriptAnalysis {
            issues: vec![
                issue(CodeIssueKind::GodClass, IssueSeverity::Critical),
                issue(CodeIssueKind::LongMethod, IssueSeverity::Warning),
            ],
            ..Default::default()
        });
        let insights = CodeQualityInsights
            .generate(&result, &AnalyzerConfig::default())
            .unwrap();
        let severities: Vec<_> = insights.iter().map(|i| i.severity).collect();
        assert_eq!(severities, vec![Severity::Critical, Severity::Low]);
    }

    #[test]
    fn test_no_issues_no_classes_no_insights() {
        let mut result = AnalysisResult::empty("/p");
        result.scripts = Some(ScriptAnalysis::default());
        let insights = CodeQualityInsights
            .generate(&result, &AnalyzerConfig::default())
            .unwrap();
        assert!(insights.is_empty());
    }
}
