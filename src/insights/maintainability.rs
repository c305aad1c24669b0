use super::{observation_severity, percent, InsightGenerator};
use crate::config::AnalyzerConfig;
use crate::core::{AnalysisResult, Insight, InsightType, Severity};
use crate::errors::AnalysisError;

pub struct MaintainabilityInsights;

impl InsightGenerator for MaintainabilityInsights {
    fn insight_type(&self) -> InsightType {
        InsightType::Maintainability
    }

    fn generate(
        &self,
        result: &AnalysisResult,
        config: &AnalyzerConfig,
    ) -> Result<Vec<Insight>, AnalysisError> {
        let Some(metrics) = &result.metrics else {
            return Ok(Vec::new());
        };
        for (name, value) in [
            ("maintainability index", metrics.maintainability_index),
            ("technical debt ratio", metrics.technical_debt_ratio),
            ("health score", metrics.health_score),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(AnalysisError::generator(
                    InsightType::Maintainability.label(),
                    format!("{} {} is out of range", name, value),
                ));
            }
        }

        let mut insights = Vec::new();
        let has_code = metrics.code.as_ref().is_some_and(|c| c.total_classes > 0);
        if has_code {
            let index = metrics.maintainability_index;
            if index < 0.7 {
                insights.push(
                    Insight::new(
                        InsightType::Maintainability,
                        if index < 0.5 { Severity::High } else { Severity::Medium },
                        "Low maintainability",
                        format!(
                            "Maintainability index is {}, driven by {} issues and an average method complexity of {:.1}.",
                            percent(index),
                            metrics.issue_counts.total(),
                            metrics
                                .code
                                .as_ref()
                                .map(|c| c.average_method_complexity)
                                .unwrap_or(0.0)
                        ),
                    )
                    .with_confidence(0.75),
                );
            }

            let debt = metrics.technical_debt_ratio;
            if debt > 0.3 {
                insights.push(
                    Insight::new(
                        InsightType::Maintainability,
                        if debt > 0.5 { Severity::High } else { Severity::Medium },
                        "Accumulated technical debt",
                        format!("Technical debt ratio is {}.", percent(debt)),
                    )
                    .with_confidence(0.7)
                    .with_context("critical", metrics.issue_counts.critical)
                    .with_context("warnings", metrics.issue_counts.warning),
                );
            }
        }

        if let Some(scripts) = &result.scripts {
            let public: Vec<_> = scripts
                .classes
                .iter()
                .filter(|c| c.access.is_public())
                .collect();
            if !public.is_empty() {
                let documented = public.iter().filter(|c| c.has_doc_comment).count();
                let ratio = documented as f64 / public.len() as f64;
                if ratio < config.thresholds.min_documentation_ratio {
                    insights.push(
                        Insight::new(
                            InsightType::Maintainability,
                            observation_severity(result, Severity::Low),
                            "Sparse documentation",
                            format!(
                                "Only {} of public classes carry XML documentation comments.",
                                percent(ratio)
                            ),
                        )
                        .with_confidence(0.8)
                        .with_context("documented", documented)
                        .with_context("public_classes", public.len()),
                    );
                }
            }
        }

        insights.push(
            Insight::new(
                InsightType::Maintainability,
                Severity::Info,
                "Project health",
                format!(
                    "Health score {} (maintainability {}, structure {}).",
                    percent(metrics.health_score),
                    percent(metrics.maintainability_index),
                    percent(metrics.structure_score)
                ),
            )
            .with_context("issues", metrics.issue_counts.total()),
        );
        Ok(insights)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{AccessModifier, ClassDefinition, CodeMetrics, ProjectMetrics, ScriptAnalysis};

    fn metrics(maintainability: f64, debt: f64) -> ProjectMetrics {
        ProjectMetrics {
            code: Some(CodeMetrics {
                total_classes: 3,
                ..Default::default()
            }),
            maintainability_index: maintainability,
            technical_debt_ratio: debt,
            ..Default::default()
        }
    }

    #[test]
    fn test_low_maintainability_and_debt() {
        let mut result = AnalysisResult::empty("/p");
        result.metrics = Some(metrics(0.4, 0.35));
        let insights = MaintainabilityInsights
            .generate(&result, &AnalyzerConfig::default())
            .unwrap();
        let severities: Vec<_> = insights.iter().map(|i| i.severity).collect();
        assert_eq!(severities, vec![Severity::High, Severity::Medium, Severity::Info]);
    }

    #[test]
    fn test_metrics_without_code_only_report_health() {
        let mut result = AnalysisResult::empty("/p");
        result.metrics = Some(ProjectMetrics::default());
        let insights = MaintainabilityInsights
            .generate(&result, &AnalyzerConfig::default())
            .unwrap();
        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].severity, Severity::Info);
    }

    #[test]
    fn test_sparse_documentation_without_issues_is_info() {
        let mut class = ClassDefinition::new("Inventory", "Assets/Scripts/Inventory.cs");
        class.access = AccessModifier::Public;
        let mut result = AnalysisResult::empty("/p");
        result.metrics = Some(ProjectMetrics::default());
        result.scripts = Some(ScriptAnalysis {
            classes: vec![class],
            ..Default::default()
        });

        let insights = MaintainabilityInsights
            .generate(&result, &AnalyzerConfig::default())
            .unwrap();
        let sparse: Vec<_> = insights
            .iter()
            .filter(|i| i.title == "Sparse documentation")
            .collect();
        assert_eq!(sparse.len(), 1);
        assert_eq!(sparse[0].severity, Severity::Info);
    }

    #[test]
    fn test_invalid_metrics_are_an_error() {
        let mut result = AnalysisResult::empty("/p");
        result.metrics = Some(metrics(1.5, 0.0));
        assert!(MaintainabilityInsights
            .generate(&result, &AnalyzerConfig::default())
            .is_err());
    }
}
