use super::{evidence, InsightGenerator};
use crate::config::AnalyzerConfig;
use crate::core::{AnalysisResult, Insight, InsightType, ModuleConflictKind, Severity};
use crate::errors::AnalysisError;

pub struct DependencyInsights;

/// Edges per class above which coupling is called out.
const HIGH_COUPLING: f64 = 3.0;

impl InsightGenerator for DependencyInsights {
    fn insight_type(&self) -> InsightType {
        InsightType::Dependencies
    }

    fn generate(
        &self,
        result: &AnalysisResult,
        _config: &AnalyzerConfig,
    ) -> Result<Vec<Insight>, AnalysisError> {
        let mut insights = Vec::new();

        if let Some(assets) = &result.assets {
            match &assets.module_conflicts {
                Some(conflicts) if !conflicts.is_empty() => {
                    let has_cycle = conflicts
                        .iter()
                        .any(|c| c.kind == ModuleConflictKind::CircularReference);
                    insights.push(
                        Insight::new(
                            InsightType::Dependencies,
                            if has_cycle { Severity::High } else { Severity::Medium },
                            "Assembly definition conflicts",
                            "Duplicate or circular assembly definitions break compilation in the Unity editor.",
                        )
                        .with_confidence(0.95)
                        .with_evidence(conflicts.iter().map(|c| c.description.clone())),
                    );
                }
                Some(_) => {}
                None => insights.push(Insight::new(
                    InsightType::Dependencies,
                    Severity::Info,
                    "Assembly definitions not checked",
                    "At least one assembly definition could not be read, so conflicts were not checked.",
                )),
            }

            if let Some(packages) = &assets.packages {
                let previews: Vec<String> = packages
                    .iter()
                    .filter(|p| p.is_preview)
                    .map(|p| format!("{}@{}", p.name, p.version))
                    .collect();
                if !previews.is_empty() {
                    insights.push(
                        Insight::new(
                            InsightType::Dependencies,
                            Severity::Low,
                            "Preview packages in use",
                            "Preview and experimental packages can change without notice between releases.",
                        )
                        .with_confidence(0.9)
                        .with_evidence(previews),
                    );
                }
                insights.push(
                    Insight::new(
                        InsightType::Dependencies,
                        Severity::Info,
                        "Package dependencies",
                        format!("The project depends on {} packages.", packages.len()),
                    )
                    .with_context("packages", packages.len()),
                );
            }
        }

        if let Some(scripts) = &result.scripts {
            let graph = &scripts.dependency_graph;
            if scripts.metrics.coupling > HIGH_COUPLING {
                insights.push(
                    Insight::new(
                        InsightType::Dependencies,
                        Severity::Medium,
                        "Tightly coupled classes",
                        format!(
                            "Classes reference {:.1} other types on average.",
                            scripts.metrics.coupling
                        ),
                    )
                    .with_confidence(0.7),
                );
            }
            let external = graph.external_targets();
            if !external.is_empty() {
                insights.push(
                    Insight::new(
                        InsightType::Dependencies,
                        Severity::Info,
                        "External types",
                        format!(
                            "{} referenced types come from engine or third-party code.",
                            external.len()
                        ),
                    )
                    .with_evidence(evidence(external.iter().map(|s| s.to_string()), 10)),
                );
            }
        }
        Ok(insights)
    }
}
