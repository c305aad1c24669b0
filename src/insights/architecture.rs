use super::{evidence, InsightGenerator};
use crate::config::AnalyzerConfig;
use crate::core::{AnalysisResult, ArchitectureStyle, Insight, InsightType, Severity};
use crate::errors::AnalysisError;

pub struct ArchitectureInsights;

/// Dependents at which a hub class is called out.
const HUB_DEPENDENTS: usize = 10;

impl InsightGenerator for ArchitectureInsights {
    fn insight_type(&self) -> InsightType {
        InsightType::Architecture
    }

    fn generate(
        &self,
        result: &AnalysisResult,
        config: &AnalyzerConfig,
    ) -> Result<Vec<Insight>, AnalysisError> {
        let Some(architecture) = &result.architecture else {
            return Ok(Vec::new());
        };
        let mut insights = Vec::new();

        if !architecture.circular_dependencies.is_empty() {
            let cycles = architecture
                .circular_dependencies
                .iter()
                .map(|cycle| cycle.join(" -> "));
            insights.push(
                Insight::new(
                    InsightType::Architecture,
                    Severity::High,
                    "Circular dependencies between classes",
                    format!(
                        "{} dependency cycles tie classes together so they cannot change independently.",
                        architecture.circular_dependencies.len()
                    ),
                )
                .with_confidence(0.9)
                .with_evidence(evidence(cycles, 5)),
            );
        }

        let limit = config.thresholds.max_inheritance_depth;
        if architecture.max_inheritance_depth > limit {
            insights.push(
                Insight::new(
                    InsightType::Architecture,
                    Severity::Medium,
                    "Deep inheritance hierarchy",
                    format!(
                        "The deepest internal inheritance chain has {} levels (limit {}).",
                        architecture.max_inheritance_depth, limit
                    ),
                )
                .with_confidence(0.8),
            );
        }

        let busy: Vec<String> = architecture
            .hub_classes
            .iter()
            .filter(|hub| hub.dependents >= HUB_DEPENDENTS)
            .map(|hub| format!("{} ({} dependents)", hub.id, hub.dependents))
            .collect();
        if !busy.is_empty() {
            insights.push(
                Insight::new(
                    InsightType::Architecture,
                    Severity::Info,
                    "Central classes",
                    "A few classes are depended on by much of the codebase; changes to them ripple widely.",
                )
                .with_confidence(0.7)
                .with_evidence(busy),
            );
        }

        if !architecture.components.is_empty() {
            let breakdown = architecture
                .category_counts
                .iter()
                .map(|(category, count)| format!("{}: {}", category.label(), count));
            insights.push(
                Insight::new(
                    InsightType::Architecture,
                    Severity::Info,
                    "Architecture style",
                    style_description(architecture.style),
                )
                .with_context("style", format!("{:?}", architecture.style))
                .with_context("interfaces", architecture.interface_count)
                .with_evidence(breakdown),
            );
        }

        if !architecture.patterns.is_empty() {
            insights.push(
                Insight::new(
                    InsightType::Architecture,
                    Severity::Info,
                    "Design patterns in use",
                    format!("{} pattern instances were recognised.", architecture.patterns.len()),
                )
                .with_confidence(0.7)
                .with_evidence(evidence(
                    architecture
                        .patterns
                        .iter()
                        .map(|p| format!("{} (confidence {:.1})", p.name, p.confidence)),
                    8,
                )),
            );
        }
        Ok(insights)
    }
}

fn style_description(style: ArchitectureStyle) -> &'static str {
    match style {
        ArchitectureStyle::ComponentBased => {
            "Most classes are MonoBehaviour components composed on GameObjects."
        }
        ArchitectureStyle::ManagerDriven => {
            "Behaviour is coordinated through manager classes, which tend to accumulate responsibilities."
        }
        ArchitectureStyle::EventDriven => {
            "Classes communicate mostly through events and delegates."
        }
        ArchitectureStyle::Mixed => "The codebase mixes components, managers and events.",
        ArchitectureStyle::Minimal => "The codebase is small enough that no style dominates.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ArchitectureAnalysis, HubClass};
    use std::collections::BTreeMap;

    fn architecture() -> ArchitectureAnalysis {
        ArchitectureAnalysis {
            components: Vec::new(),
            category_counts: BTreeMap::new(),
            style: ArchitectureStyle::Minimal,
            patterns: Vec::new(),
            circular_dependencies: Vec::new(),
            hub_classes: Vec::new(),
            max_inheritance_depth: 0,
            interface_count: 0,
        }
    }

    #[test]
    fn test_empty_architecture_has_no_insights() {
        let mut result = AnalysisResult::empty("/p");
        result.architecture = Some(architecture());
        let insights = ArchitectureInsights
            .generate(&result, &AnalyzerConfig::default())
            .unwrap();
        assert!(insights.is_empty());
    }

    #[test]
    fn test_cycles_depth_and_hubs() {
        let mut arch = architecture();
        arch.circular_dependencies = vec![vec!["A".into(), "B".into()]];
        arch.max_inheritance_depth = 6;
        arch.hub_classes = vec![HubClass {
            id: "Game.Core".into(),
            dependents: 12,
        }];
        let mut result = AnalysisResult::empty("/p");
        result.architecture = Some(arch);

        let insights = ArchitectureInsights
            .generate(&result, &AnalyzerConfig::default())
            .unwrap();
        let severities: Vec<_> = insights.iter().map(|i| i.severity).collect();
        assert_eq!(severities, vec![Severity::High, Severity::Medium, Severity::Info]);
        assert_eq!(insights[0].evidence, vec!["A -> B"]);
    }
}
