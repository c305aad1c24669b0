use super::{scaled_hours, RecommendationBuilder, RecommendationGenerator};
use crate::config::AnalyzerConfig;
use crate::core::{
    AnalysisResult, ModuleConflictKind, Priority, Recommendation, RecommendationType,
};
use crate::errors::AnalysisError;

pub struct DependencyRecommendations;

impl RecommendationGenerator for DependencyRecommendations {
    fn recommendation_type(&self) -> RecommendationType {
        RecommendationType::Dependencies
    }

    fn generate(
        &self,
        result: &AnalysisResult,
        _config: &AnalyzerConfig,
    ) -> Result<Vec<Recommendation>, AnalysisError> {
        let Some(assets) = &result.assets else {
            return Ok(Vec::new());
        };
        let mut items = Vec::new();

        if let Some(conflicts) = assets.module_conflicts.as_deref().filter(|c| !c.is_empty()) {
            let has_cycle = conflicts
                .iter()
                .any(|c| c.kind == ModuleConflictKind::CircularReference);
            let mut builder = RecommendationBuilder::new(
                RecommendationType::Dependencies,
                Priority::High,
                "Resolve assembly definition conflicts",
            )
            .description(
                conflicts
                    .iter()
                    .map(|c| c.description.as_str())
                    .collect::<Vec<_>>()
                    .join("; "),
            )
            .rationale("Unity refuses to compile duplicate or mutually referencing assemblies.")
            .step("Give every assembly definition a unique name", 0.5);
            if has_cycle {
                builder = builder
                    .step(
                        "Move shared types into a lower-level assembly both can reference",
                        scaled_hours(3.0, conflicts.len(), 12.0),
                    )
                    .risk("Moving types changes their assembly-qualified names");
            }
            items.push(
                builder
                    .benefit("Assemblies that compile and load predictably")
                    .skills(&["Unity assemblies"])
                    .build(),
            );
        }

        if let Some(packages) = &assets.packages {
            let preview: Vec<String> = packages
                .iter()
                .filter(|p| p.is_preview)
                .map(|p| format!("{}@{}", p.name, p.version))
                .collect();
            if !preview.is_empty() {
                items.push(
                    RecommendationBuilder::new(
                        RecommendationType::Dependencies,
                        Priority::Medium,
                        "Replace preview packages with released versions",
                    )
                    .description(format!("Preview packages in use: {}.", preview.join(", ")))
                    .rationale(
                        "Preview packages can change their API or disappear between editor versions.",
                    )
                    .step(
                        "Check the Package Manager for a released version of each package",
                        scaled_hours(0.5, preview.len(), 4.0),
                    )
                    .step("Upgrade and run the project's tests", 2.0)
                    .benefit("Stable APIs across editor upgrades")
                    .risk("A released version may drop preview-only features")
                    .skills(&["Unity Package Manager"])
                    .build(),
                );
            }
        }
        Ok(items)
    }
}
