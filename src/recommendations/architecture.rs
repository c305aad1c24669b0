use super::{scaled_hours, RecommendationBuilder, RecommendationGenerator};
use crate::config::AnalyzerConfig;
use crate::core::{
    AnalysisResult, ArchitectureStyle, ComponentCategory, Priority, Recommendation,
    RecommendationType,
};
use crate::errors::AnalysisError;

pub struct ArchitectureRecommendations;

const HUB_DEPENDENTS: usize = 10;

impl RecommendationGenerator for ArchitectureRecommendations {
    fn recommendation_type(&self) -> RecommendationType {
        RecommendationType::Architecture
    }

    fn generate(
        &self,
        result: &AnalysisResult,
        config: &AnalyzerConfig,
    ) -> Result<Vec<Recommendation>, AnalysisError> {
        let Some(architecture) = &result.architecture else {
            return Ok(Vec::new());
        };
        let mut items = Vec::new();

        let cycles = &architecture.circular_dependencies;
        if !cycles.is_empty() {
            let shown: Vec<String> = cycles.iter().take(3).map(|c| c.join(" -> ")).collect();
            items.push(
                RecommendationBuilder::new(
                    RecommendationType::Architecture,
                    Priority::High,
                    "Break circular class dependencies",
                )
                .description(format!(
                    "{} dependency cycles, including {}.",
                    cycles.len(),
                    shown.join("; ")
                ))
                .rationale(
                    "Classes in a cycle cannot be changed, tested or moved to another assembly independently.",
                )
                .step(
                    "Extract an interface for one edge of each cycle",
                    scaled_hours(2.0, cycles.len(), 24.0),
                )
                .step(
                    "Replace direct calls with events where the dependency is a notification",
                    2.0,
                )
                .benefit("Independent modules that can be tested in isolation")
                .risk("Initialisation order can change when references become indirect")
                .skills(&["C#", "Software design"])
                .build(),
            );
        }

        let hubs: Vec<String> = architecture
            .hub_classes
            .iter()
            .filter(|hub| hub.dependents >= HUB_DEPENDENTS)
            .map(|hub| format!("{} ({})", hub.id, hub.dependents))
            .collect();
        if !hubs.is_empty() {
            items.push(
                RecommendationBuilder::new(
                    RecommendationType::Architecture,
                    Priority::Medium,
                    "Reduce reliance on hub classes",
                )
                .description(format!("Heavily depended-upon classes: {}.", hubs.join(", ")))
                .rationale("A change to a hub ripples into every dependent class.")
                .step(
                    "Split hubs along their responsibilities",
                    scaled_hours(4.0, hubs.len(), 24.0),
                )
                .step("Depend on narrow interfaces instead of the concrete hub", 2.0)
                .benefit("Smaller blast radius for changes")
                .skills(&["C#", "Refactoring"])
                .build(),
            );
        }

        if architecture.max_inheritance_depth > config.thresholds.max_inheritance_depth {
            items.push(
                RecommendationBuilder::new(
                    RecommendationType::Architecture,
                    Priority::Medium,
                    "Prefer composition over deep inheritance",
                )
                .description(format!(
                    "The deepest inheritance chain has {} levels; the limit is {}.",
                    architecture.max_inheritance_depth, config.thresholds.max_inheritance_depth
                ))
                .rationale(
                    "Unity favours small components attached to a GameObject over class hierarchies.",
                )
                .step("Move shared behaviour from base classes into separate components", 6.0)
                .benefit("Behaviour that can be mixed per GameObject")
                .risk("Serialized fields on removed base classes lose their values")
                .skills(&["C#", "Unity component model"])
                .build(),
            );
        }

        if architecture.style == ArchitectureStyle::ManagerDriven {
            let managers = architecture
                .category_counts
                .get(&ComponentCategory::Manager)
                .copied()
                .unwrap_or(0);
            items.push(
                RecommendationBuilder::new(
                    RecommendationType::Architecture,
                    Priority::Medium,
                    "Decentralise manager classes",
                )
                .description(format!(
                    "{} manager or system classes coordinate most behaviour.",
                    managers
                ))
                .rationale(
                    "Central managers accumulate unrelated responsibilities and hidden global state.",
                )
                .step(
                    "Move per-object logic from managers into components",
                    scaled_hours(2.0, managers, 20.0),
                )
                .step("Communicate through events or ScriptableObject channels", 4.0)
                .benefit("Less global state and easier scene composition")
                .risk("Ordering guarantees previously enforced by a manager may be lost")
                .skills(&["C#", "Software design"])
                .build(),
            );
        }

        let script_count = result
            .scripts
            .as_ref()
            .map_or(0, |scripts| scripts.files_analyzed);
        let has_asmdefs = result
            .assets
            .as_ref()
            .is_some_and(|assets| !assets.assembly_definitions.is_empty());
        if script_count > config.thresholds.assembly_definition_script_count && !has_asmdefs {
            items.push(
                RecommendationBuilder::new(
                    RecommendationType::Architecture,
                    Priority::Medium,
                    "Split scripts into assembly definitions",
                )
                .description(format!(
                    "{} scripts compile into a single assembly.",
                    script_count
                ))
                .rationale(
                    "Assembly definitions shorten recompile times and make module boundaries explicit.",
                )
                .step("Group scripts by feature and add an .asmdef per group", 4.0)
                .step("Declare references between the new assemblies", 2.0)
                .benefit("Faster iteration after script changes")
                .risk("Hidden dependencies surface as compile errors")
                .skills(&["Unity assemblies"])
                .build(),
            );
        }
        Ok(items)
    }
}
