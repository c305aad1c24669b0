use super::{scaled_hours, RecommendationBuilder, RecommendationGenerator};
use crate::config::AnalyzerConfig;
use crate::core::{
    AnalysisResult, Priority, Recommendation, RecommendationType, StructureIssueType,
};
use crate::errors::AnalysisError;

pub struct StructureRecommendations;

impl RecommendationGenerator for StructureRecommendations {
    fn recommendation_type(&self) -> RecommendationType {
        RecommendationType::Structure
    }

    fn generate(
        &self,
        result: &AnalysisResult,
        _config: &AnalyzerConfig,
    ) -> Result<Vec<Recommendation>, AnalysisError> {
        let Some(structure) = &result.structure else {
            return Ok(Vec::new());
        };
        let count = |t: StructureIssueType| structure.issues_of(t).count();
        let mut items = Vec::new();

        let missing: Vec<String> = structure
            .issues_of(StructureIssueType::MissingCriticalFolder)
            .chain(structure.issues_of(StructureIssueType::MissingRecommendedFolder))
            .map(|i| i.path.display().to_string())
            .collect();
        if !missing.is_empty() {
            let priority = if count(StructureIssueType::MissingCriticalFolder) > 0 {
                Priority::High
            } else {
                Priority::Low
            };
            items.push(
                RecommendationBuilder::new(
                    RecommendationType::Structure,
                    priority,
                    "Adopt the standard folder layout",
                )
                .description(format!("Create the missing folders: {}.", missing.join(", ")))
                .rationale(
                    "A predictable layout lets every team member find scripts, scenes and assets quickly.",
                )
                .step("Create the missing top-level folders", 0.5)
                .step(
                    "Move existing files into them from the Unity editor so references survive",
                    2.0,
                )
                .benefit("Faster navigation and onboarding")
                .risk("Moving files outside the editor breaks .meta references")
                .skills(&["Unity editor"])
                .build(),
            );
        }

        let naming = count(StructureIssueType::NamingViolation);
        if naming > 0 {
            items.push(
                RecommendationBuilder::new(
                    RecommendationType::Structure,
                    Priority::Low,
                    "Normalise file and folder names",
                )
                .description(format!("{} names are not PascalCase.", naming))
                .rationale(
                    "Spaces and punctuation in names cause friction with scripts, tooling and version control.",
                )
                .step(
                    "Rename entries to PascalCase inside the Unity editor",
                    scaled_hours(0.1, naming, 8.0),
                )
                .benefit("Consistent, tool-friendly paths")
                .risk("Renaming script files requires matching class names")
                .skills(&["Unity editor"])
                .build(),
            );
        }

        let deep = count(StructureIssueType::DeepNesting);
        if deep > 0 {
            items.push(
                RecommendationBuilder::new(
                    RecommendationType::Structure,
                    Priority::Medium,
                    "Flatten deeply nested folders",
                )
                .description(format!("{} subtrees exceed the nesting limit.", deep))
                .rationale(
                    "Deep hierarchies hide files and produce long paths that break some platforms.",
                )
                .step(
                    "Review the nested subtrees and merge intermediate folders",
                    scaled_hours(0.5, deep, 6.0),
                )
                .benefit("Shorter paths and simpler browsing")
                .skills(&["Unity editor"])
                .build(),
            );
        }

        let oversized = count(StructureIssueType::OversizedFile);
        if oversized > 0 {
            items.push(
                RecommendationBuilder::new(
                    RecommendationType::Structure,
                    Priority::Medium,
                    "Shrink or relocate oversized files",
                )
                .description(format!("{} files exceed the size limit.", oversized))
                .rationale("Large binaries slow imports and bloat the repository.")
                .step("Compress or downscale the source files", scaled_hours(0.5, oversized, 8.0))
                .step("Track remaining large binaries with Git LFS", 1.0)
                .benefit("Faster imports and clones")
                .risk("Lossy compression can reduce visual or audio quality")
                .skills(&["Asset pipeline", "Version control"])
                .build(),
            );
        }

        let misplaced = count(StructureIssueType::MisplacedFile);
        if misplaced > 0 {
            items.push(
                RecommendationBuilder::new(
                    RecommendationType::Structure,
                    Priority::Low,
                    "Move files into their type folders",
                )
                .description(format!("{} files sit outside the folder for their type.", misplaced))
                .rationale(
                    "Keeping assets with their kind makes import settings and ownership obvious.",
                )
                .step(
                    "Move misplaced files within the Unity editor",
                    scaled_hours(0.05, misplaced, 4.0),
                )
                .benefit("Predictable asset locations")
                .skills(&["Unity editor"])
                .build(),
            );
        }
        Ok(items)
    }
}
