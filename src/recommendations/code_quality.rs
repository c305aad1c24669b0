use super::{scaled_hours, RecommendationBuilder, RecommendationGenerator};
use crate::config::AnalyzerConfig;
use crate::core::{
    AnalysisResult, CodeIssue, CodeIssueKind, Priority, Recommendation, RecommendationType,
};
use crate::errors::AnalysisError;
use std::collections::BTreeSet;

pub struct CodeQualityRecommendations;

fn names(issues: &[&CodeIssue], limit: usize) -> String {
    let unique: BTreeSet<String> = issues
        .iter()
        .map(|i| match &i.method_name {
            Some(method) => format!("{}.{}", i.class_name, method),
            None => i.class_name.clone(),
        })
        .collect();
    let total = unique.len();
    let mut shown: Vec<String> = unique.into_iter().take(limit).collect();
    if total > limit {
        shown.push(format!("and {} more", total - limit));
    }
    shown.join(", ")
}

impl RecommendationGenerator for CodeQualityRecommendations {
    fn recommendation_type(&self) -> RecommendationType {
        RecommendationType::CodeQuality
    }

    fn generate(
        &self,
        result: &AnalysisResult,
        config: &AnalyzerConfig,
    ) -> Result<Vec<Recommendation>, AnalysisError> {
        let Some(scripts) = &result.scripts else {
            return Ok(Vec::new());
        };
        let of_kind = |kind: CodeIssueKind| -> Vec<&CodeIssue> {
            scripts.issues.iter().filter(|i| i.kind == kind).collect()
        };
        let thresholds = &config.thresholds;
        let mut items = Vec::new();

        let god = of_kind(CodeIssueKind::GodClass);
        if !god.is_empty() {
            items.push(
                RecommendationBuilder::new(
                    RecommendationType::CodeQuality,
                    Priority::High,
                    "Split oversized classes",
                )
                .description(format!("Classes doing too much: {}.", names(&god, 5)))
                .rationale(format!(
                    "Classes above {} methods or {} lines mix responsibilities and conflict in every merge.",
                    thresholds.god_class_methods, thresholds.god_class_lines
                ))
                .step("List the responsibilities of each class", scaled_hours(1.0, god.len(), 8.0))
                .step(
                    "Extract each responsibility into its own component or service",
                    scaled_hours(6.0, god.len(), 40.0),
                )
                .benefit("Smaller, focused classes that are easier to test")
                .risk("Serialized references in scenes and prefabs must be rewired")
                .skills(&["C#", "Refactoring"])
                .build(),
            );
        }

        let complex = of_kind(CodeIssueKind::HighComplexity);
        if !complex.is_empty() {
            items.push(
                RecommendationBuilder::new(
                    RecommendationType::CodeQuality,
                    Priority::Medium,
                    "Reduce method complexity",
                )
                .description(format!(
                    "Methods above complexity {}: {}.",
                    thresholds.complexity_threshold,
                    names(&complex, 5)
                ))
                .rationale("Highly branched methods hide defects and resist testing.")
                .step(
                    "Replace nested conditionals with guard clauses and extracted helpers",
                    scaled_hours(1.5, complex.len(), 20.0),
                )
                .benefit("Methods that can be understood and tested in isolation")
                .skills(&["C#", "Refactoring"])
                .build(),
            );
        }

        let long = of_kind(CodeIssueKind::LongMethod);
        if !long.is_empty() {
            items.push(
                RecommendationBuilder::new(
                    RecommendationType::CodeQuality,
                    Priority::Medium,
                    "Shorten long methods",
                )
                .description(format!(
                    "Methods longer than {} lines: {}.",
                    thresholds.long_method_lines,
                    names(&long, 5)
                ))
                .rationale(
                    "Long methods usually combine several steps that deserve names of their own.",
                )
                .step(
                    "Extract named helper methods for each step",
                    scaled_hours(1.0, long.len(), 16.0),
                )
                .benefit("Readable methods with a single purpose")
                .skills(&["C#"])
                .build(),
            );
        }

        let fields = of_kind(CodeIssueKind::PublicFieldExposure);
        if !fields.is_empty() {
            items.push(
                RecommendationBuilder::new(
                    RecommendationType::CodeQuality,
                    Priority::Low,
                    "Encapsulate public fields",
                )
                .description(format!("Classes exposing many public fields: {}.", names(&fields, 5)))
                .rationale(
                    "Private fields marked [SerializeField] keep inspector editing without exposing state to other scripts.",
                )
                .step(
                    "Make fields private with [SerializeField] and add properties where needed",
                    scaled_hours(0.5, fields.len(), 8.0),
                )
                .benefit("State that only changes through intended paths")
                .risk(
                    "Renaming serialized fields loses data unless [FormerlySerializedAs] is added",
                )
                .skills(&["C#", "Unity serialization"])
                .build(),
            );
        }
        Ok(items)
    }
}
