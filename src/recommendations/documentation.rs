use super::{scaled_hours, RecommendationBuilder, RecommendationGenerator};
use crate::config::AnalyzerConfig;
use crate::core::{AnalysisResult, Priority, Recommendation, RecommendationType};
use crate::errors::AnalysisError;

pub struct DocumentationRecommendations;

impl RecommendationGenerator for DocumentationRecommendations {
    fn recommendation_type(&self) -> RecommendationType {
        RecommendationType::Documentation
    }

    fn generate(
        &self,
        result: &AnalysisResult,
        config: &AnalyzerConfig,
    ) -> Result<Vec<Recommendation>, AnalysisError> {
        let mut items = Vec::new();

        if let Some(scripts) = &result.scripts {
            let undocumented: Vec<String> = scripts
                .classes
                .iter()
                .filter(|c| c.access.is_public() && !c.has_doc_comment)
                .map(|c| c.full_name())
                .collect();
            let public = scripts.classes.iter().filter(|c| c.access.is_public()).count();
            if public > 0 {
                let ratio = (public - undocumented.len()) as f64 / public as f64;
                let minimum = config.thresholds.min_documentation_ratio;
                if ratio < minimum {
                    let priority = if ratio < minimum / 2.0 {
                        Priority::Medium
                    } else {
                        Priority::Low
                    };
                    items.push(
                        RecommendationBuilder::new(
                            RecommendationType::Documentation,
                            priority,
                            "Document public classes",
                        )
                        .description(format!(
                            "{} of {} public classes lack XML documentation comments.",
                            undocumented.len(),
                            public
                        ))
                        .rationale(
                            "Summaries on public types show up in IDE tooltips and explain intent to new team members.",
                        )
                        .step(
                            "Add /// <summary> comments to public classes",
                            scaled_hours(0.15, undocumented.len(), 12.0),
                        )
                        .benefit("Faster onboarding and safer reuse")
                        .skills(&["C#"])
                        .build(),
                    );
                }
            }
        }

        if let Some(structure) = &result.structure {
            if !structure.has_readme {
                items.push(
                    RecommendationBuilder::new(
                        RecommendationType::Documentation,
                        Priority::Low,
                        "Add a project README",
                    )
                    .description("The project has no README file.")
                    .rationale(
                        "A README records the editor version, setup steps and folder conventions.",
                    )
                    .step("Write a README covering setup, editor version and layout", 1.0)
                    .benefit("New contributors can open the project without help")
                    .skills(&["Technical writing"])
                    .build(),
                );
            }
        }
        Ok(items)
    }
}
