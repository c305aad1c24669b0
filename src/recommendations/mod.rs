//! Recommendation Engine.
//!
//! Eight independent category generators turn an [`AnalysisResult`] into
//! actionable items with steps and effort estimates. Failure handling
//! mirrors the insight engine: a failed category is replaced by a single
//! synthetic Critical item. Output is ordered by priority, highest first.

mod architecture;
mod code_quality;
mod dependencies;
mod documentation;
mod performance;
mod security;
mod structure;
mod testing;

pub use architecture::ArchitectureRecommendations;
pub use code_quality::CodeQualityRecommendations;
pub use dependencies::DependencyRecommendations;
pub use documentation::DocumentationRecommendations;
pub use performance::PerformanceRecommendations;
pub use security::SecurityRecommendations;
pub use structure::StructureRecommendations;
pub use testing::TestingRecommendations;

use crate::config::AnalyzerConfig;
use crate::core::{
    ActionStep, AnalysisResult, EffortEstimate, Priority, Recommendation, RecommendationType,
};
use crate::errors::AnalysisError;
use tracing::{debug, warn};

/// One recommendation category.
pub trait RecommendationGenerator: Send + Sync {
    fn recommendation_type(&self) -> RecommendationType;

    fn generate(
        &self,
        result: &AnalysisResult,
        config: &AnalyzerConfig,
    ) -> Result<Vec<Recommendation>, AnalysisError>;
}

pub struct RecommendationEngine {
    generators: Vec<Box<dyn RecommendationGenerator>>,
}

impl Default for RecommendationEngine {
    fn default() -> Self {
        Self::with_generators(vec![
            Box::new(StructureRecommendations),
            Box::new(PerformanceRecommendations),
            Box::new(ArchitectureRecommendations),
            Box::new(CodeQualityRecommendations),
            Box::new(DependencyRecommendations),
            Box::new(SecurityRecommendations),
            Box::new(DocumentationRecommendations),
            Box::new(TestingRecommendations),
        ])
    }
}

impl RecommendationEngine {
    pub fn with_generators(generators: Vec<Box<dyn RecommendationGenerator>>) -> Self {
        Self { generators }
    }

    pub fn generator_count(&self) -> usize {
        self.generators.len()
    }

    /// Run every generator. Never fails.
    pub fn generate(
        &self,
        result: &AnalysisResult,
        config: &AnalyzerConfig,
    ) -> Vec<Recommendation> {
        let mut recommendations: Vec<Recommendation> = self
            .generators
            .iter()
            .flat_map(|generator| match generator.generate(result, config) {
                Ok(items) => items,
                Err(e) => {
                    warn!(
                        category = generator.recommendation_type().label(),
                        error = %e,
                        "recommendation generator failed"
                    );
                    vec![failure_recommendation(generator.recommendation_type(), &e)]
                }
            })
            .collect();
        recommendations.sort_by(|a, b| b.priority.cmp(&a.priority));
        debug!(recommendations = recommendations.len(), "recommendations generated");
        recommendations
    }
}

fn failure_recommendation(
    recommendation_type: RecommendationType,
    error: &AnalysisError,
) -> Recommendation {
    RecommendationBuilder::new(
        recommendation_type,
        Priority::Critical,
        format!("Review {} analysis failure", recommendation_type.label()),
    )
    .description(error.to_string())
    .rationale("This category could not be evaluated, so its findings are missing from the report.")
    .step("Re-run the analysis with -vv and inspect the log for this category", 0.5)
    .build()
}

/// Assembles a [`Recommendation`] and derives its effort from the steps.
pub struct RecommendationBuilder {
    recommendation_type: RecommendationType,
    priority: Priority,
    title: String,
    description: String,
    rationale: String,
    steps: Vec<ActionStep>,
    benefits: Vec<String>,
    risks: Vec<String>,
    skills: Vec<&'static str>,
}

impl RecommendationBuilder {
    pub fn new(
        recommendation_type: RecommendationType,
        priority: Priority,
        title: impl Into<String>,
    ) -> Self {
        Self {
            recommendation_type,
            priority,
            title: title.into(),
            description: String::new(),
            rationale: String::new(),
            steps: Vec::new(),
            benefits: Vec::new(),
            risks: Vec::new(),
            skills: Vec::new(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn rationale(mut self, rationale: impl Into<String>) -> Self {
        self.rationale = rationale.into();
        self
    }

    pub fn step(mut self, description: impl Into<String>, hours: f64) -> Self {
        self.steps.push(ActionStep::new(description, hours));
        self
    }

    pub fn benefit(mut self, benefit: impl Into<String>) -> Self {
        self.benefits.push(benefit.into());
        self
    }

    pub fn risk(mut self, risk: impl Into<String>) -> Self {
        self.risks.push(risk.into());
        self
    }

    pub fn skills(mut self, skills: &[&'static str]) -> Self {
        self.skills.extend_from_slice(skills);
        self
    }

    pub fn build(self) -> Recommendation {
        let effort = EffortEstimate::from_steps(&self.steps, &self.skills);
        Recommendation {
            recommendation_type: self.recommendation_type,
            priority: self.priority,
            title: self.title,
            description: self.description,
            rationale: self.rationale,
            action_steps: self.steps,
            benefits: self.benefits,
            risks: self.risks,
            effort,
        }
    }
}

/// Hours for a task repeated `count` times, capped so estimates stay sane.
pub(crate) fn scaled_hours(per_item: f64, count: usize, cap: f64) -> f64 {
    (per_item * count as f64).min(cap)
}
