use super::{RecommendationBuilder, RecommendationGenerator};
use crate::architecture::is_test_class;
use crate::config::AnalyzerConfig;
use crate::core::{AnalysisResult, Priority, Recommendation, RecommendationType};
use crate::errors::AnalysisError;

pub struct TestingRecommendations;

const LARGE_PROJECT_CLASSES: usize = 50;

impl RecommendationGenerator for TestingRecommendations {
    fn recommendation_type(&self) -> RecommendationType {
        RecommendationType::Testing
    }

    fn generate(
        &self,
        result: &AnalysisResult,
        _config: &AnalyzerConfig,
    ) -> Result<Vec<Recommendation>, AnalysisError> {
        let Some(scripts) = &result.scripts else {
            return Ok(Vec::new());
        };
        let tests = scripts.classes.iter().filter(|c| is_test_class(c)).count();
        let production = scripts.classes.len() - tests;
        if production == 0 {
            return Ok(Vec::new());
        }

        let recommendation = if tests == 0 {
            let priority = if production >= LARGE_PROJECT_CLASSES {
                Priority::High
            } else {
                Priority::Medium
            };
            RecommendationBuilder::new(
                RecommendationType::Testing,
                priority,
                "Set up automated tests",
            )
            .description(format!("None of the {} classes has a test.", production))
            .rationale("Without tests every refactoring is verified by playing the game by hand.")
            .step("Install the Unity Test Framework and create an EditMode test assembly", 1.0)
            .step("Cover pure logic classes with EditMode tests", 8.0)
            .step("Add PlayMode tests for critical gameplay flows", 8.0)
            .benefit("Regressions caught before they reach players")
            .skills(&["Unity Test Framework", "C#"])
            .build()
        } else if (tests as f64) / (production as f64) < 0.1 {
            RecommendationBuilder::new(
                RecommendationType::Testing,
                Priority::Low,
                "Broaden test coverage",
            )
            .description(format!(
                "{} test classes cover {} production classes.",
                tests, production
            ))
            .rationale("Most classes change without any automated check.")
            .step("Add tests for managers and data models first", 8.0)
            .benefit("Safer refactoring of core systems")
            .skills(&["Unity Test Framework", "C#"])
            .build()
        } else {
            return Ok(Vec::new());
        };
        Ok(vec![recommendation])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ClassDefinition, ScriptAnalysis};

    fn result_with(names: &[&str]) -> AnalysisResult {
        let mut result = AnalysisResult::empty("/p");
        result.scripts = Some(ScriptAnalysis {
            classes: names
                .iter()
                .map(|n| ClassDefinition::new(*n, format!("Assets/Scripts/{}.cs", n)))
                .collect(),
            ..ScriptAnalysis::default()
        });
        result
    }

    #[test]
    fn test_no_tests_is_medium_for_small_projects() {
        let items = TestingRecommendations
            .generate(&result_with(&["Player", "Enemy"]), &AnalyzerConfig::default())
            .unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].priority, Priority::Medium);
        assert_eq!(items[0].action_steps.len(), 3);
    }

    #[test]
    fn test_adequate_ratio_needs_nothing() {
        let items = TestingRecommendations
            .generate(&result_with(&["Player", "PlayerTests"]), &AnalyzerConfig::default())
            .unwrap();
        assert!(items.is_empty());
    }
}
