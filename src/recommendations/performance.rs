use super::{scaled_hours, RecommendationBuilder, RecommendationGenerator};
use crate::config::AnalyzerConfig;
use crate::core::{
    AnalysisResult, IssueSeverity, PerformanceIssue, PerformanceIssueKind, Priority,
    Recommendation, RecommendationType,
};
use crate::errors::AnalysisError;
use std::collections::BTreeSet;

pub struct PerformanceRecommendations;

impl RecommendationGenerator for PerformanceRecommendations {
    fn recommendation_type(&self) -> RecommendationType {
        RecommendationType::Performance
    }

    fn generate(
        &self,
        result: &AnalysisResult,
        _config: &AnalyzerConfig,
    ) -> Result<Vec<Recommendation>, AnalysisError> {
        let Some(performance) = &result.performance else {
            return Ok(Vec::new());
        };
        let of_kind = |kind: PerformanceIssueKind| -> Vec<&PerformanceIssue> {
            performance.issues.iter().filter(|i| i.kind == kind).collect()
        };
        let locations = |issues: &[&PerformanceIssue]| -> String {
            let unique: BTreeSet<&str> = issues.iter().map(|i| i.location.as_str()).collect();
            unique.into_iter().collect::<Vec<_>>().join(", ")
        };
        let mut items = Vec::new();

        let calls = of_kind(PerformanceIssueKind::ExpensiveCallInHotPath);
        if !calls.is_empty() {
            let priority = if calls.iter().any(|i| i.severity == IssueSeverity::Critical) {
                Priority::Critical
            } else {
                Priority::High
            };
            items.push(
                RecommendationBuilder::new(
                    RecommendationType::Performance,
                    priority,
                    "Cache lookups made in per-frame callbacks",
                )
                .description(format!("Expensive calls run every frame in {}.", locations(&calls)))
                .rationale(
                    "GetComponent, Find and SendMessage walk the scene or use reflection; per frame they dominate CPU time.",
                )
                .step(
                    "Move lookups into Awake or Start and store the results in fields",
                    scaled_hours(0.5, calls.len(), 12.0),
                )
                .step("Profile the scene before and after with the Unity Profiler", 1.0)
                .benefit("Lower and steadier frame times")
                .risk("Cached references go stale when objects are destroyed")
                .skills(&["C#", "Unity Profiler"])
                .build(),
            );
        }

        let allocations = of_kind(PerformanceIssueKind::AllocationInHotPath);
        if !allocations.is_empty() {
            items.push(
                RecommendationBuilder::new(
                    RecommendationType::Performance,
                    Priority::Medium,
                    "Remove per-frame allocations",
                )
                .description(format!(
                    "Heap allocations happen every frame in {}.",
                    locations(&allocations)
                ))
                .rationale(
                    "Garbage produced each frame triggers collector pauses that show up as hitches.",
                )
                .step(
                    "Reuse preallocated collections and builders",
                    scaled_hours(1.0, allocations.len(), 10.0),
                )
                .benefit("Fewer garbage collection spikes")
                .skills(&["C#", "Memory profiling"])
                .build(),
            );
        }

        let complex = of_kind(PerformanceIssueKind::ComplexHotPath);
        if !complex.is_empty() {
            items.push(
                RecommendationBuilder::new(
                    RecommendationType::Performance,
                    Priority::Medium,
                    "Simplify per-frame logic",
                )
                .description(format!("Complex per-frame methods: {}.", locations(&complex)))
                .rationale(
                    "Branch-heavy Update methods are hard to optimise; state machines or events usually replace them.",
                )
                .step(
                    "Split the logic into states or event handlers",
                    scaled_hours(2.0, complex.len(), 16.0),
                )
                .benefit("Cheaper and more predictable frames")
                .risk("Behaviour changes if state transitions are missed")
                .skills(&["C#", "Refactoring"])
                .build(),
            );
        }

        let empty = of_kind(PerformanceIssueKind::EmptyUnityCallback);
        if !empty.is_empty() {
            items.push(
                RecommendationBuilder::new(
                    RecommendationType::Performance,
                    Priority::Low,
                    "Delete empty Unity callbacks",
                )
                .description(format!("Empty callbacks: {}.", locations(&empty)))
                .rationale("Unity dispatches message methods even when they do nothing.")
                .step("Delete the empty methods", scaled_hours(0.05, empty.len(), 1.0))
                .benefit("Less per-frame dispatch overhead")
                .skills(&["C#"])
                .build(),
            );
        }

        let heavy: Vec<&PerformanceIssue> = performance
            .issues
            .iter()
            .filter(|i| {
                matches!(
                    i.kind,
                    PerformanceIssueKind::LargeTexture | PerformanceIssueKind::LargeAudio
                )
            })
            .collect();
        if !heavy.is_empty() {
            items.push(
                RecommendationBuilder::new(
                    RecommendationType::Performance,
                    Priority::Medium,
                    "Tune import settings for heavy assets",
                )
                .description(format!(
                    "{} textures or audio clips exceed the size thresholds.",
                    heavy.len()
                ))
                .rationale("Oversized assets increase memory use, load times and build size.")
                .step(
                    "Set max texture sizes and compression per platform",
                    scaled_hours(0.25, heavy.len(), 6.0),
                )
                .step("Use streaming or compressed-in-memory load types for long clips", 0.5)
                .benefit("Smaller builds and lower memory use")
                .risk("Visible quality loss if compression is too aggressive")
                .skills(&["Asset pipeline"])
                .build(),
            );
        }
        Ok(items)
    }
}
