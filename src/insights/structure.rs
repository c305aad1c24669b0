use super::{evidence, graded, percent, InsightGenerator};
use crate::config::AnalyzerConfig;
use crate::core::{AnalysisResult, Insight, InsightType, Severity, StructureIssueType};
use crate::errors::AnalysisError;

pub struct StructureInsights;

impl InsightGenerator for StructureInsights {
    fn insight_type(&self) -> InsightType {
        InsightType::Structure
    }

    fn generate(
        &self,
        result: &AnalysisResult,
        _config: &AnalyzerConfig,
    ) -> Result<Vec<Insight>, AnalysisError> {
        let Some(structure) = &result.structure else {
            return Ok(Vec::new());
        };
        let mut insights = Vec::new();
        let paths_of = |issue_type: StructureIssueType| {
            structure
                .issues_of(issue_type)
                .map(|i| i.path.display().to_string())
                .collect::<Vec<_>>()
        };

        let missing = paths_of(StructureIssueType::MissingCriticalFolder);
        if !missing.is_empty() {
            insights.push(
                Insight::new(
                    InsightType::Structure,
                    Severity::High,
                    "Core folders are missing",
                    "Scripts or scenes have no dedicated folder, which makes the project hard to navigate.",
                )
                .with_confidence(0.95)
                .with_evidence(missing),
            );
        }

        let naming = paths_of(StructureIssueType::NamingViolation);
        if !naming.is_empty() {
            insights.push(
                Insight::new(
                    InsightType::Structure,
                    graded(naming.len(), 10, usize::MAX),
                    "Inconsistent file and folder naming",
                    format!(
                        "{} names break the PascalCase convention used by Unity projects.",
                        naming.len()
                    ),
                )
                .with_confidence(0.9)
                .with_context("count", naming.len())
                .with_evidence(evidence(naming, 5)),
            );
        }

        let deep = paths_of(StructureIssueType::DeepNesting);
        if !deep.is_empty() {
            insights.push(
                Insight::new(
                    InsightType::Structure,
                    Severity::Medium,
                    "Deeply nested folders",
                    format!("{} subtrees are nested deeper than the configured limit.", deep.len()),
                )
                .with_confidence(0.85)
                .with_evidence(evidence(deep, 5)),
            );
        }

        let oversized = paths_of(StructureIssueType::OversizedFile);
        if !oversized.is_empty() {
            insights.push(
                Insight::new(
                    InsightType::Structure,
                    Severity::Medium,
                    "Oversized files in the asset tree",
                    "Very large files slow down imports, version control and builds.",
                )
                .with_confidence(0.9)
                .with_evidence(evidence(oversized, 5)),
            );
        }

        let misplaced = paths_of(StructureIssueType::MisplacedFile);
        if !misplaced.is_empty() {
            insights.push(
                Insight::new(
                    InsightType::Structure,
                    Severity::Low,
                    "Files outside their expected folders",
                    format!(
                        "{} files live outside the folder their type belongs in.",
                        misplaced.len()
                    ),
                )
                .with_confidence(0.7)
                .with_evidence(evidence(misplaced, 5)),
            );
        }

        let layout = if structure.follows_standard_structure {
            "The asset tree follows the standard Unity layout."
        } else {
            "The asset tree only partly follows the standard Unity layout."
        };
        insights.push(
            Insight::new(
                InsightType::Structure,
                Severity::Info,
                "Project layout",
                format!(
                    "{} {} of the standard folders are present at the top level.",
                    layout,
                    percent(structure.standard_folder_ratio)
                ),
            )
            .with_context("folders", structure.folders.len())
            .with_context("files", structure.files.len()),
        );
        Ok(insights)
    }
}
