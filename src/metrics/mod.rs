//! Metrics Calculator.
//!
//! Aggregates complexity, coupling, cohesion, maintainability and debt from
//! the other stages. Every score is clamped to [0, 1].
//!
//! Cohesion is not measured: the configured placeholder is reported and
//! [`CodeMetrics::cohesion_is_placeholder`] is set.

use crate::config::{AnalyzerConfig, MetricsConfig};
use crate::core::{
    AnalysisResult, ClassDefinition, CodeIssue, CodeMetrics, FileKind, FolderKind,
    InterfaceDefinition, IssueCounts, ProjectMetrics, StructureAnalysis, StructureIssueType,
};
use crate::graph::DependencyGraph;
use std::collections::BTreeSet;
use std::path::Path;

pub struct MetricsCalculator<'a> {
    weights: &'a MetricsConfig,
    complexity_threshold: u32,
}

impl<'a> MetricsCalculator<'a> {
    pub fn new(config: &'a AnalyzerConfig) -> Self {
        Self {
            weights: &config.metrics,
            complexity_threshold: config.thresholds.complexity_threshold,
        }
    }

    /// Metrics for the extracted code alone.
    pub fn code_metrics(
        &self,
        classes: &[ClassDefinition],
        interfaces: &[InterfaceDefinition],
        graph: &DependencyGraph,
        issues: &[CodeIssue],
        cycle_count: usize,
    ) -> CodeMetrics {
        let method_complexities: Vec<u32> = classes
            .iter()
            .flat_map(|c| c.methods.iter().map(|m| m.cyclomatic_complexity))
            .collect();
        let class_complexities: Vec<u32> = classes.iter().map(|c| c.complexity).collect();
        let average_method_complexity = mean(&method_complexities);

        let counts = IssueCounts::from_severities(issues.iter().map(|i| i.severity));
        let weighted = self.weighted_issues(&counts);

        CodeMetrics {
            total_classes: classes.len(),
            total_interfaces: interfaces.len(),
            total_methods: method_complexities.len(),
            total_lines_of_code: classes.iter().map(|c| c.lines_of_code).sum::<usize>()
                + interfaces.iter().map(|i| i.lines_of_code).sum::<usize>(),
            average_method_complexity,
            max_method_complexity: method_complexities.iter().copied().max().unwrap_or(0),
            average_class_complexity: mean(&class_complexities),
            max_class_complexity: class_complexities.iter().copied().max().unwrap_or(0),
            coupling: coupling(graph),
            cohesion: self.weights.cohesion_placeholder,
            cohesion_is_placeholder: true,
            maintainability_index: self.maintainability(weighted, average_method_complexity),
            technical_debt_ratio: self.technical_debt(
                weighted,
                average_method_complexity,
                cycle_count,
            ),
        }
    }

    /// Project-wide totals and scores from whatever sub-results are present.
    pub fn project_metrics(&self, result: &AnalysisResult) -> ProjectMetrics {
        let structure = result.structure.as_ref();
        let scripts = result.scripts.as_ref();
        let code = scripts.map(|s| s.metrics.clone());

        let issue_counts = issue_counts(result);
        let weighted = self.weighted_issues(&issue_counts);
        let average_complexity = code
            .as_ref()
            .map(|c| c.average_method_complexity)
            .unwrap_or(0.0);
        let cycles = scripts.map(|s| s.circular_dependencies.len()).unwrap_or(0);

        let maintainability_index = self.maintainability(weighted, average_complexity);
        let structure_score = structure.map(structure_score);
        let performance_score = result.performance.as_ref().map(|p| p.performance_score);
        let health_score = weighted_mean(&[
            (Some(maintainability_index), 0.5),
            (structure_score, 0.25),
            (performance_score, 0.25),
        ]);

        ProjectMetrics {
            total_files: structure.map(|s| s.files.len()).unwrap_or(0),
            total_folders: structure.map(|s| s.folders.len()).unwrap_or(0),
            total_scripts: structure
                .map(|s| s.files_of(FileKind::Script).count())
                .unwrap_or(0),
            total_assets: result
                .assets
                .as_ref()
                .map(|a| a.total_assets)
                .or_else(|| {
                    structure.map(|s| s.files.iter().filter(|f| f.kind.is_asset()).count())
                })
                .unwrap_or(0),
            total_classes: code.as_ref().map(|c| c.total_classes).unwrap_or(0),
            total_interfaces: code.as_ref().map(|c| c.total_interfaces).unwrap_or(0),
            total_methods: code.as_ref().map(|c| c.total_methods).unwrap_or(0),
            total_lines_of_code: code.as_ref().map(|c| c.total_lines_of_code).unwrap_or(0),
            code,
            issue_counts,
            maintainability_index,
            technical_debt_ratio: self.technical_debt(weighted, average_complexity, cycles),
            structure_score: structure_score.unwrap_or(0.0),
            health_score,
        }
    }

    pub fn weighted_issues(&self, counts: &IssueCounts) -> f64 {
        counts.critical as f64 * self.weights.critical_weight
            + counts.warning as f64 * self.weights.warning_weight
            + counts.info as f64 * self.weights.info_weight
    }

    /// `1 - issues * penalty - (avg / threshold) * penalty`, clamped.
    pub fn maintainability(&self, weighted_issues: f64, average_complexity: f64) -> f64 {
        let score = 1.0
            - weighted_issues * self.weights.issue_penalty
            - self.complexity_ratio(average_complexity) * self.weights.complexity_penalty;
        clamp_unit(score)
    }

    pub fn technical_debt(
        &self,
        weighted_issues: f64,
        average_complexity: f64,
        cycle_count: usize,
    ) -> f64 {
        let debt = weighted_issues * self.weights.debt_issue_factor
            + self.complexity_ratio(average_complexity) * self.weights.debt_complexity_factor
            + cycle_count as f64 * self.weights.debt_cycle_factor;
        clamp_unit(debt)
    }

    fn complexity_ratio(&self, average_complexity: f64) -> f64 {
        if self.complexity_threshold == 0 {
            return 0.0;
        }
        average_complexity / f64::from(self.complexity_threshold)
    }
}

/// Edges per node; zero for an empty graph.
pub fn coupling(graph: &DependencyGraph) -> f64 {
    if graph.node_count() == 0 {
        return 0.0;
    }
    graph.edge_count() as f64 / graph.node_count() as f64
}

/// Severities of every structure, code and performance issue.
pub fn issue_counts(result: &AnalysisResult) -> IssueCounts {
    let structure = result
        .structure
        .iter()
        .flat_map(|s| s.issues.iter().map(|i| i.severity));
    let code = result
        .scripts
        .iter()
        .flat_map(|s| s.issues.iter().map(|i| i.severity));
    let performance = result
        .performance
        .iter()
        .flat_map(|p| p.issues.iter().map(|i| i.severity));
    IssueCounts::from_severities(structure.chain(code).chain(performance))
}

/// Share of structure checks passed: one check per catalog folder and one
/// per walked entry, failed when an issue names it.
pub fn structure_score(structure: &StructureAnalysis) -> f64 {
    let missing_folder = |t: StructureIssueType| {
        matches!(
            t,
            StructureIssueType::MissingCriticalFolder | StructureIssueType::MissingRecommendedFolder
        )
    };
    let missing = structure
        .issues
        .iter()
        .filter(|i| missing_folder(i.issue_type))
        .count();
    let flagged: BTreeSet<&Path> = structure
        .issues
        .iter()
        .filter(|i| !missing_folder(i.issue_type))
        .map(|i| i.path.as_path())
        .collect();
    let catalog_checks = missing
        + structure
            .folders
            .iter()
            .filter(|f| f.kind != FolderKind::Other)
            .count();
    let checks = catalog_checks + structure.folders.len() + structure.files.len();
    if checks == 0 {
        return 1.0;
    }
    let failed = missing + flagged.len();
    clamp_unit(1.0 - failed as f64 / checks as f64)
}

fn mean(values: &[u32]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().map(|&v| f64::from(v)).sum::<f64>() / values.len() as f64
}

fn weighted_mean(parts: &[(Option<f64>, f64)]) -> f64 {
    let (sum, weight) = parts
        .iter()
        .filter_map(|(value, weight)| value.map(|v| (v * weight, *weight)))
        .fold((0.0, 0.0), |(s, w), (v, wt)| (s + v, w + wt));
    if weight == 0.0 {
        0.0
    } else {
        clamp_unit(sum / weight)
    }
}

pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{
        CodeIssueKind, FileInfo, FolderInfo, IssueSeverity, MethodDefinition,
        PerformanceAnalysis, ScriptAnalysis, StructureIssue,
    };
    use proptest::prelude::*;
    use std::path::PathBuf;

    fn class_with(name: &str, complexities: &[u32]) -> ClassDefinition {
        let mut class = ClassDefinition::new(name, format!("Assets/Scripts/{name}.cs"));
        class.complexity = complexities.iter().sum::<u32>().max(1);
        class.lines_of_code = 10;
        class.methods = complexities
            .iter()
            .enumerate()
            .map(|(i, &c)| {
                let mut method = MethodDefinition::new(format!("M{i}"), i + 1);
                method.cyclomatic_complexity = c;
                method
            })
            .collect();
        class
    }

    fn issue(severity: IssueSeverity) -> CodeIssue {
        CodeIssue {
            kind: CodeIssueKind::LongMethod,
            severity,
            class_name: "A".into(),
            method_name: None,
            file_path: PathBuf::from("A.cs"),
            line: 1,
            message: String::new(),
        }
    }

    #[test]
    fn test_code_metrics_averages_and_placeholder_cohesion() {
        let config = AnalyzerConfig::default();
        let calculator = MetricsCalculator::new(&config);
        let classes = vec![class_with("A", &[1, 3]), class_with("B", &[5])];
        let graph = DependencyGraph::build(&classes);

        let metrics = calculator.code_metrics(&classes, &[], &graph, &[], 0);
        assert_eq!(metrics.total_classes, 2);
        assert_eq!(metrics.total_methods, 3);
        assert_eq!(metrics.max_method_complexity, 5);
        assert!((metrics.average_method_complexity - 3.0).abs() < 1e-9);
        assert_eq!(metrics.total_lines_of_code, 20);
        assert_eq!(metrics.coupling, 0.0);
        assert_eq!(metrics.cohesion, 0.8);
        assert!(metrics.cohesion_is_placeholder);
        // 1 - 0 - (3 / 10) * 0.3
        assert!((metrics.maintainability_index - 0.91).abs() < 1e-9);
        // (3 / 10) * 0.2
        assert!((metrics.technical_debt_ratio - 0.06).abs() < 1e-9);
    }

    #[test]
    fn test_issues_lower_maintainability() {
        let config = AnalyzerConfig::default();
        let calculator = MetricsCalculator::new(&config);
        let classes = vec![class_with("A", &[1])];
        let graph = DependencyGraph::build(&classes);
        let issues = vec![issue(IssueSeverity::Critical), issue(IssueSeverity::Warning)];

        let clean = calculator.code_metrics(&classes, &[], &graph, &[], 0);
        let dirty = calculator.code_metrics(&classes, &[], &graph, &issues, 2);
        assert!(dirty.maintainability_index < clean.maintainability_index);
        assert!(dirty.technical_debt_ratio > clean.technical_debt_ratio);
    }

    #[test]
    fn test_project_metrics_with_no_sub_results() {
        let config = AnalyzerConfig::default();
        let metrics = MetricsCalculator::new(&config).project_metrics(&AnalysisResult::empty("/p"));
        assert_eq!(metrics.total_files, 0);
        assert!(metrics.code.is_none());
        assert_eq!(metrics.issue_counts.total(), 0);
        assert_eq!(metrics.maintainability_index, 1.0);
        assert_eq!(metrics.health_score, 1.0);
    }

    #[test]
    fn test_project_metrics_blend_sub_results() {
        let config = AnalyzerConfig::default();
        let mut result = AnalysisResult::empty("/p");
        result.scripts = Some(ScriptAnalysis {
            issues: vec![issue(IssueSeverity::Warning)],
            ..Default::default()
        });
        result.performance = Some(PerformanceAnalysis {
            performance_score: 0.5,
            ..Default::default()
        });

        let metrics = MetricsCalculator::new(&config).project_metrics(&result);
        assert_eq!(metrics.issue_counts.warning, 1);
        assert!((metrics.maintainability_index - 0.98).abs() < 1e-9);
        let expected = (0.98 * 0.5 + 0.5 * 0.25) / 0.75;
        assert!((metrics.health_score - expected).abs() < 1e-9);
    }

    #[test]
    fn test_structure_score() {
        let mut structure = StructureAnalysis::default();
        assert_eq!(structure_score(&structure), 1.0);

        structure.folders.push(FolderInfo {
            path: PathBuf::from("Assets/Scripts"),
            name: "Scripts".into(),
            kind: FolderKind::Scripts,
            depth: 2,
            file_count: 1,
        });
        structure.files.push(FileInfo {
            path: PathBuf::from("Assets/Scripts/bad name.cs"),
            name: "bad name.cs".into(),
            extension: "cs".into(),
            kind: FileKind::Script,
            size_bytes: 1,
            depth: 3,
        });
        structure.issues.push(StructureIssue {
            issue_type: StructureIssueType::NamingViolation,
            severity: IssueSeverity::Info,
            path: PathBuf::from("Assets/Scripts/bad name.cs"),
            message: String::new(),
            suggestion: String::new(),
        });
        // checks: 1 catalog folder + 1 folder + 1 file; one failed
        assert!((structure_score(&structure) - 2.0 / 3.0).abs() < 1e-9);
    }

    proptest! {
        #[test]
        fn prop_scores_stay_in_unit_range(
            critical in 0usize..50,
            warning in 0usize..50,
            info in 0usize..50,
            complexity in 0.0f64..500.0,
            cycles in 0usize..20,
        ) {
            let config = AnalyzerConfig::default();
            let calculator = MetricsCalculator::new(&config);
            let weighted = calculator.weighted_issues(&IssueCounts { critical, warning, info });
            let m = calculator.maintainability(weighted, complexity);
            let d = calculator.technical_debt(weighted, complexity, cycles);
            prop_assert!((0.0..=1.0).contains(&m));
            prop_assert!((0.0..=1.0).contains(&d));
        }
    }
}
