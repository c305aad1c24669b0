//! Per-stage results and the aggregate [`AnalysisResult`].
//!
//! Every sub-result is optional. Consumers (the insight and recommendation
//! engines, the output writers) must treat an absent sub-result as "nothing
//! to report" rather than as an error.

use super::findings::{CodeIssue, DesignPattern, Insight, Recommendation};
use super::source::{ClassDefinition, InterfaceDefinition};
use super::structure::{FileKind, IssueSeverity, StructureAnalysis};
use crate::graph::DependencyGraph;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

/// A source file that was skipped during extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionWarning {
    pub path: PathBuf,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CodeMetrics {
    pub total_classes: usize,
    pub total_interfaces: usize,
    pub total_methods: usize,
    pub total_lines_of_code: usize,
    pub average_method_complexity: f64,
    pub max_method_complexity: u32,
    pub average_class_complexity: f64,
    pub max_class_complexity: u32,
    /// Edges per node in the dependency graph
    pub coupling: f64,
    pub cohesion: f64,
    /// `cohesion` is the configured placeholder, not a measured value
    pub cohesion_is_placeholder: bool,
    /// In [0, 1]; higher is better
    pub maintainability_index: f64,
    /// In [0, 1]; higher is worse
    pub technical_debt_ratio: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScriptAnalysis {
    pub files_analyzed: usize,
    /// Sorted by file path, then declaration line
    pub classes: Vec<ClassDefinition>,
    pub interfaces: Vec<InterfaceDefinition>,
    pub dependency_graph: DependencyGraph,
    pub circular_dependencies: Vec<Vec<String>>,
    pub patterns: Vec<DesignPattern>,
    pub issues: Vec<CodeIssue>,
    pub metrics: CodeMetrics,
    pub warnings: Vec<ExtractionWarning>,
}

impl ScriptAnalysis {
    pub fn total_methods(&self) -> usize {
        self.classes.iter().map(|c| c.methods.len()).sum()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetKindSummary {
    pub count: usize,
    pub total_bytes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetEntry {
    pub path: PathBuf,
    pub kind: FileKind,
    pub size_bytes: u64,
}

/// A module manifest (`.asmdef`): a name and the names it references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssemblyDefinition {
    pub name: String,
    pub path: PathBuf,
    pub references: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleConflictKind {
    DuplicateName,
    CircularReference,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleConflict {
    pub kind: ModuleConflictKind,
    pub modules: Vec<String>,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageDependency {
    pub name: String,
    pub version: String,
    pub is_preview: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetAnalysis {
    pub total_assets: usize,
    pub total_size_bytes: u64,
    pub by_kind: BTreeMap<FileKind, AssetKindSummary>,
    /// Largest first
    pub largest_assets: Vec<AssetEntry>,
    pub assembly_definitions: Vec<AssemblyDefinition>,
    /// `None` when a module manifest could not be read and the check was skipped
    pub module_conflicts: Option<Vec<ModuleConflict>>,
    /// `None` when no readable package manifest exists
    pub packages: Option<Vec<PackageDependency>>,
    pub warnings: Vec<String>,
}

/// Role of a class inside the project, decided once per class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentCategory {
    MonoBehaviour,
    ScriptableObject,
    Editor,
    Manager,
    Controller,
    DataModel,
    Utility,
    Test,
    Other,
}

impl ComponentCategory {
    pub fn label(&self) -> &'static str {
        match self {
            Self::MonoBehaviour => "MonoBehaviour",
            Self::ScriptableObject => "ScriptableObject",
            Self::Editor => "Editor",
            Self::Manager => "Manager",
            Self::Controller => "Controller",
            Self::DataModel => "Data model",
            Self::Utility => "Utility",
            Self::Test => "Test",
            Self::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentInfo {
    pub class_id: String,
    pub name: String,
    pub category: ComponentCategory,
    pub file_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HubClass {
    pub id: String,
    pub dependents: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArchitectureStyle {
    ComponentBased,
    ManagerDriven,
    EventDriven,
    Mixed,
    Minimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchitectureAnalysis {
    pub components: Vec<ComponentInfo>,
    pub category_counts: BTreeMap<ComponentCategory, usize>,
    pub style: ArchitectureStyle,
    pub patterns: Vec<DesignPattern>,
    pub circular_dependencies: Vec<Vec<String>>,
    /// Most depended-upon internal classes, most dependents first
    pub hub_classes: Vec<HubClass>,
    pub max_inheritance_depth: usize,
    pub interface_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceIssueKind {
    ExpensiveCallInHotPath,
    AllocationInHotPath,
    ComplexHotPath,
    EmptyUnityCallback,
    LargeTexture,
    LargeAudio,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformanceIssue {
    pub kind: PerformanceIssueKind,
    pub severity: IssueSeverity,
    /// `Class.Method` for code findings, relative path for assets
    pub location: String,
    pub file_path: PathBuf,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceAnalysis {
    pub issues: Vec<PerformanceIssue>,
    /// Per-frame Unity callbacks found across all classes
    pub hot_path_methods: usize,
    /// In [0, 1]; higher is better
    pub performance_score: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueCounts {
    pub critical: usize,
    pub warning: usize,
    pub info: usize,
}

impl IssueCounts {
    pub fn record(&mut self, severity: IssueSeverity) {
        match severity {
            IssueSeverity::Critical => self.critical += 1,
            IssueSeverity::Warning => self.warning += 1,
            IssueSeverity::Info => self.info += 1,
        }
    }

    pub fn from_severities(severities: impl IntoIterator<Item = IssueSeverity>) -> Self {
        severities.into_iter().fold(Self::default(), |mut acc, s| {
            acc.record(s);
            acc
        })
    }

    pub fn total(&self) -> usize {
        self.critical + self.warning + self.info
    }

    pub fn merge(self, other: Self) -> Self {
        Self {
            critical: self.critical + other.critical,
            warning: self.warning + other.warning,
            info: self.info + other.info,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectMetrics {
    pub total_files: usize,
    pub total_folders: usize,
    pub total_scripts: usize,
    pub total_assets: usize,
    pub total_classes: usize,
    pub total_interfaces: usize,
    pub total_methods: usize,
    pub total_lines_of_code: usize,
    pub code: Option<CodeMetrics>,
    pub issue_counts: IssueCounts,
    /// In [0, 1]; higher is better
    pub maintainability_index: f64,
    /// In [0, 1]; higher is worse
    pub technical_debt_ratio: f64,
    /// In [0, 1]; share of structure checks passed
    pub structure_score: f64,
    /// In [0, 1]; blend of maintainability, structure and performance
    pub health_score: f64,
}

/// The single object handed to downstream consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub project_path: PathBuf,
    pub timestamp: DateTime<Utc>,
    pub structure: Option<StructureAnalysis>,
    pub scripts: Option<ScriptAnalysis>,
    pub assets: Option<AssetAnalysis>,
    pub architecture: Option<ArchitectureAnalysis>,
    pub performance: Option<PerformanceAnalysis>,
    pub metrics: Option<ProjectMetrics>,
    pub insights: Vec<Insight>,
    pub recommendations: Vec<Recommendation>,
    pub success: bool,
    pub error_message: Option<String>,
    pub elapsed_time: Duration,
}

impl AnalysisResult {
    /// A result with every sub-result absent, marked successful.
    pub fn empty(project_path: impl Into<PathBuf>) -> Self {
        Self {
            project_path: project_path.into(),
            timestamp: Utc::now(),
            structure: None,
            scripts: None,
            assets: None,
            architecture: None,
            performance: None,
            metrics: None,
            insights: Vec::new(),
            recommendations: Vec::new(),
            success: true,
            error_message: None,
            elapsed_time: Duration::ZERO,
        }
    }

    pub fn failed(
        project_path: impl Into<PathBuf>,
        message: impl Into<String>,
        elapsed_time: Duration,
    ) -> Self {
        Self {
            success: false,
            error_message: Some(message.into()),
            elapsed_time,
            ..Self::empty(project_path)
        }
    }

    pub fn classes(&self) -> &[ClassDefinition] {
        self.scripts
            .as_ref()
            .map(|s| s.classes.as_slice())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_counts() {
        let counts = IssueCounts::from_severities([
            IssueSeverity::Info,
            IssueSeverity::Warning,
            IssueSeverity::Warning,
            IssueSeverity::Critical,
        ]);
        assert_eq!(counts.critical, 1);
        assert_eq!(counts.warning, 2);
        assert_eq!(counts.info, 1);
        assert_eq!(counts.total(), 4);
        assert_eq!(counts.merge(counts).total(), 8);
    }

    #[test]
    fn test_failed_result() {
        let result = AnalysisResult::failed("/p", "missing Assets", Duration::from_millis(3));
        assert!(!result.success);
        assert_eq!(result.error_message.as_deref(), Some("missing Assets"));
        assert!(result.structure.is_none());
        assert!(result.classes().is_empty());
    }
}
