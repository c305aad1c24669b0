//! Data model shared by every analysis stage.
//!
//! All entities are created fresh for each analysis run and owned by that
//! run's [`AnalysisResult`]. Downstream consumers only read them.

pub mod findings;
pub mod results;
pub mod source;
pub mod structure;

pub use findings::{
    ActionStep, CodeIssue, CodeIssueKind, DesignPattern, EffortComplexity, EffortEstimate,
    Insight, InsightType, PatternType, Priority, Recommendation, RecommendationType, Severity,
};
pub use results::{
    AnalysisResult, ArchitectureAnalysis, ArchitectureStyle, AssemblyDefinition,
    AssetAnalysis, AssetEntry, AssetKindSummary, CodeMetrics, ComponentCategory, ComponentInfo,
    ExtractionWarning, HubClass, IssueCounts, ModuleConflict, ModuleConflictKind,
    PackageDependency, PerformanceAnalysis, PerformanceIssue, PerformanceIssueKind,
    ProjectMetrics, ScriptAnalysis,
};
pub use source::{
    AccessModifier, ClassDefinition, FieldDefinition, InterfaceDefinition, MethodDefinition,
    MethodModifiers, Parameter, PropertyDefinition, TypeKind,
};
pub use structure::{
    FileInfo, FileKind, FolderInfo, FolderKind, IssueSeverity, StructureAnalysis,
    StructureIssue, StructureIssueType,
};
