//! Structural quality analysis for Unity projects.
//!
//! A run walks the asset tree once, extracts C# class facts lexically,
//! builds a dependency graph, detects design patterns and anti-patterns,
//! inventories assets and manifests, and derives architecture, performance
//! and project metrics. Two independent engines then turn the combined
//! [`AnalysisResult`] into ranked insights and recommendations.
//!
//! ```no_run
//! use unitymap::{AnalyzerConfig, ProjectAnalyzer};
//! use std::path::Path;
//!
//! let analyzer = ProjectAnalyzer::new(AnalyzerConfig::default());
//! let result = analyzer.analyze(Path::new("MyGame"));
//! if result.success {
//!     for insight in &result.insights {
//!         println!("[{}] {}", insight.severity, insight.title);
//!     }
//! }
//! ```

// Export modules for library usage
pub mod architecture;
pub mod assets;
pub mod cancellation;
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod errors;
pub mod extraction;
pub mod graph;
pub mod insights;
pub mod io;
pub mod metrics;
pub mod observability;
pub mod patterns;
pub mod performance;
pub mod pipeline;
pub mod progress;
pub mod recommendations;
pub mod scripts;
pub mod structure;

// Re-export commonly used types
pub use crate::cancellation::CancellationToken;
pub use crate::config::{load_config, AnalyzerConfig};
pub use crate::core::{
    AnalysisResult, ClassDefinition, DesignPattern, Insight, InsightType, IssueSeverity,
    MethodDefinition, Priority, Recommendation, RecommendationType, Severity, StructureIssue,
};
pub use crate::errors::AnalysisError;
pub use crate::extraction::{CSharpExtractor, SourceExtractor};
pub use crate::graph::{DependencyEdge, DependencyGraph, DependencyNode};
pub use crate::insights::{InsightEngine, InsightGenerator};
pub use crate::patterns::{PatternDetector, PatternRule};
pub use crate::pipeline::ProjectAnalyzer;
pub use crate::progress::{CallbackProgress, NoProgress, ProgressReporter};
pub use crate::recommendations::{RecommendationEngine, RecommendationGenerator};
