//! Script stage: extraction, dependency graph, patterns, code issues and
//! code metrics for every source file below the asset root.

pub mod callbacks;
mod issues;

pub use issues::CodeIssueDetector;

use crate::cancellation::CancellationToken;
use crate::config::AnalyzerConfig;
use crate::core::ScriptAnalysis;
use crate::errors::AnalysisError;
use crate::extraction::{extract_files, CSharpExtractor, SourceExtractor};
use crate::graph::DependencyGraph;
use crate::io::walker::ProjectWalker;
use crate::metrics::MetricsCalculator;
use crate::patterns::PatternDetector;
use std::path::{Path, PathBuf};
use tracing::{debug, info_span};

pub struct ScriptAnalyzer<'a> {
    config: &'a AnalyzerConfig,
    extractor: Box<dyn SourceExtractor>,
    patterns: PatternDetector,
}

impl<'a> ScriptAnalyzer<'a> {
    pub fn new(config: &'a AnalyzerConfig) -> Self {
        Self {
            config,
            extractor: Box::new(CSharpExtractor::new(config.thresholds.max_brace_depth)),
            patterns: PatternDetector::default(),
        }
    }

    pub fn with_extractor(mut self, extractor: impl SourceExtractor + 'static) -> Self {
        self.extractor = Box::new(extractor);
        self
    }

    pub fn with_pattern_detector(mut self, patterns: PatternDetector) -> Self {
        self.patterns = patterns;
        self
    }

    /// Walk the asset root below `root` and analyze every source file.
    pub fn analyze(
        &self,
        root: &Path,
        token: &CancellationToken,
    ) -> Result<ScriptAnalysis, AnalysisError> {
        let tree = ProjectWalker::new(root, &self.config.asset_root)
            .with_ignore_patterns(&self.config.ignore_patterns)
            .walk()?;
        let files: Vec<PathBuf> = tree.files.iter().map(|f| f.absolute.clone()).collect();
        self.analyze_files(root, &files, token)
    }

    /// Analyze the given files. Paths in the result are relative to `root`.
    ///
    /// Fails only on cancellation or timeout; unreadable files become
    /// warnings.
    pub fn analyze_files(
        &self,
        root: &Path,
        files: &[PathBuf],
        token: &CancellationToken,
    ) -> Result<ScriptAnalysis, AnalysisError> {
        let _span = info_span!("scripts", files = files.len()).entered();
        let sources: Vec<PathBuf> = files
            .iter()
            .filter(|path| {
                path.extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| self.config.extensions.is_source(ext))
            })
            .cloned()
            .collect();

        let mut output = extract_files(
            self.extractor.as_ref(),
            &sources,
            self.config.parallel,
            token,
        )?;
        for class in &mut output.classes {
            class.file_path = relative_to(root, &class.file_path);
        }
        for interface in &mut output.interfaces {
            interface.file_path = relative_to(root, &interface.file_path);
        }
        for warning in &mut output.warnings {
            warning.path = relative_to(root, &warning.path);
        }
        token.check()?;

        let graph = DependencyGraph::build(&output.classes);
        let circular_dependencies = graph.circular_dependencies();
        let patterns = self.patterns.detect(&output.classes);
        let issues =
            CodeIssueDetector::new(&self.config.thresholds, &graph).detect(&output.classes);
        let metrics = MetricsCalculator::new(self.config).code_metrics(
            &output.classes,
            &output.interfaces,
            &graph,
            &issues,
            circular_dependencies.len(),
        );

        debug!(
            classes = output.classes.len(),
            interfaces = output.interfaces.len(),
            edges = graph.edge_count(),
            cycles = circular_dependencies.len(),
            patterns = patterns.len(),
            issues = issues.len(),
            "script analysis finished"
        );

        Ok(ScriptAnalysis {
            files_analyzed: output.files_analyzed,
            classes: output.classes,
            interfaces: output.interfaces,
            dependency_graph: graph,
            circular_dependencies,
            patterns,
            issues,
            metrics,
            warnings: output.warnings,
        })
    }
}

/// `path` relative to `root`, or unchanged when it is not below it.
pub fn relative_to(root: &Path, path: &Path) -> PathBuf {
    path.strip_prefix(root)
        .map(Path::to_path_buf)
        .unwrap_or_else(|_| path.to_path_buf())
}
