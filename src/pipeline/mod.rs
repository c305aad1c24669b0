//! Top-level analysis pipeline.
//!
//! [`ProjectAnalyzer`] runs the stages in a fixed order over one walk of the
//! asset tree: structure, scripts, assets, architecture, performance,
//! metrics, insights, recommendations. Only the precondition check returns
//! an error; every other failure (cancellation, timeout) is folded into an
//! unsuccessful [`AnalysisResult`].

pub mod stage;

use crate::architecture;
use crate::assets::AssetAnalyzer;
use crate::cancellation::CancellationToken;
use crate::config::AnalyzerConfig;
use crate::core::{AnalysisResult, Insight, Recommendation};
use crate::errors::AnalysisError;
use crate::insights::InsightEngine;
use crate::io::walker::ProjectWalker;
use crate::metrics::MetricsCalculator;
use crate::observability::{set_phase, AnalysisPhase};
use crate::performance;
use crate::progress::{NoProgress, ProgressReporter};
use crate::recommendations::RecommendationEngine;
use crate::scripts::ScriptAnalyzer;
use crate::structure::StructureAnalyzer;
use stage::StageRunner;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, info_span, warn};

pub struct ProjectAnalyzer {
    config: Arc<AnalyzerConfig>,
    insights: InsightEngine,
    recommendations: RecommendationEngine,
}

impl ProjectAnalyzer {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self::with_shared_config(Arc::new(config))
    }

    pub fn with_shared_config(config: Arc<AnalyzerConfig>) -> Self {
        Self {
            config,
            insights: InsightEngine::default(),
            recommendations: RecommendationEngine::default(),
        }
    }

    pub fn with_insight_engine(mut self, engine: InsightEngine) -> Self {
        self.insights = engine;
        self
    }

    pub fn with_recommendation_engine(mut self, engine: RecommendationEngine) -> Self {
        self.recommendations = engine;
        self
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// `Ok` when `root` is a directory containing every marker directory.
    pub fn can_analyze(&self, root: &Path) -> Result<(), AnalysisError> {
        if !root.is_dir() {
            return Err(AnalysisError::precondition(
                "project directory does not exist",
                root,
            ));
        }
        let missing: Vec<&str> = self
            .config
            .marker_dirs
            .iter()
            .filter(|dir| !root.join(dir).is_dir())
            .map(String::as_str)
            .collect();
        if !missing.is_empty() {
            return Err(AnalysisError::precondition(
                format!("not a Unity project, missing {}", missing.join(", ")),
                root,
            ));
        }
        Ok(())
    }

    /// Analyze the project at `root` without progress reporting.
    pub fn analyze(&self, root: &Path) -> AnalysisResult {
        self.analyze_project(root, &NoProgress)
    }

    /// Analyze the project at `root`, honouring `timeout_secs` from the
    /// configuration.
    pub fn analyze_project(&self, root: &Path, progress: &dyn ProgressReporter) -> AnalysisResult {
        let token = match self.config.timeout_secs {
            Some(secs) => CancellationToken::with_timeout(Duration::from_secs(secs)),
            None => CancellationToken::new(),
        };
        self.analyze_project_with_token(root, progress, &token)
    }

    /// Analyze with a caller-owned token so the run can be cancelled from
    /// another thread.
    pub fn analyze_project_with_token(
        &self,
        root: &Path,
        progress: &dyn ProgressReporter,
        token: &CancellationToken,
    ) -> AnalysisResult {
        let start = Instant::now();
        let _span = info_span!("analyze_project", root = %root.display()).entered();

        let result = match self.precondition(root, progress) {
            Ok(()) => self.run_stages(root, progress, token),
            Err(e) => Err(e),
        };
        progress.finish();

        match result {
            Ok(mut analysis) => {
                analysis.elapsed_time = start.elapsed();
                info!(
                    elapsed_ms = analysis.elapsed_time.as_millis() as u64,
                    insights = analysis.insights.len(),
                    recommendations = analysis.recommendations.len(),
                    "analysis complete"
                );
                analysis
            }
            Err(e) => {
                warn!(error = %e, category = e.category(), "analysis failed");
                AnalysisResult::failed(root, e.to_string(), start.elapsed())
            }
        }
    }

    /// Regenerate insights for an existing result without rescanning.
    pub fn get_insights(&self, result: &AnalysisResult) -> Vec<Insight> {
        let _phase = set_phase(AnalysisPhase::Insights);
        self.insights.generate(result, &self.config)
    }

    /// Regenerate recommendations for an existing result without rescanning.
    pub fn get_recommendations(&self, result: &AnalysisResult) -> Vec<Recommendation> {
        let _phase = set_phase(AnalysisPhase::Recommendations);
        self.recommendations.generate(result, &self.config)
    }

    fn precondition(
        &self,
        root: &Path,
        progress: &dyn ProgressReporter,
    ) -> Result<(), AnalysisError> {
        let _phase = set_phase(AnalysisPhase::Precondition);
        self.can_analyze(root)?;
        progress.report(
            stage::stage_percent(AnalysisPhase::Precondition),
            AnalysisPhase::Precondition.label(),
        );
        Ok(())
    }

    fn run_stages(
        &self,
        root: &Path,
        progress: &dyn ProgressReporter,
        token: &CancellationToken,
    ) -> Result<AnalysisResult, AnalysisError> {
        let config = self.config.as_ref();
        let mut runner = StageRunner::new(progress, token);
        let mut result = AnalysisResult::empty(root);

        let (tree, structure) = runner.run(AnalysisPhase::StructureAnalysis, |_| {
            let tree = ProjectWalker::new(root, &config.asset_root)
                .with_ignore_patterns(&config.ignore_patterns)
                .walk()?;
            let structure = StructureAnalyzer::new(config).analyze_walked(root, &tree);
            Ok((tree, structure))
        })?;

        let sources: Vec<PathBuf> = tree.files.iter().map(|f| f.absolute.clone()).collect();
        let scripts = runner.run(AnalysisPhase::ScriptExtraction, |token| {
            ScriptAnalyzer::new(config).analyze_files(root, &sources, token)
        })?;

        let assets = runner.run(AnalysisPhase::AssetAnalysis, |token| {
            AssetAnalyzer::analyze(root, &structure.files, token)
        })?;

        let architecture = runner.run(AnalysisPhase::ArchitectureDerivation, |_| {
            Ok(architecture::analyze(&scripts, &config.thresholds))
        })?;

        let performance = runner.run(AnalysisPhase::PerformanceDerivation, |_| {
            Ok(performance::analyze(
                Some(&scripts),
                Some(&structure),
                &config.thresholds,
            ))
        })?;

        result.structure = Some(structure);
        result.scripts = Some(scripts);
        result.assets = Some(assets);
        result.architecture = Some(architecture);
        result.performance = Some(performance);

        let metrics = runner.run(AnalysisPhase::Metrics, |_| {
            Ok(MetricsCalculator::new(config).project_metrics(&result))
        })?;
        result.metrics = Some(metrics);

        let insights = runner.run(AnalysisPhase::Insights, |_| {
            Ok(self.insights.generate(&result, config))
        })?;
        result.insights = insights;

        let recommendations = runner.run(AnalysisPhase::Recommendations, |_| {
            Ok(self.recommendations.generate(&result, config))
        })?;
        result.recommendations = recommendations;

        for timing in runner.timings() {
            tracing::debug!(stage = %timing.format(), "stage timing");
        }
        Ok(result)
    }
}
