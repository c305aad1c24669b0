//! Sequential stage execution with progress, cancellation and timing.

use crate::cancellation::CancellationToken;
use crate::errors::AnalysisError;
use crate::observability::{set_phase, AnalysisPhase};
use crate::progress::ProgressReporter;
use std::time::{Duration, Instant};
use tracing::{debug, info_span};

/// Percentage reported once `phase` has completed.
pub fn stage_percent(phase: AnalysisPhase) -> u8 {
    match phase {
        AnalysisPhase::Precondition => 5,
        AnalysisPhase::StructureAnalysis => 15,
        AnalysisPhase::ScriptExtraction => 45,
        AnalysisPhase::AssetAnalysis => 60,
        AnalysisPhase::ArchitectureDerivation => 70,
        AnalysisPhase::PerformanceDerivation => 80,
        AnalysisPhase::Metrics => 85,
        AnalysisPhase::Insights => 92,
        AnalysisPhase::Recommendations | AnalysisPhase::Output => 100,
    }
}

/// Time spent in one completed stage.
#[derive(Debug, Clone, PartialEq)]
pub struct StageTiming {
    pub phase: AnalysisPhase,
    pub duration: Duration,
}

impl StageTiming {
    pub fn format(&self) -> String {
        format!("{}: {:.2}s", self.phase, self.duration.as_secs_f64())
    }
}

/// Runs stages in order. Each stage checks the token first, runs inside a
/// span with the phase recorded in the crash context, and reports progress
/// when it completes.
pub struct StageRunner<'a> {
    progress: &'a dyn ProgressReporter,
    token: &'a CancellationToken,
    timings: Vec<StageTiming>,
}

impl<'a> StageRunner<'a> {
    pub fn new(progress: &'a dyn ProgressReporter, token: &'a CancellationToken) -> Self {
        Self {
            progress,
            token,
            timings: Vec::new(),
        }
    }

    pub fn token(&self) -> &CancellationToken {
        self.token
    }

    pub fn run<T>(
        &mut self,
        phase: AnalysisPhase,
        work: impl FnOnce(&CancellationToken) -> Result<T, AnalysisError>,
    ) -> Result<T, AnalysisError> {
        self.token.check()?;
        let _span = info_span!("stage", phase = %phase).entered();
        let _phase = set_phase(phase);
        let start = Instant::now();

        let value = work(self.token)?;

        let duration = start.elapsed();
        debug!(elapsed_ms = duration.as_millis() as u64, "stage finished");
        self.timings.push(StageTiming { phase, duration });
        self.progress.report(stage_percent(phase), phase.label());
        Ok(value)
    }

    pub fn timings(&self) -> &[StageTiming] {
        &self.timings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::CallbackProgress;
    use std::sync::Mutex;

    #[test]
    fn test_percentages_increase_with_phase_order() {
        let phases = [
            AnalysisPhase::Precondition,
            AnalysisPhase::StructureAnalysis,
            AnalysisPhase::ScriptExtraction,
            AnalysisPhase::AssetAnalysis,
            AnalysisPhase::ArchitectureDerivation,
            AnalysisPhase::PerformanceDerivation,
            AnalysisPhase::Metrics,
            AnalysisPhase::Insights,
            AnalysisPhase::Recommendations,
        ];
        let percents: Vec<u8> = phases.iter().map(|p| stage_percent(*p)).collect();
        assert!(percents.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(percents.last(), Some(&100));
    }

    #[test]
    fn test_runner_reports_and_times_stages() {
        let seen = Mutex::new(Vec::new());
        let progress = CallbackProgress::new(|percent, _: &str| seen.lock().unwrap().push(percent));
        let token = CancellationToken::new();
        let mut runner = StageRunner::new(&progress, &token);

        let value = runner
            .run(AnalysisPhase::StructureAnalysis, |_| Ok(21))
            .unwrap();
        assert_eq!(value, 21);
        assert_eq!(runner.timings().len(), 1);
        assert!(runner.timings()[0].format().starts_with("structure_analysis: "));
        drop(runner);
        assert_eq!(seen.into_inner().unwrap(), vec![15]);
    }

    #[test]
    fn test_cancelled_token_skips_work() {
        let progress = crate::progress::NoProgress;
        let token = CancellationToken::new();
        token.cancel();
        let mut runner = StageRunner::new(&progress, &token);
        let mut ran = false;
        let result = runner.run(AnalysisPhase::Metrics, |_| {
            ran = true;
            Ok(())
        });
        assert_eq!(result, Err(AnalysisError::Cancelled));
        assert!(!ran);
        assert!(runner.timings().is_empty());
    }

    #[test]
    fn test_stage_error_is_not_reported_as_progress() {
        let seen = Mutex::new(Vec::<u8>::new());
        let progress = CallbackProgress::new(|percent, _: &str| seen.lock().unwrap().push(percent));
        let token = CancellationToken::new();
        let mut runner = StageRunner::new(&progress, &token);
        let result: Result<(), _> =
            runner.run(AnalysisPhase::AssetAnalysis, |_| Err(AnalysisError::io("disk gone")));
        assert!(result.is_err());
        drop(runner);
        assert!(seen.into_inner().unwrap().is_empty());
    }
}
