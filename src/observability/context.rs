//! Thread-local context tracking for crash reports.
//!
//! Records the pipeline stage and the file or type being processed. Context
//! is per thread (rayon workers each keep their own); file counters are
//! global atomics.

use std::cell::RefCell;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

static FILES_PROCESSED: AtomicUsize = AtomicUsize::new(0);
static FILES_TOTAL: AtomicUsize = AtomicUsize::new(0);

thread_local! {
    static CURRENT_CONTEXT: RefCell<AnalysisContext> =
        const { RefCell::new(AnalysisContext::new()) };
}

/// Snapshot of what the analyzer was doing on this thread.
#[derive(Debug, Clone, Default)]
pub struct AnalysisContext {
    pub phase: Option<AnalysisPhase>,
    pub current_file: Option<PathBuf>,
    /// Type declaration currently being extracted
    pub current_type: Option<String>,
}

impl AnalysisContext {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            phase: None,
            current_file: None,
            current_type: None,
        }
    }
}

/// Pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum AnalysisPhase {
    Precondition,
    StructureAnalysis,
    ScriptExtraction,
    AssetAnalysis,
    ArchitectureDerivation,
    PerformanceDerivation,
    Metrics,
    Insights,
    Recommendations,
    Output,
}

impl AnalysisPhase {
    /// Human-facing stage label, as sent to progress reporters.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Precondition => "Checking project",
            Self::StructureAnalysis => "Analyzing project structure",
            Self::ScriptExtraction => "Analyzing scripts",
            Self::AssetAnalysis => "Analyzing assets",
            Self::ArchitectureDerivation => "Deriving architecture",
            Self::PerformanceDerivation => "Checking performance",
            Self::Metrics => "Calculating metrics",
            Self::Insights => "Generating insights",
            Self::Recommendations => "Generating recommendations",
            Self::Output => "Writing output",
        }
    }
}

impl std::fmt::Display for AnalysisPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Precondition => "precondition",
            Self::StructureAnalysis => "structure_analysis",
            Self::ScriptExtraction => "script_extraction",
            Self::AssetAnalysis => "asset_analysis",
            Self::ArchitectureDerivation => "architecture_derivation",
            Self::PerformanceDerivation => "performance_derivation",
            Self::Metrics => "metrics",
            Self::Insights => "insights",
            Self::Recommendations => "recommendations",
            Self::Output => "output",
        };
        f.write_str(name)
    }
}

/// Restores the previous context when dropped, so guards nest.
pub struct ContextGuard {
    previous: AnalysisContext,
}

impl Drop for ContextGuard {
    fn drop(&mut self) {
        CURRENT_CONTEXT.with(|ctx| {
            *ctx.borrow_mut() = self.previous.clone();
        });
    }
}

fn replace_with(update: impl FnOnce(&mut AnalysisContext)) -> ContextGuard {
    CURRENT_CONTEXT.with(|ctx| {
        let previous = ctx.borrow().clone();
        update(&mut ctx.borrow_mut());
        ContextGuard { previous }
    })
}

/// Set the current phase until the guard drops.
///
/// ```ignore
/// let _phase = set_phase(AnalysisPhase::ScriptExtraction);
/// // extraction work...
/// ```
#[must_use]
pub fn set_phase(phase: AnalysisPhase) -> ContextGuard {
    replace_with(|ctx| ctx.phase = Some(phase))
}

/// Set the current file until the guard drops.
#[must_use]
pub fn set_current_file(path: impl Into<PathBuf>) -> ContextGuard {
    let path = path.into();
    replace_with(|ctx| ctx.current_file = Some(path))
}

/// Set the type declaration being extracted until the guard drops.
#[must_use]
pub fn set_current_type(name: impl Into<String>) -> ContextGuard {
    let name = name.into();
    replace_with(|ctx| ctx.current_type = Some(name))
}

pub fn set_progress(processed: usize, total: usize) {
    FILES_PROCESSED.store(processed, Ordering::Relaxed);
    FILES_TOTAL.store(total, Ordering::Relaxed);
}

/// Safe to call from parallel iterators.
pub fn increment_processed() {
    FILES_PROCESSED.fetch_add(1, Ordering::Relaxed);
}

#[must_use]
pub fn get_current_context() -> AnalysisContext {
    CURRENT_CONTEXT.with(|ctx| ctx.borrow().clone())
}

/// `(processed, total)` files for the current run.
#[must_use]
pub fn get_progress() -> (usize, usize) {
    (
        FILES_PROCESSED.load(Ordering::Relaxed),
        FILES_TOTAL.load(Ordering::Relaxed),
    )
}

pub fn reset_context() {
    CURRENT_CONTEXT.with(|ctx| {
        *ctx.borrow_mut() = AnalysisContext::new();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_guard_restores_previous() {
        reset_context();

        let _outer = set_phase(AnalysisPhase::StructureAnalysis);
        {
            let _inner = set_phase(AnalysisPhase::ScriptExtraction);
            assert_eq!(
                get_current_context().phase,
                Some(AnalysisPhase::ScriptExtraction)
            );
        }
        assert_eq!(
            get_current_context().phase,
            Some(AnalysisPhase::StructureAnalysis)
        );
    }

    #[test]
    fn test_nested_file_and_type_guards() {
        reset_context();

        let _phase = set_phase(AnalysisPhase::ScriptExtraction);
        let _file = set_current_file("Assets/Scripts/Player.cs");
        {
            let _ty = set_current_type("Player");
            let ctx = get_current_context();
            assert_eq!(ctx.current_file, Some(PathBuf::from("Assets/Scripts/Player.cs")));
            assert_eq!(ctx.current_type.as_deref(), Some("Player"));
        }
        assert!(get_current_context().current_type.is_none());
    }

    #[test]
    fn test_phase_labels_and_names() {
        assert_eq!(AnalysisPhase::ScriptExtraction.to_string(), "script_extraction");
        assert_eq!(AnalysisPhase::Insights.label(), "Generating insights");
        assert!(AnalysisPhase::StructureAnalysis < AnalysisPhase::Recommendations);
    }

    #[test]
    fn test_empty_context_by_default() {
        std::thread::spawn(|| {
            let ctx = get_current_context();
            assert!(ctx.phase.is_none());
            assert!(ctx.current_file.is_none());
        })
        .join()
        .unwrap();
    }
}
