//! Stage progress for analysis runs.
//!
//! The pipeline reports a percentage and a stage label after each stage
//! completes. Reporters decide what to do with it: nothing, a callback, or an
//! indicatif bar on stderr.
//!
//! # Progress Behavior
//!
//! - **Quiet Mode**: no bar (respects `UNITYMAP_QUIET` and `--quiet`)
//! - **Non-TTY**: the bar is hidden in CI and piped output
//!
//! ```rust,no_run
//! use unitymap::progress::{ProgressConfig, TerminalProgress, ProgressReporter};
//!
//! let reporter = TerminalProgress::new(ProgressConfig::from_env(false, 0));
//! reporter.report(15, "structure");
//! reporter.finish();
//! ```

use indicatif::{ProgressBar, ProgressStyle};

pub const TEMPLATE_STAGES: &str = "{spinner} [{bar:30}] {pos:>3}% {msg}";

/// Receives `(percent, stage)` after each pipeline stage.
///
/// Implementations must be cheap and must not panic when a stage is
/// reported twice or out of order.
pub trait ProgressReporter: Send + Sync {
    fn report(&self, percent: u8, stage: &str);

    /// Called once when the run ends, successfully or not.
    fn finish(&self) {}
}

/// Discards every update.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressReporter for NoProgress {
    fn report(&self, _percent: u8, _stage: &str) {}
}

/// Forwards updates to a closure.
pub struct CallbackProgress<F>
where
    F: Fn(u8, &str) + Send + Sync,
{
    callback: F,
}

impl<F> CallbackProgress<F>
where
    F: Fn(u8, &str) + Send + Sync,
{
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> ProgressReporter for CallbackProgress<F>
where
    F: Fn(u8, &str) + Send + Sync,
{
    fn report(&self, percent: u8, stage: &str) {
        (self.callback)(percent, stage);
    }
}

/// Configuration for progress display behavior
#[derive(Debug, Clone, Default)]
pub struct ProgressConfig {
    pub quiet_mode: bool,
    pub verbosity: u8,
}

impl ProgressConfig {
    pub fn from_env(quiet: bool, verbosity: u8) -> Self {
        let env_quiet = std::env::var("UNITYMAP_QUIET").is_ok();
        Self {
            quiet_mode: quiet || env_quiet,
            verbosity,
        }
    }

    pub fn should_show_progress(&self) -> bool {
        if self.quiet_mode {
            return false;
        }
        use std::io::IsTerminal;
        std::io::stderr().is_terminal()
    }
}

/// A single percentage bar on stderr.
pub struct TerminalProgress {
    bar: ProgressBar,
}

impl TerminalProgress {
    pub fn new(config: ProgressConfig) -> Self {
        if !config.should_show_progress() {
            return Self {
                bar: ProgressBar::hidden(),
            };
        }
        let bar = ProgressBar::new(100);
        if let Ok(style) = ProgressStyle::default_bar().template(TEMPLATE_STAGES) {
            bar.set_style(style.progress_chars("█▓▒░  "));
        }
        Self { bar }
    }

    pub fn is_hidden(&self) -> bool {
        self.bar.is_hidden()
    }
}

impl ProgressReporter for TerminalProgress {
    fn report(&self, percent: u8, stage: &str) {
        self.bar.set_position(u64::from(percent.min(100)));
        self.bar.set_message(stage.to_string());
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_explicit_quiet_flag() {
        let config = ProgressConfig::from_env(true, 0);
        assert!(!config.should_show_progress());
        assert!(TerminalProgress::new(config).is_hidden());
    }

    #[test]
    fn test_callback_receives_updates_in_order() {
        let seen = Mutex::new(Vec::new());
        let reporter = CallbackProgress::new(|percent, stage: &str| {
            seen.lock().unwrap().push((percent, stage.to_string()));
        });
        reporter.report(15, "structure");
        reporter.report(45, "scripts");
        reporter.finish();
        assert_eq!(
            seen.into_inner().unwrap(),
            vec![(15, "structure".to_string()), (45, "scripts".to_string())]
        );
    }

    #[test]
    fn test_hidden_bar_tolerates_any_input() {
        let reporter = TerminalProgress::new(ProgressConfig {
            quiet_mode: true,
            verbosity: 0,
        });
        reporter.report(250, "overflow");
        reporter.report(10, "backwards");
        reporter.finish();
    }
}
