//! Error types for unitymap analysis operations.
//!
//! Only the precondition check (`ProjectAnalyzer::can_analyze`) surfaces an
//! `AnalysisError` to callers. Everything else is folded into the result
//! object as data: per-file failures become `ExtractionWarning`s, failed
//! insight/recommendation categories become synthetic entries, and a failed
//! run is reported through `AnalysisResult::success`.
//!
//! # Example
//!
//! ```rust
//! use unitymap::errors::AnalysisError;
//!
//! let err = AnalysisError::parse_with_path("unbalanced braces", "Assets/Scripts/Player.cs");
//! assert_eq!(err.category(), "Parse");
//! assert!(err.to_string().contains("Player.cs"));
//! ```

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Result alias used across the library.
pub type Result<T, E = AnalysisError> = std::result::Result<T, E>;

/// Unified error type for unitymap analysis operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    /// File system I/O errors (read, permissions, metadata)
    #[error("I/O error: {message}{}", display_path(.path))]
    Io {
        message: String,
        path: Option<PathBuf>,
    },

    /// Source or manifest content could not be interpreted
    #[error("Parse error: {message}{}", display_path(.path))]
    Parse {
        message: String,
        path: Option<PathBuf>,
        line: Option<usize>,
    },

    /// The project root or one of its marker folders is missing
    #[error("Cannot analyze project: {message}{}", display_path(.path))]
    Precondition {
        message: String,
        path: Option<PathBuf>,
    },

    /// Configuration file issues
    #[error("Configuration error: {message}{}", display_path(.path))]
    Config {
        message: String,
        path: Option<PathBuf>,
    },

    /// Module or package manifest could not be read
    #[error("Manifest error: {message}{}", display_path(.path))]
    Manifest {
        message: String,
        path: Option<PathBuf>,
    },

    /// An insight or recommendation category generator failed
    #[error("{category} generator failed: {message}")]
    Generator { category: String, message: String },

    /// The run was cancelled through its cancellation token
    #[error("Analysis cancelled")]
    Cancelled,

    /// The run exceeded its configured deadline
    #[error("Analysis timed out after {:.1}s", .elapsed.as_secs_f64())]
    TimedOut { elapsed: Duration },
}

fn display_path(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| format!(" (path: {})", p.display()))
        .unwrap_or_default()
}

impl AnalysisError {
    /// Create an I/O error with a message.
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
            path: None,
        }
    }

    /// Create an I/O error with a message and path context.
    pub fn io_with_path(message: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::Io {
            message: message.into(),
            path: Some(path.into()),
        }
    }

    /// Create a parse error with path context (no line number).
    pub fn parse_with_path(message: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::Parse {
            message: message.into(),
            path: Some(path.into()),
            line: None,
        }
    }

    /// Create a parse error with full context.
    pub fn parse_with_context(
        message: impl Into<String>,
        path: impl Into<PathBuf>,
        line: usize,
    ) -> Self {
        Self::Parse {
            message: message.into(),
            path: Some(path.into()),
            line: Some(line),
        }
    }

    pub fn precondition(message: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::Precondition {
            message: message.into(),
            path: Some(path.into()),
        }
    }

    pub fn config_with_path(message: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::Config {
            message: message.into(),
            path: Some(path.into()),
        }
    }

    pub fn manifest_with_path(message: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::Manifest {
            message: message.into(),
            path: Some(path.into()),
        }
    }

    /// Create a generator failure for the named category.
    pub fn generator(category: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Generator {
            category: category.into(),
            message: message.into(),
        }
    }

    /// Get the associated path, if any.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::Io { path, .. }
            | Self::Parse { path, .. }
            | Self::Precondition { path, .. }
            | Self::Config { path, .. }
            | Self::Manifest { path, .. } => path.as_ref(),
            Self::Generator { .. } | Self::Cancelled | Self::TimedOut { .. } => None,
        }
    }

    /// Get the error category name.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Io { .. } => "I/O",
            Self::Parse { .. } => "Parse",
            Self::Precondition { .. } => "Precondition",
            Self::Config { .. } => "Config",
            Self::Manifest { .. } => "Manifest",
            Self::Generator { .. } => "Generator",
            Self::Cancelled => "Cancelled",
            Self::TimedOut { .. } => "Timeout",
        }
    }

    /// Whether the whole run must stop because of this error.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Precondition { .. } | Self::Cancelled | Self::TimedOut { .. }
        )
    }
}

impl From<std::io::Error> for AnalysisError {
    fn from(err: std::io::Error) -> Self {
        Self::io(err.to_string())
    }
}

impl From<serde_json::Error> for AnalysisError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse {
            message: err.to_string(),
            path: None,
            line: Some(err.line()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_path() {
        let err = AnalysisError::io_with_path("permission denied", "/tmp/project/Assets");
        let text = err.to_string();
        assert!(text.starts_with("I/O error: permission denied"));
        assert!(text.contains("/tmp/project/Assets"));
    }

    #[test]
    fn test_display_without_path() {
        let err = AnalysisError::io("disk full");
        assert_eq!(err.to_string(), "I/O error: disk full");
    }

    #[test]
    fn test_fatal_classification() {
        assert!(AnalysisError::precondition("missing Assets", "/p").is_fatal());
        assert!(AnalysisError::Cancelled.is_fatal());
        assert!(!AnalysisError::parse_with_path("bad", "a.cs").is_fatal());
        assert!(!AnalysisError::generator("testing", "boom").is_fatal());
    }

    #[test]
    fn test_generator_message() {
        let err = AnalysisError::generator("performance", "index out of range");
        assert_eq!(
            err.to_string(),
            "performance generator failed: index out of range"
        );
        assert_eq!(err.category(), "Generator");
        assert!(err.path().is_none());
    }

    #[test]
    fn test_from_serde_json_error_keeps_line() {
        let err: AnalysisError = serde_json::from_str::<serde_json::Value>("{\n  \"name\": }")
            .unwrap_err()
            .into();
        match err {
            AnalysisError::Parse { line, .. } => assert_eq!(line, Some(2)),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_timed_out_display() {
        let err = AnalysisError::TimedOut {
            elapsed: Duration::from_millis(1500),
        };
        assert_eq!(err.to_string(), "Analysis timed out after 1.5s");
    }
}
