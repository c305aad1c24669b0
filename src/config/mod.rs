//! Analyzer configuration.
//!
//! The heuristic tables (standard-folder catalog, naming patterns, expected
//! folders, extension map) and every threshold live here. A configuration
//! is built once per run, never mutated afterwards, and passed by reference
//! into each stage.

mod catalog;
mod loader;
mod scoring;
mod thresholds;

pub use catalog::{CatalogConfig, ExpectedFolder, ExtensionMapping, ExtensionsConfig, FolderPattern};
pub use loader::{
    directory_ancestors, load_config, load_config_file, parse_and_validate_config,
    CONFIG_FILE_NAME,
};
pub use scoring::MetricsConfig;
pub use thresholds::ThresholdsConfig;

use serde::{Deserialize, Serialize};

/// Root configuration structure for unitymap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Subdirectories that must exist below the project root
    #[serde(default = "default_marker_dirs")]
    pub marker_dirs: Vec<String>,

    /// Directory (below the root) whose tree is classified and scanned
    #[serde(default = "default_asset_root")]
    pub asset_root: String,

    /// Parse files across worker threads
    #[serde(default = "default_parallel")]
    pub parallel: bool,

    /// Abort the run after this many seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    /// Glob patterns (relative to the project root) excluded from the walk
    #[serde(default = "default_ignore_patterns")]
    pub ignore_patterns: Vec<String>,

    #[serde(default)]
    pub thresholds: ThresholdsConfig,

    #[serde(default)]
    pub catalog: CatalogConfig,

    #[serde(default)]
    pub extensions: ExtensionsConfig,

    #[serde(default)]
    pub metrics: MetricsConfig,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            marker_dirs: default_marker_dirs(),
            asset_root: default_asset_root(),
            thresholds: ThresholdsConfig::default(),
            catalog: CatalogConfig::default(),
            extensions: ExtensionsConfig::default(),
            metrics: MetricsConfig::default(),
            parallel: default_parallel(),
            timeout_secs: None,
            ignore_patterns: default_ignore_patterns(),
        }
    }
}

impl AnalyzerConfig {
    /// Check value ranges, returning every problem found.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        if self.marker_dirs.is_empty() {
            errors.push("marker_dirs must name at least one directory".to_string());
        }
        if self.asset_root.trim().is_empty() {
            errors.push("asset_root must not be empty".to_string());
        }
        errors.extend(self.thresholds.validate());
        errors.extend(self.metrics.validate());
        for pattern in &self.ignore_patterns {
            if let Err(e) = glob::Pattern::new(pattern) {
                errors.push(format!("ignore pattern '{}' is invalid: {}", pattern, e));
            }
        }
        if self.extensions.source.is_empty() {
            errors.push("extensions.source must list at least one extension".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn default_marker_dirs() -> Vec<String> {
    vec!["Assets".to_string(), "ProjectSettings".to_string()]
}

fn default_asset_root() -> String {
    "Assets".to_string()
}

fn default_parallel() -> bool {
    true
}

/// Hidden entries and `~`-suffixed folders, which the Unity editor skips.
fn default_ignore_patterns() -> Vec<String> {
    vec![
        "**/.*".to_string(),
        "**/.*/**".to_string(),
        "**/*~".to_string(),
        "**/*~/**".to_string(),
    ]
}
