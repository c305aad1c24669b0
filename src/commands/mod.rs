//! CLI command implementations.
//!
//! - **analyze**: run the full pipeline and write the report
//! - **check**: run only the project precondition
//! - **init**: write a default `.unitymap.toml`

pub mod analyze;
pub mod check;
pub mod init;

pub use analyze::{handle_analyze, AnalyzeConfig};
pub use check::check_project;
pub use init::{default_config_toml, init_config};

use crate::config::{load_config, load_config_file, AnalyzerConfig};
use anyhow::{Context, Result};
use std::path::Path;

/// The explicit configuration file if given, otherwise the nearest
/// `.unitymap.toml` above `project`.
pub(crate) fn resolve_config(project: &Path, explicit: Option<&Path>) -> Result<AnalyzerConfig> {
    match explicit {
        Some(path) => load_config_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display())),
        None => Ok(load_config(project)),
    }
}
