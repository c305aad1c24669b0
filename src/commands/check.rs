use super::resolve_config;
use crate::pipeline::ProjectAnalyzer;
use anyhow::Result;
use colored::*;
use std::path::Path;

/// Print whether `path` passes the project precondition. Returns the
/// outcome; only configuration problems are errors.
pub fn check_project(path: &Path, config: Option<&Path>) -> Result<bool> {
    let analyzer = ProjectAnalyzer::new(resolve_config(path, config)?);
    match analyzer.can_analyze(path) {
        Ok(()) => {
            println!("{} {} can be analyzed", "✓".green(), path.display());
            Ok(true)
        }
        Err(e) => {
            println!("{} {}", "✗".red(), e);
            Ok(false)
        }
    }
}
