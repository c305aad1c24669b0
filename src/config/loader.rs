use std::fs;
use std::path::{Path, PathBuf};

use super::AnalyzerConfig;
use crate::errors::AnalysisError;
use tracing::{debug, warn};

pub const CONFIG_FILE_NAME: &str = ".unitymap.toml";

const MAX_TRAVERSAL_DEPTH: usize = 10;

/// Parse and validate a configuration from TOML text.
pub fn parse_and_validate_config(contents: &str) -> Result<AnalyzerConfig, String> {
    let config = toml::from_str::<AnalyzerConfig>(contents)
        .map_err(|e| format!("Failed to parse {}: {}", CONFIG_FILE_NAME, e))?;

    config
        .validate()
        .map_err(|errors| format!("Invalid configuration: {}", errors.join("; ")))?;

    Ok(config)
}

/// Load an explicitly requested configuration file.
///
/// Unlike discovery, a missing or invalid explicit file is an error.
pub fn load_config_file(path: &Path) -> Result<AnalyzerConfig, AnalysisError> {
    let contents = fs::read_to_string(path)
        .map_err(|e| AnalysisError::config_with_path(e.to_string(), path))?;
    parse_and_validate_config(&contents).map_err(|e| AnalysisError::config_with_path(e, path))
}

fn try_load_config_from_path(config_path: &Path) -> Option<AnalyzerConfig> {
    let contents = match fs::read_to_string(config_path) {
        Ok(contents) => contents,
        Err(e) => {
            // Only log actual errors, not "file not found"
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(path = %config_path.display(), error = %e, "Failed to read config file");
            }
            return None;
        }
    };

    match parse_and_validate_config(&contents) {
        Ok(config) => {
            debug!(path = %config_path.display(), "Loaded config");
            Some(config)
        }
        Err(e) => {
            warn!(path = %config_path.display(), "{}. Using defaults.", e);
            None
        }
    }
}

/// The directory itself followed by its ancestors, up to `max_depth` entries.
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Discover `.unitymap.toml` starting at `start` and walking up.
///
/// Falls back to the defaults when nothing usable is found.
pub fn load_config(start: &Path) -> AnalyzerConfig {
    directory_ancestors(start.to_path_buf(), MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find_map(|path| try_load_config_from_path(&path))
        .unwrap_or_else(|| {
            debug!(
                "No config found after checking {} directories. Using default config.",
                MAX_TRAVERSAL_DEPTH
            );
            AnalyzerConfig::default()
        })
}
