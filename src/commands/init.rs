use crate::config::{AnalyzerConfig, CONFIG_FILE_NAME};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

const HEADER: &str = "# unitymap configuration\n\
# Every key is optional; removed keys fall back to the defaults below.\n\n";

/// The default configuration rendered as commented TOML.
pub fn default_config_toml() -> Result<String> {
    let body = toml::to_string_pretty(&AnalyzerConfig::default())
        .context("Failed to render default configuration")?;
    Ok(format!("{}{}", HEADER, body))
}

pub fn init_config(force: bool) -> Result<()> {
    let path = init_config_in(Path::new("."), force)?;
    println!("Created {} configuration file", path.display());
    Ok(())
}

/// Write the default configuration into `dir`.
pub fn init_config_in(dir: &Path, force: bool) -> Result<PathBuf> {
    let config_path = dir.join(CONFIG_FILE_NAME);
    if config_path.exists() && !force {
        anyhow::bail!("Configuration file already exists. Use --force to overwrite.");
    }
    std::fs::write(&config_path, default_config_toml()?)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    Ok(config_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_and_validate_config;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_default_file_parses_back_to_defaults() {
        let text = default_config_toml().unwrap();
        assert!(text.starts_with("# unitymap configuration"));
        assert_eq!(
            parse_and_validate_config(&text).unwrap(),
            AnalyzerConfig::default()
        );
    }

    #[test]
    fn test_existing_file_needs_force() {
        let dir = TempDir::new().unwrap();
        init_config_in(dir.path(), false).unwrap();
        assert!(init_config_in(dir.path(), false).is_err());
        assert!(init_config_in(dir.path(), true).is_ok());
    }
}
