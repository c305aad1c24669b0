use super::resolve_config;
use crate::io::output::{create_writer, OutputFormat};
use crate::pipeline::ProjectAnalyzer;
use crate::progress::{ProgressConfig, TerminalProgress};
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use tracing::debug;

pub struct AnalyzeConfig {
    pub path: PathBuf,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub timeout: Option<u64>,
    pub jobs: usize,
    pub parallel: bool,
    pub verbosity: u8,
    pub quiet: bool,
}

/// Run the analysis and write the report. Returns whether the analysis
/// succeeded.
pub fn handle_analyze(options: AnalyzeConfig) -> Result<bool> {
    let mut config = resolve_config(&options.path, options.config.as_deref())?;
    if options.timeout.is_some() {
        config.timeout_secs = options.timeout;
    }
    config.parallel = config.parallel && options.parallel;
    configure_thread_pool(options.jobs);

    let progress = TerminalProgress::new(ProgressConfig::from_env(
        options.quiet,
        options.verbosity,
    ));
    let analyzer = ProjectAnalyzer::new(config);
    let result = analyzer.analyze_project(&options.path, &progress);

    let out: Box<dyn Write> = match &options.output {
        Some(path) => Box::new(BufWriter::new(File::create(path).with_context(|| {
            format!("Failed to create output file {}", path.display())
        })?)),
        None => Box::new(std::io::stdout()),
    };
    create_writer(options.format, out).write_results(&result)?;
    Ok(result.success)
}

fn configure_thread_pool(jobs: usize) {
    if jobs == 0 {
        return;
    }
    if let Err(e) = rayon::ThreadPoolBuilder::new().num_threads(jobs).build_global() {
        debug!(error = %e, "global thread pool already configured");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_json_report_is_written_to_file() {
        let project = TempDir::new().unwrap();
        fs::create_dir_all(project.path().join("Assets/Scripts")).unwrap();
        fs::create_dir_all(project.path().join("ProjectSettings")).unwrap();
        fs::write(
            project.path().join("Assets/Scripts/Player.cs"),
            "public class Player : MonoBehaviour { }",
        )
        .unwrap();
        let report = project.path().join("report.json");

        let ok = handle_analyze(AnalyzeConfig {
            path: project.path().to_path_buf(),
            format: OutputFormat::Json,
            output: Some(report.clone()),
            config: None,
            timeout: None,
            jobs: 0,
            parallel: false,
            verbosity: 0,
            quiet: true,
        })
        .unwrap();

        assert!(ok);
        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(report).unwrap()).unwrap();
        assert_eq!(value["scripts"]["classes"][0]["name"], "Player");
    }

    #[test]
    fn test_missing_explicit_config_is_an_error() {
        let project = TempDir::new().unwrap();
        let result = handle_analyze(AnalyzeConfig {
            path: project.path().to_path_buf(),
            format: OutputFormat::Json,
            output: Some(project.path().join("out.json")),
            config: Some(project.path().join("missing.toml")),
            timeout: None,
            jobs: 0,
            parallel: true,
            verbosity: 0,
            quiet: true,
        });
        assert!(result.is_err());
    }
}
