use crate::core::{AnalysisResult, Priority, Severity};
use crate::insights::percent;
use colored::*;
use std::io::Write;

/// Insights and recommendations listed in the terminal summary.
const TERMINAL_ITEMS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    Json,
    #[default]
    Terminal,
}

pub trait OutputWriter {
    fn write_results(&mut self, results: &AnalysisResult) -> anyhow::Result<()>;
}

/// The whole result object as pretty-printed JSON.
pub struct JsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for JsonWriter<W> {
    fn write_results(&mut self, results: &AnalysisResult) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(results)?;
        self.writer.write_all(json.as_bytes())?;
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}

/// A colored human summary.
pub struct TerminalWriter<W: Write> {
    writer: W,
}

impl<W: Write> TerminalWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for TerminalWriter<W> {
    fn write_results(&mut self, results: &AnalysisResult) -> anyhow::Result<()> {
        self.write_header(results)?;
        if !results.success {
            let message = results.error_message.as_deref().unwrap_or("unknown error");
            writeln!(self.writer, "{} {}", "✗ Analysis failed:".red().bold(), message)?;
        } else {
            self.write_summary(results)?;
            self.write_insights(results)?;
            self.write_recommendations(results)?;
        }
        self.writer.flush()?;
        Ok(())
    }
}

impl<W: Write> TerminalWriter<W> {
    fn write_header(&mut self, results: &AnalysisResult) -> anyhow::Result<()> {
        writeln!(self.writer, "{}", "Unity Project Analysis".bold().blue())?;
        writeln!(self.writer, "{}", "======================".blue())?;
        writeln!(self.writer, "  Project: {}", results.project_path.display())?;
        writeln!(
            self.writer,
            "  Generated: {}",
            results.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
        )?;
        writeln!(
            self.writer,
            "  Elapsed: {:.2}s",
            results.elapsed_time.as_secs_f64()
        )?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_summary(&mut self, results: &AnalysisResult) -> anyhow::Result<()> {
        let Some(metrics) = &results.metrics else {
            return Ok(());
        };
        writeln!(self.writer, "{}", "Summary:".bold())?;
        writeln!(
            self.writer,
            "  Files: {} in {} folders ({} scripts, {} assets)",
            metrics.total_files, metrics.total_folders, metrics.total_scripts, metrics.total_assets
        )?;
        writeln!(
            self.writer,
            "  Code: {} classes, {} interfaces, {} methods, {} lines",
            metrics.total_classes,
            metrics.total_interfaces,
            metrics.total_methods,
            metrics.total_lines_of_code
        )?;
        writeln!(
            self.writer,
            "  Issues: {} critical, {} warnings, {} info",
            metrics.issue_counts.critical, metrics.issue_counts.warning, metrics.issue_counts.info
        )?;
        writeln!(
            self.writer,
            "  Maintainability: {}  Technical debt: {}  Structure: {}",
            percent(metrics.maintainability_index),
            percent(metrics.technical_debt_ratio),
            percent(metrics.structure_score)
        )?;
        writeln!(self.writer, "  Health score: {}", score_display(metrics.health_score))?;
        if let Some(scripts) = &results.scripts {
            if !scripts.warnings.is_empty() {
                writeln!(
                    self.writer,
                    "  {} {} files could not be analyzed",
                    "!".yellow(),
                    scripts.warnings.len()
                )?;
            }
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_insights(&mut self, results: &AnalysisResult) -> anyhow::Result<()> {
        if results.insights.is_empty() {
            return Ok(());
        }
        writeln!(
            self.writer,
            "{} ({}):",
            "Insights".bold(),
            results.insights.len()
        )?;
        for insight in results.insights.iter().take(TERMINAL_ITEMS) {
            writeln!(
                self.writer,
                "  [{}] {}: {}",
                severity_label(insight.severity),
                insight.title.bold(),
                insight.description
            )?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_recommendations(&mut self, results: &AnalysisResult) -> anyhow::Result<()> {
        if results.recommendations.is_empty() {
            return Ok(());
        }
        writeln!(
            self.writer,
            "{} ({}):",
            "Recommendations".bold(),
            results.recommendations.len()
        )?;
        for (i, recommendation) in results
            .recommendations
            .iter()
            .take(TERMINAL_ITEMS)
            .enumerate()
        {
            writeln!(
                self.writer,
                "  {}. [{}] {} (~{:.1}h)",
                i + 1,
                priority_label(recommendation.priority),
                recommendation.title.bold(),
                recommendation.effort.most_likely_hours
            )?;
            if let Some(step) = recommendation.action_steps.first() {
                writeln!(self.writer, "     → {}", step.description)?;
            }
        }
        Ok(())
    }
}

fn score_display(score: f64) -> ColoredString {
    let text = percent(score);
    match score {
        s if s >= 0.75 => text.green(),
        s if s >= 0.5 => text.yellow(),
        _ => text.red(),
    }
}

fn severity_label(severity: Severity) -> ColoredString {
    let text = severity.to_string();
    match severity {
        Severity::Critical | Severity::High => text.red(),
        Severity::Medium => text.yellow(),
        Severity::Low | Severity::Info => text.normal(),
    }
}

fn priority_label(priority: Priority) -> ColoredString {
    let text = priority.to_string();
    match priority {
        Priority::Critical | Priority::High => text.red(),
        Priority::Medium => text.yellow(),
        Priority::Low => text.normal(),
    }
}

pub fn create_writer(format: OutputFormat, out: Box<dyn Write>) -> Box<dyn OutputWriter> {
    match format {
        OutputFormat::Json => Box::new(JsonWriter::new(out)),
        OutputFormat::Terminal => Box::new(TerminalWriter::new(out)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Insight, InsightType, ProjectMetrics};
    use std::time::Duration;

    fn sample() -> AnalysisResult {
        let mut result = AnalysisResult::empty("/projects/demo");
        result.metrics = Some(ProjectMetrics {
            total_files: 3,
            health_score: 0.8,
            ..ProjectMetrics::default()
        });
        result.insights.push(Insight::new(
            InsightType::Structure,
            Severity::Info,
            "Project layout",
            "Standard folders present.",
        ));
        result
    }

    #[test]
    fn test_json_output_is_valid() {
        let mut buffer = Vec::new();
        JsonWriter::new(&mut buffer).write_results(&sample()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(value["success"], serde_json::Value::Bool(true));
        assert_eq!(value["metrics"]["total_files"], 3);
        assert_eq!(value["insights"][0]["title"], "Project layout");
    }

    #[test]
    fn test_terminal_summary_lists_insights() {
        let mut buffer = Vec::new();
        TerminalWriter::new(&mut buffer).write_results(&sample()).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.contains("Unity Project Analysis"));
        assert!(text.contains("Files: 3 in 0 folders"));
        assert!(text.contains("Project layout"));
        assert!(text.contains("80%"));
    }

    #[test]
    fn test_terminal_reports_failure() {
        let failed = AnalysisResult::failed("/nowhere", "missing Assets", Duration::ZERO);
        let mut buffer = Vec::new();
        TerminalWriter::new(&mut buffer).write_results(&failed).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.contains("missing Assets"));
        assert!(!text.contains("Summary:"));
    }
}
