//! Panic hook producing a crash report with the analysis context: stage,
//! file, type and file progress at the moment of the panic.

use super::context::{get_current_context, get_progress, AnalysisContext};
use std::panic::PanicHookInfo;
use tracing::Span;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const RULE: &str = "================================================================================";

/// Install the crash-report hook. Call once, early in `main`.
pub fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        eprintln!("{}", crash_report(info, &get_current_context(), get_progress()));
    }));
}

fn crash_report(
    info: &PanicHookInfo<'_>,
    context: &AnalysisContext,
    (processed, total): (usize, usize),
) -> String {
    let mut lines = vec![
        RULE.to_string(),
        format!(
            "UNITYMAP CRASH REPORT  v{}  {}  {}",
            VERSION,
            std::env::consts::OS,
            chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
        ),
        RULE.to_string(),
        format!("panic: {}", truncate(&panic_message(info), 70)),
    ];
    if let Some(location) = info.location() {
        lines.push(format!(
            "at:    {}:{}:{}",
            location.file(),
            location.line(),
            location.column()
        ));
    }
    lines.extend(context_lines(context, processed, total));
    if let Some(metadata) = Span::current().metadata() {
        lines.push(format!("span:  {}", metadata.name()));
    }
    lines.push(RULE.to_string());
    if std::env::var("RUST_BACKTRACE").is_ok() {
        lines.push(std::backtrace::Backtrace::capture().to_string());
    } else {
        lines.push("Run with RUST_BACKTRACE=1 for a stack trace".to_string());
    }
    lines.join("\n")
}

fn context_lines(context: &AnalysisContext, processed: usize, total: usize) -> Vec<String> {
    let mut lines = vec![match &context.phase {
        Some(phase) => format!("stage: {}", phase),
        None => "stage: (none, crashed before analysis started)".to_string(),
    }];
    if let Some(file) = &context.current_file {
        lines.push(format!("file:  {}", truncate(&file.display().to_string(), 70)));
    }
    if let Some(name) = &context.current_type {
        lines.push(format!("type:  {}", truncate(name, 70)));
    }
    if total > 0 {
        lines.push(format!(
            "files: {} / {} ({}%)",
            processed,
            total,
            processed * 100 / total
        ));
    }
    lines
}

fn panic_message(info: &PanicHookInfo<'_>) -> String {
    if let Some(s) = info.payload().downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = info.payload().downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
