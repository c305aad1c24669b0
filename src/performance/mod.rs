//! Performance derivation: per-frame Unity callbacks and heavy assets.

use crate::config::ThresholdsConfig;
use crate::core::{
    ClassDefinition, FileInfo, FileKind, IssueSeverity, MethodDefinition, PerformanceAnalysis,
    PerformanceIssue, PerformanceIssueKind, ScriptAnalysis, StructureAnalysis,
};
use crate::metrics::clamp_unit;
use crate::scripts::callbacks::{is_hot_path, is_unity_callback};
use crate::structure::rules::megabytes;
use tracing::debug;

/// Scene-wide searches; far too slow to run every frame.
const SEARCH_CALLS: &[&str] = &[
    "Find",
    "FindWithTag",
    "FindGameObjectWithTag",
    "FindGameObjectsWithTag",
    "FindObjectOfType",
    "FindObjectsOfType",
    "FindFirstObjectByType",
    "FindAnyObjectByType",
    "FindObjectsByType",
];

/// Lookups and reflection-based messaging worth caching.
const LOOKUP_CALLS: &[&str] = &[
    "GetComponent",
    "GetComponents",
    "GetComponentInChildren",
    "GetComponentsInChildren",
    "GetComponentInParent",
    "GetComponentsInParent",
    "SendMessage",
    "SendMessageUpwards",
    "BroadcastMessage",
    "Instantiate",
];

pub fn analyze(
    scripts: Option<&ScriptAnalysis>,
    structure: Option<&StructureAnalysis>,
    thresholds: &ThresholdsConfig,
) -> PerformanceAnalysis {
    let classes = scripts.map(|s| s.classes.as_slice()).unwrap_or_default();
    let mut issues: Vec<PerformanceIssue> = classes
        .iter()
        .flat_map(|class| class_issues(class, thresholds))
        .collect();
    let files = structure.map(|s| s.files.as_slice()).unwrap_or_default();
    issues.extend(files.iter().filter_map(|file| asset_issue(file, thresholds)));

    let hot_path_methods = classes
        .iter()
        .flat_map(|c| c.methods.iter())
        .filter(|m| !m.is_constructor && is_hot_path(&m.name))
        .count();
    let performance_score = score(&issues);
    debug!(
        issues = issues.len(),
        hot_path_methods, performance_score, "performance derived"
    );

    PerformanceAnalysis {
        issues,
        hot_path_methods,
        performance_score,
    }
}

/// `1 - Σ penalty` with 0.15 per Critical, 0.05 per Warning, 0.01 per Info.
pub fn score(issues: &[PerformanceIssue]) -> f64 {
    let penalty: f64 = issues
        .iter()
        .map(|i| match i.severity {
            IssueSeverity::Critical => 0.15,
            IssueSeverity::Warning => 0.05,
            IssueSeverity::Info => 0.01,
        })
        .sum();
    clamp_unit(1.0 - penalty)
}

fn class_issues(class: &ClassDefinition, thresholds: &ThresholdsConfig) -> Vec<PerformanceIssue> {
    let mut issues = Vec::new();
    for method in class.methods.iter().filter(|m| !m.is_constructor) {
        if method.is_empty && is_unity_callback(&method.name) {
            issues.push(code_issue(
                PerformanceIssueKind::EmptyUnityCallback,
                IssueSeverity::Info,
                class,
                method,
                "Empty Unity callback still costs a native-to-managed call".to_string(),
            ));
            continue;
        }
        if !is_hot_path(&method.name) {
            continue;
        }
        for call in &method.invocations {
            let severity = if SEARCH_CALLS.contains(&call.as_str()) {
                IssueSeverity::Critical
            } else if LOOKUP_CALLS.contains(&call.as_str()) {
                IssueSeverity::Warning
            } else {
                continue;
            };
            issues.push(code_issue(
                PerformanceIssueKind::ExpensiveCallInHotPath,
                severity,
                class,
                method,
                format!("{} is called every frame; cache the result in Awake or Start", call),
            ));
        }
        if method.heap_allocations > 0 {
            issues.push(code_issue(
                PerformanceIssueKind::AllocationInHotPath,
                IssueSeverity::Warning,
                class,
                method,
                format!(
                    "{} heap allocation(s) per frame create garbage collector pressure",
                    method.heap_allocations
                ),
            ));
        }
        if method.cyclomatic_complexity > thresholds.complexity_threshold {
            issues.push(code_issue(
                PerformanceIssueKind::ComplexHotPath,
                IssueSeverity::Warning,
                class,
                method,
                format!(
                    "Per-frame method has complexity {} (threshold {})",
                    method.cyclomatic_complexity, thresholds.complexity_threshold
                ),
            ));
        }
    }
    issues
}

fn asset_issue(file: &FileInfo, thresholds: &ThresholdsConfig) -> Option<PerformanceIssue> {
    let (kind, limit, advice) = match file.kind {
        FileKind::Texture => (
            PerformanceIssueKind::LargeTexture,
            thresholds.large_texture_bytes,
            "lower the max size or enable compression in the import settings",
        ),
        FileKind::Audio => (
            PerformanceIssueKind::LargeAudio,
            thresholds.large_audio_bytes,
            "stream it or use a compressed load type",
        ),
        _ => return None,
    };
    (file.size_bytes > limit).then(|| PerformanceIssue {
        kind,
        severity: IssueSeverity::Warning,
        location: file.path.display().to_string(),
        file_path: file.path.clone(),
        description: format!(
            "{} is {:.1} MB; {}",
            file.name,
            megabytes(file.size_bytes),
            advice
        ),
    })
}

fn code_issue(
    kind: PerformanceIssueKind,
    severity: IssueSeverity,
    class: &ClassDefinition,
    method: &MethodDefinition,
    description: String,
) -> PerformanceIssue {
    PerformanceIssue {
        kind,
        severity,
        location: format!("{}.{}", class.name, method.name),
        file_path: class.file_path.clone(),
        description,
    }
}
