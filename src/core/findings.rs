//! Patterns, code issues, insights and recommendations.

use super::structure::IssueSeverity;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternType {
    Singleton,
    Factory,
    Observer,
}

impl std::fmt::Display for PatternType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Singleton => write!(f, "Singleton"),
            Self::Factory => write!(f, "Factory"),
            Self::Observer => write!(f, "Observer"),
        }
    }
}

/// Evidence that a class (or group of classes) implements a known pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignPattern {
    pub pattern_type: PatternType,
    pub name: String,
    /// In [0, 1]; a fixed constant per rule
    pub confidence: f64,
    pub classes: Vec<String>,
    pub evidence: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CodeIssueKind {
    GodClass,
    LongMethod,
    HighComplexity,
    PublicFieldExposure,
    DeepInheritance,
    EmptyUnityCallback,
}

/// An anti-pattern found in the extracted class facts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeIssue {
    pub kind: CodeIssueKind,
    pub severity: IssueSeverity,
    pub class_name: String,
    pub method_name: Option<String>,
    pub file_path: PathBuf,
    pub line: usize,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightType {
    Structure,
    CodeQuality,
    Performance,
    Architecture,
    Dependencies,
    Maintainability,
    Testing,
}

impl InsightType {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Structure => "structure",
            Self::CodeQuality => "code quality",
            Self::Performance => "performance",
            Self::Architecture => "architecture",
            Self::Dependencies => "dependencies",
            Self::Maintainability => "maintainability",
            Self::Testing => "testing",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Info,
    Low,
    Medium,
    High,
    Critical,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::Info => "INFO",
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        };
        f.write_str(text)
    }
}

/// A ranked, evidence-backed observation about project quality.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    #[serde(rename = "type")]
    pub insight_type: InsightType,
    pub severity: Severity,
    pub title: String,
    pub description: String,
    pub confidence: f64,
    pub evidence: Vec<String>,
    pub context: BTreeMap<String, String>,
}

impl Insight {
    pub fn new(
        insight_type: InsightType,
        severity: Severity,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            insight_type,
            severity,
            title: title.into(),
            description: description.into(),
            confidence: 1.0,
            evidence: Vec::new(),
            context: BTreeMap::new(),
        }
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence.clamp(0.0, 1.0);
        self
    }

    pub fn with_evidence(mut self, evidence: impl IntoIterator<Item = String>) -> Self {
        self.evidence.extend(evidence);
        self
    }

    pub fn with_context(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.context.insert(key.into(), value.to_string());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationType {
    Structure,
    Performance,
    Architecture,
    CodeQuality,
    Dependencies,
    Security,
    Documentation,
    Testing,
}

impl RecommendationType {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Structure => "structure",
            Self::Performance => "performance",
            Self::Architecture => "architecture",
            Self::CodeQuality => "code quality",
            Self::Dependencies => "dependencies",
            Self::Security => "security",
            Self::Documentation => "documentation",
            Self::Testing => "testing",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionStep {
    pub description: String,
    pub estimated_hours: f64,
}

impl ActionStep {
    pub fn new(description: impl Into<String>, estimated_hours: f64) -> Self {
        Self {
            description: description.into(),
            estimated_hours,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffortComplexity {
    Trivial,
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffortEstimate {
    pub min_hours: f64,
    pub max_hours: f64,
    pub most_likely_hours: f64,
    pub complexity: EffortComplexity,
    pub required_skills: Vec<String>,
}

impl EffortEstimate {
    /// Derive an estimate from the action steps: the step total is the most
    /// likely figure, with a fixed spread either side.
    pub fn from_steps(steps: &[ActionStep], skills: &[&str]) -> Self {
        let total: f64 = steps.iter().map(|s| s.estimated_hours).sum();
        let complexity = match total {
            t if t <= 1.0 => EffortComplexity::Trivial,
            t if t <= 8.0 => EffortComplexity::Low,
            t if t <= 24.0 => EffortComplexity::Medium,
            _ => EffortComplexity::High,
        };
        Self {
            min_hours: round_hours(total * 0.7),
            max_hours: round_hours(total * 1.6),
            most_likely_hours: round_hours(total),
            complexity,
            required_skills: skills.iter().map(|s| s.to_string()).collect(),
        }
    }
}

fn round_hours(hours: f64) -> f64 {
    (hours * 10.0).round() / 10.0
}

/// A ranked, actionable remediation item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(rename = "type")]
    pub recommendation_type: RecommendationType,
    pub priority: Priority,
    pub title: String,
    pub description: String,
    pub rationale: String,
    pub action_steps: Vec<ActionStep>,
    pub benefits: Vec<String>,
    pub risks: Vec<String>,
    pub effort: EffortEstimate,
}
