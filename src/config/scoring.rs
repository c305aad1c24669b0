use serde::{Deserialize, Serialize};

/// Weights for the metrics calculator.
///
/// `cohesion_placeholder` is reported as the cohesion of every project; it
/// is not measured from intra-class references.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsConfig {
    #[serde(default = "default_cohesion_placeholder")]
    pub cohesion_placeholder: f64,

    #[serde(default = "default_critical_weight")]
    pub critical_weight: f64,

    #[serde(default = "default_warning_weight")]
    pub warning_weight: f64,

    #[serde(default = "default_info_weight")]
    pub info_weight: f64,

    /// Maintainability lost per weighted issue
    #[serde(default = "default_issue_penalty")]
    pub issue_penalty: f64,

    /// Maintainability lost per unit of (average complexity / threshold)
    #[serde(default = "default_complexity_penalty")]
    pub complexity_penalty: f64,

    /// Debt added per weighted issue
    #[serde(default = "default_debt_issue_factor")]
    pub debt_issue_factor: f64,

    /// Debt added per unit of (average complexity / threshold)
    #[serde(default = "default_debt_complexity_factor")]
    pub debt_complexity_factor: f64,

    /// Debt added per circular dependency
    #[serde(default = "default_debt_cycle_factor")]
    pub debt_cycle_factor: f64,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            cohesion_placeholder: default_cohesion_placeholder(),
            critical_weight: default_critical_weight(),
            warning_weight: default_warning_weight(),
            info_weight: default_info_weight(),
            issue_penalty: default_issue_penalty(),
            complexity_penalty: default_complexity_penalty(),
            debt_issue_factor: default_debt_issue_factor(),
            debt_complexity_factor: default_debt_complexity_factor(),
            debt_cycle_factor: default_debt_cycle_factor(),
        }
    }
}

impl MetricsConfig {
    pub(crate) fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if !(0.0..=1.0).contains(&self.cohesion_placeholder) {
            errors.push(format!(
                "metrics.cohesion_placeholder out of range (expected: 0.0-1.0, got: {})",
                self.cohesion_placeholder
            ));
        }
        let weights = [
            ("critical_weight", self.critical_weight),
            ("warning_weight", self.warning_weight),
            ("info_weight", self.info_weight),
            ("issue_penalty", self.issue_penalty),
            ("complexity_penalty", self.complexity_penalty),
            ("debt_issue_factor", self.debt_issue_factor),
            ("debt_complexity_factor", self.debt_complexity_factor),
            ("debt_cycle_factor", self.debt_cycle_factor),
        ];
        errors.extend(
            weights
                .iter()
                .filter(|(_, value)| *value < 0.0)
                .map(|(name, value)| format!("metrics.{name} must not be negative (got: {value})")),
        );
        errors
    }
}

fn default_cohesion_placeholder() -> f64 {
    0.8
}
fn default_critical_weight() -> f64 {
    3.0
}
fn default_warning_weight() -> f64 {
    2.0
}
fn default_info_weight() -> f64 {
    1.0
}
fn default_issue_penalty() -> f64 {
    0.01
}
fn default_complexity_penalty() -> f64 {
    0.3
}
fn default_debt_issue_factor() -> f64 {
    0.01
}
fn default_debt_complexity_factor() -> f64 {
    0.2
}
fn default_debt_cycle_factor() -> f64 {
    0.05
}
