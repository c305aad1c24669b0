use serde::{Deserialize, Serialize};

const MIB: u64 = 1024 * 1024;

/// Numeric thresholds used by the structure, code and performance rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdsConfig {
    /// Paths nested deeper than this (components below the project root) are flagged
    #[serde(default = "default_max_path_depth")]
    pub max_path_depth: usize,

    #[serde(default = "default_max_file_size_bytes")]
    pub max_file_size_bytes: u64,

    /// Method complexity above this counts as high
    #[serde(default = "default_complexity_threshold")]
    pub complexity_threshold: u32,

    #[serde(default = "default_long_method_lines")]
    pub long_method_lines: usize,

    #[serde(default = "default_god_class_methods")]
    pub god_class_methods: usize,

    #[serde(default = "default_god_class_lines")]
    pub god_class_lines: usize,

    /// Public non-static fields per class before exposure is flagged
    #[serde(default = "default_max_public_fields")]
    pub max_public_fields: usize,

    /// Internal inheritance chain length before it is flagged
    #[serde(default = "default_max_inheritance_depth")]
    pub max_inheritance_depth: usize,

    #[serde(default = "default_large_texture_bytes")]
    pub large_texture_bytes: u64,

    #[serde(default = "default_large_audio_bytes")]
    pub large_audio_bytes: u64,

    /// Fraction of the standard folder catalog required to follow the standard structure
    #[serde(default = "default_standard_structure_ratio")]
    pub standard_structure_ratio: f64,

    /// Brace nesting bound for body extraction
    #[serde(default = "default_max_brace_depth")]
    pub max_brace_depth: usize,

    /// Documented share of public classes below which documentation is recommended
    #[serde(default = "default_min_documentation_ratio")]
    pub min_documentation_ratio: f64,

    /// Script count above which a project without module manifests is flagged
    #[serde(default = "default_assembly_definition_script_count")]
    pub assembly_definition_script_count: usize,

    /// Number of hub classes reported by the architecture stage
    #[serde(default = "default_hub_class_limit")]
    pub hub_class_limit: usize,
}

impl Default for ThresholdsConfig {
    fn default() -> Self {
        Self {
            max_path_depth: default_max_path_depth(),
            max_file_size_bytes: default_max_file_size_bytes(),
            complexity_threshold: default_complexity_threshold(),
            long_method_lines: default_long_method_lines(),
            god_class_methods: default_god_class_methods(),
            god_class_lines: default_god_class_lines(),
            max_public_fields: default_max_public_fields(),
            max_inheritance_depth: default_max_inheritance_depth(),
            large_texture_bytes: default_large_texture_bytes(),
            large_audio_bytes: default_large_audio_bytes(),
            standard_structure_ratio: default_standard_structure_ratio(),
            max_brace_depth: default_max_brace_depth(),
            min_documentation_ratio: default_min_documentation_ratio(),
            assembly_definition_script_count: default_assembly_definition_script_count(),
            hub_class_limit: default_hub_class_limit(),
        }
    }
}

impl ThresholdsConfig {
    pub(crate) fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.max_path_depth == 0 {
            errors.push("thresholds.max_path_depth must be positive".to_string());
        }
        if self.complexity_threshold == 0 {
            errors.push("thresholds.complexity_threshold must be positive".to_string());
        }
        if self.max_brace_depth == 0 {
            errors.push("thresholds.max_brace_depth must be positive".to_string());
        }
        if !(0.0..=1.0).contains(&self.standard_structure_ratio) {
            errors.push(format!(
                "thresholds.standard_structure_ratio out of range (expected: 0.0-1.0, got: {})",
                self.standard_structure_ratio
            ));
        }
        if !(0.0..=1.0).contains(&self.min_documentation_ratio) {
            errors.push(format!(
                "thresholds.min_documentation_ratio out of range (expected: 0.0-1.0, got: {})",
                self.min_documentation_ratio
            ));
        }
        errors
    }
}

fn default_max_path_depth() -> usize {
    6
}
fn default_max_file_size_bytes() -> u64 {
    50 * MIB
}
fn default_complexity_threshold() -> u32 {
    10
}
fn default_long_method_lines() -> usize {
    50
}
fn default_god_class_methods() -> usize {
    20
}
fn default_god_class_lines() -> usize {
    500
}
fn default_max_public_fields() -> usize {
    5
}
fn default_max_inheritance_depth() -> usize {
    4
}
fn default_large_texture_bytes() -> u64 {
    8 * MIB
}
fn default_large_audio_bytes() -> u64 {
    10 * MIB
}
fn default_standard_structure_ratio() -> f64 {
    0.6
}
fn default_max_brace_depth() -> usize {
    64
}
fn default_min_documentation_ratio() -> f64 {
    0.3
}
fn default_assembly_definition_script_count() -> usize {
    50
}
fn default_hub_class_limit() -> usize {
    5
}
