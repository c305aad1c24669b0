//! Anti-pattern detection over extracted class facts.

use super::callbacks::is_unity_callback;
use crate::config::ThresholdsConfig;
use crate::core::{ClassDefinition, CodeIssue, CodeIssueKind, IssueSeverity, MethodDefinition};
use crate::graph::DependencyGraph;

pub struct CodeIssueDetector<'a> {
    thresholds: &'a ThresholdsConfig,
    graph: &'a DependencyGraph,
}

impl<'a> CodeIssueDetector<'a> {
    pub fn new(thresholds: &'a ThresholdsConfig, graph: &'a DependencyGraph) -> Self {
        Self { thresholds, graph }
    }

    /// Issues for every class, sorted by file, line, then kind.
    pub fn detect(&self, classes: &[ClassDefinition]) -> Vec<CodeIssue> {
        let mut issues: Vec<CodeIssue> = classes
            .iter()
            .flat_map(|class| self.class_issues(class))
            .collect();
        issues.sort_by(|a, b| {
            (&a.file_path, a.line, a.kind, &a.method_name)
                .cmp(&(&b.file_path, b.line, b.kind, &b.method_name))
        });
        issues
    }

    fn class_issues(&self, class: &ClassDefinition) -> Vec<CodeIssue> {
        let mut issues = Vec::new();
        issues.extend(self.god_class(class));
        issues.extend(self.public_fields(class));
        issues.extend(self.deep_inheritance(class));
        for method in &class.methods {
            issues.extend(self.long_method(class, method));
            issues.extend(self.high_complexity(class, method));
            issues.extend(empty_callback(class, method));
        }
        issues
    }

    fn god_class(&self, class: &ClassDefinition) -> Option<CodeIssue> {
        let many_methods = class.methods.len() > self.thresholds.god_class_methods;
        let many_lines = class.lines_of_code > self.thresholds.god_class_lines;
        let severity = match (many_methods, many_lines) {
            (true, true) => IssueSeverity::Critical,
            (true, false) | (false, true) => IssueSeverity::Warning,
            (false, false) => return None,
        };
        Some(class_issue(
            CodeIssueKind::GodClass,
            severity,
            class,
            format!(
                "{} has {} methods and {} lines",
                class.name,
                class.methods.len(),
                class.lines_of_code
            ),
        ))
    }

    fn public_fields(&self, class: &ClassDefinition) -> Option<CodeIssue> {
        let exposed = class
            .fields
            .iter()
            .filter(|f| f.access.is_public() && !f.is_const && !f.is_event && !f.is_readonly)
            .count();
        (exposed > self.thresholds.max_public_fields).then(|| {
            class_issue(
                CodeIssueKind::PublicFieldExposure,
                IssueSeverity::Info,
                class,
                format!(
                    "{} exposes {} mutable public fields; prefer [SerializeField] private fields",
                    class.name, exposed
                ),
            )
        })
    }

    fn deep_inheritance(&self, class: &ClassDefinition) -> Option<CodeIssue> {
        let depth = self.graph.inheritance_depth(&class.full_name());
        (depth > self.thresholds.max_inheritance_depth).then(|| {
            class_issue(
                CodeIssueKind::DeepInheritance,
                IssueSeverity::Warning,
                class,
                format!(
                    "{} sits {} levels deep in the project's inheritance chain",
                    class.name, depth
                ),
            )
        })
    }

    fn long_method(&self, class: &ClassDefinition, method: &MethodDefinition) -> Option<CodeIssue> {
        let limit = self.thresholds.long_method_lines;
        (method.lines_of_code > limit).then(|| {
            method_issue(
                CodeIssueKind::LongMethod,
                escalate(method.lines_of_code, limit),
                class,
                method,
                format!(
                    "{}.{} is {} lines long (limit {})",
                    class.name, method.name, method.lines_of_code, limit
                ),
            )
        })
    }

    fn high_complexity(
        &self,
        class: &ClassDefinition,
        method: &MethodDefinition,
    ) -> Option<CodeIssue> {
        let limit = self.thresholds.complexity_threshold;
        (method.cyclomatic_complexity > limit).then(|| {
            method_issue(
                CodeIssueKind::HighComplexity,
                escalate(method.cyclomatic_complexity as usize, limit as usize),
                class,
                method,
                format!(
                    "{}.{} has complexity {} (threshold {})",
                    class.name, method.name, method.cyclomatic_complexity, limit
                ),
            )
        })
    }
}

fn empty_callback(class: &ClassDefinition, method: &MethodDefinition) -> Option<CodeIssue> {
    (method.is_empty && !method.is_constructor && is_unity_callback(&method.name)).then(|| {
        method_issue(
            CodeIssueKind::EmptyUnityCallback,
            IssueSeverity::Info,
            class,
            method,
            format!(
                "{}.{} is empty but Unity still dispatches it",
                class.name, method.name
            ),
        )
    })
}

/// Warning past the limit, Critical past twice the limit.
fn escalate(value: usize, limit: usize) -> IssueSeverity {
    if value > limit.saturating_mul(2) {
        IssueSeverity::Critical
    } else {
        IssueSeverity::Warning
    }
}

fn class_issue(
    kind: CodeIssueKind,
    severity: IssueSeverity,
    class: &ClassDefinition,
    message: String,
) -> CodeIssue {
    CodeIssue {
        kind,
        severity,
        class_name: class.full_name(),
        method_name: None,
        file_path: class.file_path.clone(),
        line: class.line,
        message,
    }
}

fn method_issue(
    kind: CodeIssueKind,
    severity: IssueSeverity,
    class: &ClassDefinition,
    method: &MethodDefinition,
    message: String,
) -> CodeIssue {
    CodeIssue {
        kind,
        severity,
        class_name: class.full_name(),
        method_name: Some(method.name.clone()),
        file_path: class.file_path.clone(),
        line: method.line,
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{AccessModifier, FieldDefinition};
    use pretty_assertions::assert_eq;

    fn method(name: &str, lines: usize, complexity: u32) -> MethodDefinition {
        let mut m = MethodDefinition::new(name, 3);
        m.lines_of_code = lines;
        m.cyclomatic_complexity = complexity;
        m
    }

    fn detect(classes: &[ClassDefinition]) -> Vec<CodeIssue> {
        let thresholds = ThresholdsConfig::default();
        let graph = DependencyGraph::build(classes);
        CodeIssueDetector::new(&thresholds, &graph).detect(classes)
    }

    fn kinds(issues: &[CodeIssue]) -> Vec<(CodeIssueKind, IssueSeverity)> {
        issues.iter().map(|i| (i.kind, i.severity)).collect()
    }

    #[test]
    fn test_clean_class_has_no_issues() {
        let mut class = ClassDefinition::new("Player", "Player.cs");
        class.methods.push(method("Move", 10, 3));
        assert!(detect(&[class]).is_empty());
    }

    #[test]
    fn test_long_and_complex_methods() {
        let mut class = ClassDefinition::new("Enemy", "Enemy.cs");
        class.methods.push(method("Think", 60, 11));
        class.methods.push(method("Plan", 200, 30));
        let issues = detect(&[class]);
        assert_eq!(
            kinds(&issues),
            vec![
                (CodeIssueKind::LongMethod, IssueSeverity::Critical),
                (CodeIssueKind::LongMethod, IssueSeverity::Warning),
                (CodeIssueKind::HighComplexity, IssueSeverity::Critical),
                (CodeIssueKind::HighComplexity, IssueSeverity::Warning),
            ]
        );
    }

    #[test]
    fn test_god_class_severity() {
        let mut class = ClassDefinition::new("GameManager", "GameManager.cs");
        class.lines_of_code = 900;
        class.methods = (0..25).map(|i| method(&format!("M{i}"), 5, 1)).collect();
        let issues = detect(&[class]);
        assert_eq!(kinds(&issues), vec![(CodeIssueKind::GodClass, IssueSeverity::Critical)]);
    }

    #[test]
    fn test_empty_unity_callback() {
        let mut class = ClassDefinition::new("Idle", "Idle.cs");
        let mut update = method("Update", 1, 1);
        update.is_empty = true;
        let mut helper = method("Helper", 1, 1);
        helper.is_empty = true;
        class.methods = vec![update, helper];
        let issues = detect(&[class]);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, CodeIssueKind::EmptyUnityCallback);
        assert_eq!(issues[0].method_name.as_deref(), Some("Update"));
    }

    #[test]
    fn test_public_field_exposure() {
        let mut class = ClassDefinition::new("Settings", "Settings.cs");
        class.fields = (0..6)
            .map(|i| FieldDefinition {
                name: format!("value{i}"),
                type_name: "int".into(),
                access: AccessModifier::Public,
                is_static: false,
                is_readonly: false,
                is_const: i == 0,
                is_event: false,
                is_delegate: false,
                has_literal_initializer: false,
                attributes: Vec::new(),
                line: i + 2,
            })
            .collect();
        let thresholds = ThresholdsConfig {
            max_public_fields: 4,
            ..ThresholdsConfig::default()
        };
        let graph = DependencyGraph::build(std::slice::from_ref(&class));
        let issues = CodeIssueDetector::new(&thresholds, &graph).detect(&[class]);
        assert_eq!(
            kinds(&issues),
            vec![(CodeIssueKind::PublicFieldExposure, IssueSeverity::Info)]
        );
        assert!(issues[0].message.contains("5 mutable"));
    }

    #[test]
    fn test_deep_inheritance() {
        let names = ["A", "B", "C", "D", "E", "F", "G"];
        let classes: Vec<ClassDefinition> = names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let mut class = ClassDefinition::new(*name, format!("{name}.cs"));
                if let Some(base) = names.get(i + 1) {
                    class.base_types.insert(base.to_string());
                }
                class
            })
            .collect();
        let thresholds = ThresholdsConfig {
            max_inheritance_depth: 4,
            ..ThresholdsConfig::default()
        };
        let graph = DependencyGraph::build(&classes);
        let issues = CodeIssueDetector::new(&thresholds, &graph).detect(&classes);
        let flagged: Vec<_> = issues.iter().map(|i| i.class_name.as_str()).collect();
        assert_eq!(flagged, vec!["A", "B"]);
    }
}
