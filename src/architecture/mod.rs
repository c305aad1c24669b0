//! Architecture derivation from script facts: component roles, hub
//! classes, inheritance depth and an overall style.

mod category;

pub use category::{categorize, inherited_roots, is_test_class};

use crate::config::ThresholdsConfig;
use crate::core::{
    ArchitectureAnalysis, ArchitectureStyle, ComponentCategory, ComponentInfo, HubClass,
    PatternType, ScriptAnalysis,
};
use std::collections::BTreeMap;
use tracing::debug;

/// Fewer classes than this is reported as [`ArchitectureStyle::Minimal`].
pub const MINIMAL_CLASS_COUNT: usize = 5;

pub fn analyze(scripts: &ScriptAnalysis, thresholds: &ThresholdsConfig) -> ArchitectureAnalysis {
    let graph = &scripts.dependency_graph;
    let components: Vec<ComponentInfo> = scripts
        .classes
        .iter()
        .map(|class| ComponentInfo {
            class_id: class.full_name(),
            name: class.name.clone(),
            category: categorize(class, graph),
            file_path: class.file_path.clone(),
        })
        .collect();

    let mut category_counts = BTreeMap::new();
    for component in &components {
        *category_counts.entry(component.category).or_insert(0) += 1;
    }

    let style = classify_style(scripts, &category_counts);
    let hub_classes = hub_classes(scripts, thresholds.hub_class_limit);
    debug!(?style, hubs = hub_classes.len(), "architecture derived");

    ArchitectureAnalysis {
        components,
        category_counts,
        style,
        patterns: scripts.patterns.clone(),
        circular_dependencies: scripts.circular_dependencies.clone(),
        hub_classes,
        max_inheritance_depth: graph.max_inheritance_depth(),
        interface_count: scripts.interfaces.len(),
    }
}

/// Internal classes with the most dependents, at most `limit` of them.
pub fn hub_classes(scripts: &ScriptAnalysis, limit: usize) -> Vec<HubClass> {
    let graph = &scripts.dependency_graph;
    let mut hubs: Vec<HubClass> = graph
        .nodes()
        .map(|node| HubClass {
            id: node.id.clone(),
            dependents: graph.dependent_count(&node.id),
        })
        .filter(|hub| hub.dependents > 0)
        .collect();
    hubs.sort_by(|a, b| b.dependents.cmp(&a.dependents).then_with(|| a.id.cmp(&b.id)));
    hubs.truncate(limit);
    hubs
}

fn classify_style(
    scripts: &ScriptAnalysis,
    counts: &BTreeMap<ComponentCategory, usize>,
) -> ArchitectureStyle {
    let total = scripts.classes.len();
    if total < MINIMAL_CLASS_COUNT {
        return ArchitectureStyle::Minimal;
    }
    let share = |category: ComponentCategory| {
        counts.get(&category).copied().unwrap_or(0) as f64 / total as f64
    };
    let eventful_classes = scripts
        .classes
        .iter()
        .filter(|c| c.fields.iter().any(|f| f.is_event || f.is_delegate))
        .count();
    let observers = scripts
        .patterns
        .iter()
        .filter(|p| p.pattern_type == PatternType::Observer)
        .count();

    let event_driven = observers >= 2 || eventful_classes as f64 / total as f64 >= 0.25;
    let manager_driven = share(ComponentCategory::Manager) >= 0.2;
    let component_based = share(ComponentCategory::MonoBehaviour) >= 0.5;

    match (component_based, manager_driven, event_driven) {
        (true, false, false) => ArchitectureStyle::ComponentBased,
        (false, true, false) => ArchitectureStyle::ManagerDriven,
        (false, false, true) => ArchitectureStyle::EventDriven,
        _ => ArchitectureStyle::Mixed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{AccessModifier, ClassDefinition, FieldDefinition};
    use crate::graph::DependencyGraph;
    use pretty_assertions::assert_eq;

    fn class(name: &str, bases: &[&str]) -> ClassDefinition {
        let mut class = ClassDefinition::new(name, format!("Assets/Scripts/{name}.cs"));
        class.base_types = bases.iter().map(|b| b.to_string()).collect();
        class
    }

    fn scripts(classes: Vec<ClassDefinition>) -> ScriptAnalysis {
        ScriptAnalysis {
            dependency_graph: DependencyGraph::build(&classes),
            classes,
            ..Default::default()
        }
    }

    #[test]
    fn test_small_projects_are_minimal() {
        let analysis = analyze(
            &scripts(vec![class("Player", &["MonoBehaviour"])]),
            &ThresholdsConfig::default(),
        );
        assert_eq!(analysis.style, ArchitectureStyle::Minimal);
        assert_eq!(analysis.category_counts[&ComponentCategory::MonoBehaviour], 1);
    }

    #[test]
    fn test_component_based_style() {
        let classes = ["Player", "Enemy", "Bullet", "Door", "Pickup"]
            .iter()
            .map(|n| class(n, &["MonoBehaviour"]))
            .collect();
        let analysis = analyze(&scripts(classes), &ThresholdsConfig::default());
        assert_eq!(analysis.style, ArchitectureStyle::ComponentBased);
    }

    #[test]
    fn test_manager_driven_style() {
        let classes = vec![
            class("GameManager", &[]),
            class("AudioManager", &[]),
            class("Score", &[]),
            class("Timer", &[]),
            class("Level", &[]),
        ];
        let analysis = analyze(&scripts(classes), &ThresholdsConfig::default());
        assert_eq!(analysis.style, ArchitectureStyle::ManagerDriven);
    }

    #[test]
    fn test_event_driven_style() {
        let mut classes: Vec<ClassDefinition> =
            ["A", "B", "C", "D", "E"].iter().map(|n| class(n, &[])).collect();
        for class in classes.iter_mut().take(2) {
            class.fields.push(FieldDefinition {
                name: "Changed".into(),
                type_name: "Action".into(),
                access: AccessModifier::Public,
                is_static: false,
                is_readonly: false,
                is_const: false,
                is_event: true,
                is_delegate: true,
                has_literal_initializer: false,
                attributes: Vec::new(),
                line: 2,
            });
        }
        let analysis = analyze(&scripts(classes), &ThresholdsConfig::default());
        assert_eq!(analysis.style, ArchitectureStyle::EventDriven);
    }

    #[test]
    fn test_hub_classes_and_depth() {
        let classes = vec![
            class("Base", &[]),
            class("A", &["Base"]),
            class("B", &["Base"]),
            class("C", &["A"]),
        ];
        let analysis = analyze(&scripts(classes), &ThresholdsConfig::default());
        assert_eq!(
            analysis.hub_classes,
            vec![
                HubClass { id: "Base".into(), dependents: 2 },
                HubClass { id: "A".into(), dependents: 1 },
            ]
        );
        assert_eq!(analysis.max_inheritance_depth, 2);
    }
}
