//! Component categorisation.
//!
//! Strong base types (editor and asset types) decide first, then role
//! suffixes, then the `MonoBehaviour` base, then data/utility naming.

use crate::core::{ClassDefinition, ComponentCategory};
use crate::graph::{DependencyGraph, EdgeKind};
use std::collections::BTreeSet;

const EDITOR_BASES: &[&str] = &["Editor", "EditorWindow", "PropertyDrawer", "ScriptableWizard"];
const SCRIPTABLE_BASES: &[&str] = &["ScriptableObject"];
const BEHAVIOUR_BASES: &[&str] = &["MonoBehaviour", "NetworkBehaviour", "StateMachineBehaviour"];
const TEST_ATTRIBUTES: &[&str] = &["TestFixture", "Test", "UnityTest"];

pub fn categorize(class: &ClassDefinition, graph: &DependencyGraph) -> ComponentCategory {
    let roots = inherited_roots(class, graph);
    let inherits_any = |names: &[&str]| names.iter().any(|n| roots.contains(*n));
    let name = class.name.as_str();

    if inherits_any(EDITOR_BASES) {
        return ComponentCategory::Editor;
    }
    if inherits_any(SCRIPTABLE_BASES) {
        return ComponentCategory::ScriptableObject;
    }
    if is_test_class(class) {
        return ComponentCategory::Test;
    }
    if name.ends_with("Manager") || name.ends_with("System") {
        return ComponentCategory::Manager;
    }
    if name.ends_with("Controller") {
        return ComponentCategory::Controller;
    }
    if inherits_any(BEHAVIOUR_BASES) {
        return ComponentCategory::MonoBehaviour;
    }
    if ["Data", "Model", "Config", "Settings", "Info", "State"]
        .iter()
        .any(|suffix| name.ends_with(suffix))
    {
        return ComponentCategory::DataModel;
    }
    if class.is_static
        || ["Util", "Utils", "Utility", "Helper", "Helpers", "Extensions"]
            .iter()
            .any(|suffix| name.ends_with(suffix))
    {
        return ComponentCategory::Utility;
    }
    ComponentCategory::Other
}

pub fn is_test_class(class: &ClassDefinition) -> bool {
    class.name.ends_with("Test")
        || class.name.ends_with("Tests")
        || TEST_ATTRIBUTES.iter().any(|a| class.has_attribute(a))
        || class
            .methods
            .iter()
            .any(|m| TEST_ATTRIBUTES.iter().any(|a| m.has_attribute(a)))
}

/// Every inherited name reachable through internal classes, including the
/// external names where each chain leaves the project.
pub fn inherited_roots(class: &ClassDefinition, graph: &DependencyGraph) -> BTreeSet<String> {
    let mut seen = BTreeSet::new();
    let mut stack = vec![class.full_name()];
    let mut visited = BTreeSet::new();
    while let Some(id) = stack.pop() {
        if !visited.insert(id.clone()) {
            continue;
        }
        for edge in graph
            .dependencies_of(&id)
            .filter(|e| e.kind == EdgeKind::Inheritance)
        {
            match graph.node(&edge.to) {
                Some(node) => {
                    seen.insert(node.name.clone());
                    stack.push(node.id.clone());
                }
                None => {
                    seen.insert(simple(&edge.to).to_string());
                }
            }
        }
    }
    seen
}

fn simple(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}
