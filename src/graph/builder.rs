use super::{DependencyEdge, DependencyGraph, DependencyNode, EdgeKind};
use crate::core::ClassDefinition;
use std::collections::{BTreeMap, BTreeSet};

/// Built-in and framework names that never become edges.
const PRIMITIVES: &[&str] = &[
    "void", "bool", "byte", "sbyte", "short", "ushort", "int", "uint", "long", "ulong", "char",
    "float", "double", "decimal", "string", "object", "dynamic", "var", "nint", "nuint",
    "String", "Object", "Boolean", "Int32", "Int64", "Single", "Double",
];

/// Non-primitive type names mentioned in a type expression.
///
/// `Dictionary<string, List<Enemy>>` yields `Dictionary`, `List` and
/// `Enemy`; qualified names keep their last segment. Single-letter names are
/// taken to be generic parameters and skipped.
pub fn referenced_type_names(type_expr: &str) -> Vec<String> {
    type_expr
        .split(|c: char| !(c.is_alphanumeric() || c == '_' || c == '.'))
        .filter_map(|token| token.rsplit('.').next())
        .filter(|name| {
            name.len() > 1
                && name.starts_with(|c: char| c.is_alphabetic() || c == '_')
                && !PRIMITIVES.contains(name)
        })
        .map(str::to_string)
        .collect()
}

/// Builds a [`DependencyGraph`] from class facts.
///
/// Partial declarations sharing a full name become one node whose
/// dependencies are the union of every part's.
pub struct GraphBuilder<'a> {
    classes: Vec<&'a ClassDefinition>,
    /// simple name → node ids declaring it
    by_name: BTreeMap<&'a str, BTreeSet<String>>,
}

impl<'a> GraphBuilder<'a> {
    pub fn new(classes: &'a [ClassDefinition]) -> Self {
        let mut sorted: Vec<&ClassDefinition> = classes.iter().collect();
        sorted.sort_by(|a, b| {
            (a.full_name(), &a.file_path, a.line).cmp(&(b.full_name(), &b.file_path, b.line))
        });
        let mut by_name: BTreeMap<&str, BTreeSet<String>> = BTreeMap::new();
        for &class in &sorted {
            by_name
                .entry(class.name.as_str())
                .or_default()
                .insert(class.full_name());
        }
        Self {
            classes: sorted,
            by_name,
        }
    }

    pub fn build(self) -> DependencyGraph {
        let mut nodes = BTreeMap::new();
        let mut edges = Vec::new();

        for class in &self.classes {
            let id = class.full_name();
            nodes.entry(id.clone()).or_insert_with(|| DependencyNode {
                id: id.clone(),
                name: class.name.clone(),
                kind: class.kind,
                file_path: class.file_path.clone(),
            });

            for name in direct_dependencies(class) {
                let target = self.resolve(&name, class.namespace.as_deref());
                if target == id {
                    continue;
                }
                let kind = if class.inherits(&name) {
                    EdgeKind::Inheritance
                } else {
                    EdgeKind::Usage
                };
                edges.push(DependencyEdge {
                    from: id.clone(),
                    to: target,
                    kind,
                });
            }
        }

        DependencyGraph::from_parts(nodes, edges)
    }

    /// Map a simple name to a node id: a declaration in the same namespace
    /// wins, then the smallest id. Unknown names stay as they are.
    fn resolve(&self, name: &str, namespace: Option<&str>) -> String {
        let Some(candidates) = self.by_name.get(name) else {
            return name.to_string();
        };
        let same_namespace = namespace.map(|ns| format!("{}.{}", ns, name));
        same_namespace
            .filter(|id| candidates.contains(id))
            .or_else(|| candidates.iter().next().cloned())
            .unwrap_or_else(|| name.to_string())
    }
}

/// Base types ∪ interfaces ∪ non-primitive types of method signatures.
///
/// Inherited names come first so a name that is both inherited and used in
/// a signature keeps the inheritance edge after de-duplication.
fn direct_dependencies(class: &ClassDefinition) -> Vec<String> {
    let mut seen = BTreeSet::new();
    let inherited = class.inherited_names().cloned();
    let signatures = class.methods.iter().flat_map(|method| {
        std::iter::once(method.return_type.as_str())
            .chain(method.parameters.iter().map(|p| p.type_name.as_str()))
            .flat_map(referenced_type_names)
            .collect::<Vec<_>>()
    });
    inherited
        .chain(signatures)
        .filter(|name| seen.insert(name.clone()))
        .collect()
}
