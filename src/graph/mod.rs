//! Dependency Graph Builder.
//!
//! One node per extracted class, keyed by fully qualified name. Edges point
//! from a class to the types it inherits from or mentions in method
//! signatures; targets that do not resolve to an extracted class stay as
//! raw names and are never nodes.

mod builder;
pub mod cycles;

pub use builder::{referenced_type_names, GraphBuilder};

use crate::core::{ClassDefinition, TypeKind};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    Inheritance,
    Usage,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DependencyNode {
    /// Fully qualified name
    pub id: String,
    pub name: String,
    pub kind: TypeKind,
    pub file_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DependencyEdge {
    pub from: String,
    /// A node id, or the raw name of an external type
    pub to: String,
    pub kind: EdgeKind,
}

/// Directed type-relationship graph.
///
/// Every edge's `from` is a node id; `to` may be external.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DependencyGraph {
    nodes: BTreeMap<String, DependencyNode>,
    /// Sorted by `(from, to)`, at most one edge per pair
    edges: Vec<DependencyEdge>,
    /// target → sources
    reverse: BTreeMap<String, BTreeSet<String>>,
}

impl DependencyGraph {
    /// Build the graph for a set of extracted classes.
    pub fn build(classes: &[ClassDefinition]) -> Self {
        GraphBuilder::new(classes).build()
    }

    pub(crate) fn from_parts(
        nodes: BTreeMap<String, DependencyNode>,
        mut edges: Vec<DependencyEdge>,
    ) -> Self {
        edges.sort();
        edges.dedup_by(|a, b| a.from == b.from && a.to == b.to);
        let mut reverse: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for edge in &edges {
            reverse
                .entry(edge.to.clone())
                .or_default()
                .insert(edge.from.clone());
        }
        Self {
            nodes,
            edges,
            reverse,
        }
    }

    pub fn nodes(&self) -> impl Iterator<Item = &DependencyNode> {
        self.nodes.values()
    }

    pub fn node(&self, id: &str) -> Option<&DependencyNode> {
        self.nodes.get(id)
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn edges(&self) -> &[DependencyEdge] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn edges_of_kind(&self, kind: EdgeKind) -> impl Iterator<Item = &DependencyEdge> {
        self.edges.iter().filter(move |e| e.kind == kind)
    }

    /// Outgoing edges of `id`.
    pub fn dependencies_of<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a DependencyEdge> {
        let start = self.edges.partition_point(|e| e.from.as_str() < id);
        self.edges[start..].iter().take_while(move |e| e.from == id)
    }

    /// Sources with an edge into `id` (internal or external target).
    pub fn dependents_of(&self, id: &str) -> impl Iterator<Item = &String> {
        self.reverse.get(id).into_iter().flatten()
    }

    pub fn dependent_count(&self, id: &str) -> usize {
        self.reverse.get(id).map_or(0, BTreeSet::len)
    }

    /// Targets that are not extracted classes.
    pub fn external_targets(&self) -> BTreeSet<&str> {
        self.edges
            .iter()
            .filter(|e| !self.nodes.contains_key(&e.to))
            .map(|e| e.to.as_str())
            .collect()
    }

    /// Edges between internal nodes only.
    pub fn internal_adjacency(&self) -> cycles::Adjacency {
        let mut adjacency: cycles::Adjacency =
            self.nodes.keys().map(|id| (id.clone(), BTreeSet::new())).collect();
        for edge in &self.edges {
            if self.nodes.contains_key(&edge.to) {
                if let Some(targets) = adjacency.get_mut(&edge.from) {
                    targets.insert(edge.to.clone());
                }
            }
        }
        adjacency
    }

    /// Each distinct cycle among internal nodes exactly once, deterministic
    /// for identical input.
    pub fn circular_dependencies(&self) -> Vec<Vec<String>> {
        cycles::find_cycles(&self.internal_adjacency())
    }

    /// Length of the longest internal inheritance chain above `id`.
    /// A class with no internal base has depth 0.
    pub fn inheritance_depth(&self, id: &str) -> usize {
        self.depth_with(id, &mut BTreeMap::new())
    }

    /// Deepest inheritance chain over all nodes.
    pub fn max_inheritance_depth(&self) -> usize {
        let mut memo = BTreeMap::new();
        self.nodes
            .keys()
            .map(|id| self.depth_with(id, &mut memo))
            .max()
            .unwrap_or(0)
    }

    fn internal_bases<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a str> {
        self.dependencies_of(id)
            .filter(|e| e.kind == EdgeKind::Inheritance && self.nodes.contains_key(&e.to))
            .map(|e| e.to.as_str())
    }

    /// Post-order walk with an explicit stack. Inheritance cycles are invalid
    /// C#; a base still being expanded counts as a root.
    fn depth_with<'a>(&'a self, start: &'a str, memo: &mut BTreeMap<&'a str, usize>) -> usize {
        let mut expanding = BTreeSet::new();
        let mut stack = vec![start];
        while let Some(&id) = stack.last() {
            if memo.contains_key(id) {
                stack.pop();
                continue;
            }
            expanding.insert(id);
            let pending: Vec<&str> = self
                .internal_bases(id)
                .filter(|base| !memo.contains_key(base) && !expanding.contains(base))
                .collect();
            if !pending.is_empty() {
                stack.extend(pending);
                continue;
            }
            let depth = self
                .internal_bases(id)
                .map(|base| 1 + memo.get(base).copied().unwrap_or(0))
                .max()
                .unwrap_or(0);
            memo.insert(id, depth);
            expanding.remove(id);
            stack.pop();
        }
        memo.get(start).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ClassDefinition;
    use pretty_assertions::assert_eq;

    fn class(name: &str, bases: &[&str]) -> ClassDefinition {
        let mut class = ClassDefinition::new(name, format!("Assets/Scripts/{}.cs", name));
        class.base_types = bases.iter().map(|b| b.to_string()).collect();
        class
    }

    #[test]
    fn test_three_class_inheritance_chain() {
        let classes = vec![
            class("ClassA", &["ClassB"]),
            class("ClassB", &["ClassC"]),
            class("ClassC", &[]),
        ];
        let graph = DependencyGraph::build(&classes);
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edges_of_kind(EdgeKind::Inheritance).count(), 2);
        assert!(graph.circular_dependencies().is_empty());
        assert_eq!(graph.inheritance_depth("ClassA"), 2);
        assert_eq!(graph.max_inheritance_depth(), 2);
    }

    #[test]
    fn test_cycle_through_inheritance_edges() {
        let classes = vec![
            class("A", &["B"]),
            class("B", &["C"]),
            class("C", &["A"]),
        ];
        let graph = DependencyGraph::build(&classes);
        assert_eq!(graph.circular_dependencies(), vec![vec!["A", "B", "C"]]);
        // depth stays finite on invalid cyclic inheritance
        assert!(graph.max_inheritance_depth() <= 3);
    }

    #[test]
    fn test_external_targets_and_reverse_index() {
        let classes = vec![class("Player", &["MonoBehaviour"]), class("Enemy", &["Player"])];
        let graph = DependencyGraph::build(&classes);
        assert_eq!(
            graph.external_targets().into_iter().collect::<Vec<_>>(),
            vec!["MonoBehaviour"]
        );
        assert_eq!(graph.dependent_count("Player"), 1);
        assert_eq!(graph.dependents_of("MonoBehaviour").collect::<Vec<_>>(), vec!["Player"]);
        let deps: Vec<_> = graph.dependencies_of("Enemy").map(|e| e.to.as_str()).collect();
        assert_eq!(deps, vec!["Player"]);
        assert!(graph.edges().iter().all(|e| graph.contains_node(&e.from)));
    }

    #[test]
    fn test_deep_hierarchy_depth_without_recursion() {
        let names: Vec<String> = (0..20_000).map(|i| format!("Level{:05}", i)).collect();
        let classes: Vec<ClassDefinition> = names
            .iter()
            .enumerate()
            .map(|(i, name)| match names.get(i + 1) {
                Some(base) => class(name, &[base.as_str()]),
                None => class(name, &[]),
            })
            .collect();
        let graph = DependencyGraph::build(&classes);

        assert_eq!(graph.inheritance_depth("Level00000"), 19_999);
        assert_eq!(graph.max_inheritance_depth(), 19_999);
        assert!(graph.circular_dependencies().is_empty());
    }

    #[test]
    fn test_empty_graph() {
        let graph = DependencyGraph::build(&[]);
        assert_eq!(graph.node_count(), 0);
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(graph.max_inheritance_depth(), 0);
    }
}
