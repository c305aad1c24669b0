//! Property tests over generated class hierarchies.

use proptest::prelude::*;
use std::path::Path;
use unitymap::extraction::complexity::cyclomatic_complexity;
use unitymap::graph::cycles::{find_cycles, Adjacency};
use unitymap::graph::EdgeKind;
use unitymap::{CSharpExtractor, DependencyGraph, SourceExtractor};

/// `count` classes where class `i` inherits from class `i + 1`; with `ring`
/// the last class closes the loop back to the first.
fn hierarchy_source(count: usize, ring: bool) -> String {
    let mut source = String::from("namespace Gen\n{\n");
    for i in 0..count {
        let base = if i + 1 < count {
            format!(" : C{}", i + 1)
        } else if ring && count > 1 {
            " : C0".to_string()
        } else {
            String::new()
        };
        source.push_str(&format!(
            "    public class C{}{}\n    {{\n        public void Tick() {{ }}\n    }}\n",
            i, base
        ));
    }
    source.push_str("}\n");
    source
}

fn graph_of(source: &str) -> DependencyGraph {
    let facts = CSharpExtractor::default()
        .extract(source, Path::new("Assets/Scripts/Gen.cs"))
        .unwrap();
    DependencyGraph::build(&facts.classes)
}

proptest! {
    #[test]
    fn prop_complexity_counts_every_branch(ifs in 0usize..20, ands in 0usize..20) {
        let body = format!("{}{}", "if (x) { } ".repeat(ifs), "a && b; ".repeat(ands));
        prop_assert_eq!(cyclomatic_complexity(&body), 1 + (ifs + ands) as u32);
    }

    #[test]
    fn prop_chain_has_one_edge_per_link_and_no_cycle(count in 1usize..12) {
        let graph = graph_of(&hierarchy_source(count, false));

        prop_assert_eq!(graph.node_count(), count);
        prop_assert_eq!(graph.edges_of_kind(EdgeKind::Inheritance).count(), count - 1);
        prop_assert!(graph.edges().iter().all(|e| graph.contains_node(&e.from)));
        prop_assert!(graph.circular_dependencies().is_empty());
        prop_assert_eq!(graph.max_inheritance_depth(), count - 1);
    }

    #[test]
    fn prop_ring_has_exactly_one_cycle(count in 2usize..12) {
        let source = hierarchy_source(count, true);
        let cycles = graph_of(&source).circular_dependencies();

        prop_assert_eq!(cycles.len(), 1);
        prop_assert_eq!(cycles[0].len(), count);
        prop_assert_eq!(cycles[0][0].as_str(), "Gen.C0");
        prop_assert_eq!(graph_of(&source).circular_dependencies(), cycles);
    }

    #[test]
    fn prop_cycles_start_at_smallest_member(
        names in prop::collection::btree_set("[a-z]{1,6}", 2..8)
    ) {
        let names: Vec<String> = names.into_iter().collect();
        let mut adjacency = Adjacency::new();
        for (i, name) in names.iter().enumerate() {
            let next = names[(i + 1) % names.len()].clone();
            adjacency.entry(name.clone()).or_default().insert(next);
        }

        let cycles = find_cycles(&adjacency);
        prop_assert_eq!(cycles.len(), 1);
        prop_assert_eq!(&cycles[0][0], &names[0]);
    }
}
