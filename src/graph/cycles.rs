//! Elementary cycle enumeration over a string-keyed adjacency map.
//!
//! The search follows Johnson's outline with explicit stacks throughout.
//! Strongly connected components of the subgraph of ids at or above a floor
//! are computed (Kosaraju); the smallest id sitting in a non-trivial component
//! becomes the root, and a depth-first search confined to that component and
//! to ids not below the root records every simple path back to it. The floor
//! then moves past the root. Each cycle is reported exactly once, already
//! starting at its smallest member. Targets that are not keys of the map are
//! leaves and never take part in a cycle.

use std::collections::{BTreeMap, BTreeSet};

pub type Adjacency = BTreeMap<String, BTreeSet<String>>;

/// Distinct elementary cycles, each starting at its smallest member, sorted.
pub fn find_cycles(adjacency: &Adjacency) -> Vec<Vec<String>> {
    let mut cycles = BTreeSet::new();
    let mut floor = adjacency.keys().next().map(String::as_str);
    while let Some(lowest) = floor {
        let component = strongly_connected_components(adjacency, lowest);
        let mut sizes: BTreeMap<usize, usize> = BTreeMap::new();
        for index in component.values() {
            *sizes.entry(*index).or_default() += 1;
        }
        let root = keys_from(adjacency, lowest).find(|key| {
            let size = component.get(*key).and_then(|i| sizes.get(i)).copied();
            size.unwrap_or(0) > 1 || adjacency.get(*key).is_some_and(|t| t.contains(*key))
        });
        let Some(root) = root else {
            break;
        };
        cycles_through(adjacency, &component, root, &mut cycles);
        floor = keys_from(adjacency, root).find(|key| *key > root);
    }
    cycles.into_iter().collect()
}

fn keys_from<'a>(adjacency: &'a Adjacency, floor: &'a str) -> impl Iterator<Item = &'a str> {
    adjacency
        .keys()
        .map(String::as_str)
        .skip_while(move |key| *key < floor)
}

/// Targets of `node` that are keys of the map and not below `floor`, in
/// ascending order.
fn internal_targets<'a>(adjacency: &'a Adjacency, node: &str, floor: &str) -> Vec<&'a str> {
    adjacency
        .get(node)
        .into_iter()
        .flatten()
        .map(String::as_str)
        .filter(|t| *t >= floor && adjacency.contains_key(*t))
        .collect()
}

/// Component index per key, over the subgraph of ids not below `floor`.
fn strongly_connected_components<'a>(
    adjacency: &'a Adjacency,
    floor: &'a str,
) -> BTreeMap<&'a str, usize> {
    let mut finished = Vec::new();
    let mut visited = BTreeSet::new();
    for start in keys_from(adjacency, floor) {
        if !visited.insert(start) {
            continue;
        }
        let mut stack = vec![(start, internal_targets(adjacency, start, floor).into_iter())];
        while let Some((node, targets)) = stack.last_mut() {
            match targets.next() {
                Some(target) => {
                    if visited.insert(target) {
                        let next = internal_targets(adjacency, target, floor).into_iter();
                        stack.push((target, next));
                    }
                }
                None => {
                    finished.push(*node);
                    stack.pop();
                }
            }
        }
    }

    let mut reverse: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for from in keys_from(adjacency, floor) {
        for target in internal_targets(adjacency, from, floor) {
            reverse.entry(target).or_default().push(from);
        }
    }

    let mut component = BTreeMap::new();
    for (index, start) in finished.iter().rev().enumerate() {
        if component.contains_key(*start) {
            continue;
        }
        component.insert(*start, index);
        let mut stack = vec![*start];
        while let Some(node) = stack.pop() {
            for source in reverse.get(node).into_iter().flatten() {
                if !component.contains_key(*source) {
                    component.insert(*source, index);
                    stack.push(*source);
                }
            }
        }
    }
    component
}

/// Every elementary cycle whose smallest member is `root`.
fn cycles_through<'a>(
    adjacency: &'a Adjacency,
    component: &BTreeMap<&str, usize>,
    root: &'a str,
    cycles: &mut BTreeSet<Vec<String>>,
) {
    let root_component = component.get(root).copied();
    let successors = |node: &str| -> Vec<&'a str> {
        internal_targets(adjacency, node, root)
            .into_iter()
            .filter(|t| component.get(*t).copied() == root_component)
            .collect()
    };

    let mut path = vec![root];
    let mut on_path = BTreeSet::from([root]);
    let mut stack = vec![successors(root).into_iter()];
    while let Some(targets) = stack.last_mut() {
        let Some(target) = targets.next() else {
            stack.pop();
            if let Some(done) = path.pop() {
                on_path.remove(done);
            }
            continue;
        };
        if target == root {
            cycles.insert(path.iter().map(|id| id.to_string()).collect());
        } else if on_path.insert(target) {
            path.push(target);
            stack.push(successors(target).into_iter());
        }
    }
}
