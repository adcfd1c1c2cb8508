//! Deterministic topological ordering.

use crate::{build_dependency_graph, detect_cycles, DependencyGraph};
use oam_aom::Archetype;
use oam_core::{codes, ArchetypeId, Issue};
use std::collections::{BTreeMap, BTreeSet};

/// Order the graph so that every node comes after all of its dependencies.
///
/// Kahn's algorithm; when several nodes are ready the lexicographically
/// smallest goes first. Dependencies outside the graph are ignored. If the
/// graph is not acyclic the order is empty and a generic OPT705 issue is
/// returned; run [`detect_cycles`] first for per-cycle diagnostics.
pub fn topological_order(graph: &DependencyGraph) -> (Vec<ArchetypeId>, Vec<Issue>) {
    let mut pending: BTreeMap<&ArchetypeId, usize> = BTreeMap::new();
    let mut dependents: BTreeMap<&ArchetypeId, Vec<&ArchetypeId>> = BTreeMap::new();

    for node in graph.nodes() {
        let deps: Vec<&ArchetypeId> = graph
            .dependencies(node.as_str())
            .iter()
            .filter(|dep| graph.contains(dep.as_str()))
            .collect();
        pending.insert(node, deps.len());
        for dep in deps {
            dependents.entry(dep).or_default().push(node);
        }
    }

    let mut ready: BTreeSet<&ArchetypeId> = pending
        .iter()
        .filter(|(_, count)| **count == 0)
        .map(|(node, _)| *node)
        .collect();

    let mut order = Vec::with_capacity(graph.len());
    while let Some(node) = ready.pop_first() {
        order.push(node.clone());
        for &dependent in dependents.get(node).into_iter().flatten() {
            if let Some(count) = pending.get_mut(dependent) {
                *count -= 1;
                if *count == 0 {
                    ready.insert(dependent);
                }
            }
        }
    }

    if order.len() != graph.len() {
        tracing::debug!(
            ordered = order.len(),
            nodes = graph.len(),
            "topological order incomplete"
        );
        let issue = Issue::error(
            codes::OPT705,
            "Dependency cycle detected (incomplete topological order)",
        );
        return (Vec::new(), vec![issue]);
    }

    (order, Vec::new())
}

/// Build the graph for `archetypes`, check it for cycles and order it.
///
/// On any cycle the order is empty and the issues are the per-cycle OPT705
/// diagnostics.
pub fn dependency_order<'a>(
    archetypes: impl IntoIterator<Item = &'a Archetype>,
) -> (Vec<ArchetypeId>, Vec<Issue>) {
    let (graph, spans) = build_dependency_graph(archetypes);
    let cycles = detect_cycles(&graph, &spans);
    if !cycles.is_empty() {
        return (Vec::new(), cycles);
    }
    topological_order(&graph)
}
