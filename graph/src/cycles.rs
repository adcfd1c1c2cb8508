//! Dependency cycle detection.
//!
//! Depth-first search over the dependency graph with an explicit frame stack,
//! so very large archetype sets cannot exhaust the call stack.

use crate::{DependencyGraph, SpanIndex};
use oam_core::{codes, ArchetypeId, Issue};
use std::collections::{BTreeSet, HashMap, HashSet};

/// One DFS frame: a node and the position of the next dependency to visit.
struct Frame<'g> {
    node: &'g ArchetypeId,
    deps: std::slice::Iter<'g, ArchetypeId>,
}

/// Detect dependency cycles and emit one OPT705 issue per distinct cycle.
///
/// A cycle is reported once no matter which node the search entered it from.
/// Its rendering starts at its lexicographically smallest rotation, e.g.
/// `a -> b -> a`, and the issue is placed at the span of that first node.
/// Dependencies on ids outside the graph are ignored.
pub fn detect_cycles(graph: &DependencyGraph, spans: &SpanIndex) -> Vec<Issue> {
    let mut visited: HashSet<&ArchetypeId> = HashSet::new();
    let mut stack_pos: HashMap<&ArchetypeId, usize> = HashMap::new();
    let mut path: Vec<&ArchetypeId> = Vec::new();
    let mut seen: BTreeSet<Vec<ArchetypeId>> = BTreeSet::new();
    let mut issues = Vec::new();

    for start in graph.nodes() {
        if visited.contains(start) {
            continue;
        }

        let mut frames = vec![enter(graph, start, &mut path, &mut stack_pos)];
        while let Some(frame) = frames.last_mut() {
            let node = frame.node;
            match frame.deps.next() {
                Some(dep) => {
                    if !graph.contains(dep.as_str()) || visited.contains(dep) {
                        continue;
                    }
                    if let Some(&pos) = stack_pos.get(dep) {
                        let canonical = canonical_cycle(&path[pos..]);
                        if seen.insert(canonical.clone()) {
                            issues.push(cycle_issue(&canonical, spans));
                        }
                        continue;
                    }
                    frames.push(enter(graph, dep, &mut path, &mut stack_pos));
                }
                None => {
                    frames.pop();
                    path.pop();
                    stack_pos.remove(node);
                    visited.insert(node);
                }
            }
        }
    }

    if !issues.is_empty() {
        tracing::debug!(cycles = issues.len(), "dependency cycles detected");
    }
    issues
}

fn enter<'g>(
    graph: &'g DependencyGraph,
    node: &'g ArchetypeId,
    path: &mut Vec<&'g ArchetypeId>,
    stack_pos: &mut HashMap<&'g ArchetypeId, usize>,
) -> Frame<'g> {
    stack_pos.insert(node, path.len());
    path.push(node);
    Frame {
        node,
        deps: graph.dependencies(node.as_str()).iter(),
    }
}

/// The rotation of `cycle` starting at its smallest id. Nodes on a DFS path
/// are distinct, so this is also the lexicographically smallest rotation.
fn canonical_cycle(cycle: &[&ArchetypeId]) -> Vec<ArchetypeId> {
    let start = cycle
        .iter()
        .enumerate()
        .min_by_key(|&(_, id)| *id)
        .map_or(0, |(i, _)| i);
    cycle[start..]
        .iter()
        .chain(&cycle[..start])
        .map(|id| (*id).clone())
        .collect()
}

fn cycle_issue(canonical: &[ArchetypeId], spans: &SpanIndex) -> Issue {
    let rendered = canonical
        .iter()
        .chain(canonical.first())
        .map(ArchetypeId::as_str)
        .collect::<Vec<_>>()
        .join(" -> ");
    let span = canonical
        .first()
        .and_then(|id| spans.get(id))
        .and_then(Option::as_ref);
    Issue::error(
        codes::OPT705,
        format!("Dependency cycle detected: {}", rendered),
    )
    .with_span(span)
}
