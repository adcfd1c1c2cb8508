//! Dependency graph construction.

use oam_aom::Archetype;
use oam_core::{ArchetypeId, SourceSpan};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Source span of each graph node, for placing diagnostics.
pub type SpanIndex = BTreeMap<ArchetypeId, Option<SourceSpan>>;

/// A deterministic directed dependency graph.
///
/// `edges[a]` holds the ids `a` depends on, sorted and deduplicated. Every
/// node has an entry, possibly empty. Dependencies may name ids that are not
/// nodes; consumers ignore those.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DependencyGraph {
    nodes: Vec<ArchetypeId>,
    edges: BTreeMap<ArchetypeId, Vec<ArchetypeId>>,
}

impl DependencyGraph {
    /// Build a graph from `(node, dependencies)` pairs. Repeated nodes merge their dependencies.
    pub fn from_edges<I, D>(entries: I) -> Self
    where
        I: IntoIterator<Item = (ArchetypeId, D)>,
        D: IntoIterator<Item = ArchetypeId>,
    {
        let mut edges: BTreeMap<ArchetypeId, BTreeSet<ArchetypeId>> = BTreeMap::new();
        for (node, deps) in entries {
            edges.entry(node).or_default().extend(deps);
        }
        Self {
            nodes: edges.keys().cloned().collect(),
            edges: edges
                .into_iter()
                .map(|(node, deps)| (node, deps.into_iter().collect()))
                .collect(),
        }
    }

    /// Node ids in lexicographic order.
    pub fn nodes(&self) -> &[ArchetypeId] {
        &self.nodes
    }

    /// Dependencies of `id` in lexicographic order (empty for unknown ids).
    pub fn dependencies(&self, id: &str) -> &[ArchetypeId] {
        self.edges.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.edges.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Build the dependency graph for a set of archetypes.
///
/// Duplicate ids keep the first occurrence. The only dependency kind today is
/// the specialisation parent.
pub fn build_dependency_graph<'a>(
    archetypes: impl IntoIterator<Item = &'a Archetype>,
) -> (DependencyGraph, SpanIndex) {
    let mut by_id: BTreeMap<&ArchetypeId, &Archetype> = BTreeMap::new();
    for archetype in archetypes {
        by_id.entry(&archetype.archetype_id).or_insert(archetype);
    }

    let spans: SpanIndex = by_id
        .iter()
        .map(|(id, a)| ((*id).clone(), a.span.clone()))
        .collect();

    let graph = DependencyGraph::from_edges(by_id.values().map(|a| {
        (
            a.archetype_id.clone(),
            a.parent_archetype_id.iter().cloned().collect::<Vec<_>>(),
        )
    }));

    (graph, spans)
}
