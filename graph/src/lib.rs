//! OAM Dependency Graph
//!
//! This crate provides the archetype dependency analysis used by compilation:
//! - Graph construction: one node per archetype id, edges to specialisation parents
//! - Cycle detection: one OPT705 issue per distinct cycle
//! - Topological order: deterministic, lexicographic tie-breaking
//!
//! Every function is pure; the graph is rebuilt for each compilation.

mod cycles;
mod dependency;
mod order;

pub use cycles::detect_cycles;
pub use dependency::{build_dependency_graph, DependencyGraph, SpanIndex};
pub use order::{dependency_order, topological_order};
