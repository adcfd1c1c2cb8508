//! Archetype slot resolution.

use crate::path::{attribute_path, object_path};
use oam_aom::{ArchetypeSlot, CObject, ComplexObject, PatternKind, SlotPattern};
use oam_core::{codes, ArchetypeId, Issue};
use oam_repository::Repository;
use regex_lite::Regex;
use std::collections::BTreeSet;

/// A slot pattern prepared for matching.
enum Matcher<'p> {
    Exact(&'p str),
    /// `None` when the pattern does not compile; it then matches nothing.
    Regex(Option<Regex>),
}

impl<'p> Matcher<'p> {
    fn new(pattern: &'p SlotPattern) -> Self {
        match pattern.kind {
            PatternKind::Exact => Matcher::Exact(&pattern.value),
            PatternKind::Regex => {
                // The raw pattern must compile on its own: an unbalanced `)`
                // could otherwise close the anchoring group.
                let regex = Regex::new(&pattern.value)
                    .and_then(|_| Regex::new(&format!("^(?:{})$", pattern.value)))
                    .map_err(|err| {
                        tracing::debug!(pattern = %pattern.value, error = %err, "ignoring malformed slot pattern");
                    })
                    .ok();
                Matcher::Regex(regex)
            }
        }
    }

    fn matches(&self, id: &str) -> bool {
        match self {
            Matcher::Exact(value) => *value == id,
            Matcher::Regex(Some(regex)) => regex.is_match(id),
            Matcher::Regex(None) => false,
        }
    }
}

/// Whether `id` matches `pattern`. Regex patterns must match the whole id;
/// a malformed regex matches nothing.
pub fn pattern_matches(pattern: &SlotPattern, id: &str) -> bool {
    Matcher::new(pattern).matches(id)
}

/// Archetype ids of `ids` that fill `slot`, in iteration order.
pub fn slot_candidates<'a>(
    slot: &ArchetypeSlot,
    ids: impl IntoIterator<Item = &'a ArchetypeId>,
) -> Vec<&'a ArchetypeId> {
    let includes: Vec<Matcher<'_>> = slot.includes.iter().map(Matcher::new).collect();
    let excludes: Vec<Matcher<'_>> = slot.excludes.iter().map(Matcher::new).collect();

    ids.into_iter()
        .filter(|id| {
            let included = includes.is_empty() || includes.iter().any(|m| m.matches(id.as_str()));
            let excluded = excludes.iter().any(|m| m.matches(id.as_str()));
            included && !excluded
        })
        .collect()
}

/// Resolve every archetype slot in `definition` against `repo`.
///
/// Each slot is filled by its lexicographically smallest candidate. Slots
/// without candidates produce an OPT720 issue; the remaining slots are still
/// resolved. Only `definition` itself is searched, not the archetypes it
/// selects. The selected ids come back sorted and deduplicated.
pub fn resolve_slots(
    definition: &ComplexObject,
    repo: &Repository,
) -> (Vec<ArchetypeId>, Vec<Issue>) {
    let mut selected = BTreeSet::new();
    let mut issues = Vec::new();

    for (path, slot) in collect_slots(definition) {
        match slot_candidates(slot, repo.ids()).into_iter().min() {
            Some(id) => {
                tracing::debug!(path = %path, archetype = %id, "slot filled");
                selected.insert(id.clone());
            }
            None => issues.push(unfilled_slot(&path, slot)),
        }
    }

    (selected.into_iter().collect(), issues)
}

/// Slots in `root`'s tree with their paths, in depth-first order.
fn collect_slots(root: &ComplexObject) -> Vec<(String, &ArchetypeSlot)> {
    let mut found = Vec::new();
    let mut stack: Vec<(String, &ComplexObject)> = vec![("/".to_string(), root)];

    while let Some((path, object)) = stack.pop() {
        for attribute in object.attributes.iter().rev() {
            let attr_path = attribute_path(&path, &attribute.rm_attribute_name);
            for child in attribute.children.iter().rev() {
                let child_path = object_path(&attr_path, child.node_id());
                match child {
                    CObject::Complex(complex) => stack.push((child_path, complex)),
                    CObject::Slot(slot) => found.push((child_path, slot)),
                    CObject::Primitive(_) => {}
                }
            }
        }
    }

    found.sort_by(|a, b| a.0.cmp(&b.0));
    found
}

fn unfilled_slot(path: &str, slot: &ArchetypeSlot) -> Issue {
    Issue::error(
        codes::OPT720,
        format!(
            "No archetype matches slot at '{}' (include: {}; exclude: {})",
            path,
            render_patterns(&slot.includes),
            render_patterns(&slot.excludes)
        ),
    )
    .with_span(slot.span.as_ref())
    .with_path(path)
    .with_node_id(slot.node_id.as_deref())
}

fn render_patterns(patterns: &[SlotPattern]) -> String {
    if patterns.is_empty() {
        return "none".to_string();
    }
    patterns
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
