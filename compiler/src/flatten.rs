//! Specialisation flattening.
//!
//! A specialised archetype only states what it changes. Flattening merges its
//! definition over every ancestor's, oldest first, into one effective tree.
//! Every disagreement becomes an OPT730 issue; a tree with any conflict is
//! discarded as a whole.

use crate::path::{attribute_path, object_path};
use oam_aom::{
    Archetype, ArchetypeSlot, CAttribute, CObject, ComplexObject, PrimitiveObject, SlotPattern,
};
use oam_core::{codes, sort_issues, Issue, SourceSpan};
use oam_repository::Repository;
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// Flatten `archetype`'s definition across its specialisation chain.
///
/// Returns `Ok(None)` when neither the archetype nor any ancestor has a
/// definition. An archetype without a parent yields its own definition
/// untouched. Ancestors missing from `repo` end the chain; they are reported
/// as OPT700 before flattening runs.
pub fn flatten_specialisation(
    archetype: &Archetype,
    repo: &Repository,
) -> Result<Option<ComplexObject>, Vec<Issue>> {
    let chain = ancestor_chain(archetype, repo);
    tracing::debug!(
        archetype = %archetype.archetype_id,
        depth = chain.len(),
        "flattening specialisation chain"
    );

    let mut flat: Option<ComplexObject> = None;
    for level in chain {
        flat = match (flat, &level.definition) {
            (None, definition) => definition.clone(),
            (Some(parent), None) => Some(parent),
            (Some(parent), Some(child)) => Some(merge_definitions(&parent, child)?),
        };
    }
    Ok(flat)
}

/// Merge a child definition over its parent's.
///
/// All conflicts in the tree are collected before failing.
pub fn merge_definitions(
    parent: &ComplexObject,
    child: &ComplexObject,
) -> Result<ComplexObject, Vec<Issue>> {
    if parent.rm_type_name != child.rm_type_name {
        return Err(vec![conflict(
            "/",
            child.span.as_ref().or(parent.span.as_ref()),
            format!(
                "RM type mismatch at '/': parent='{}', child='{}'",
                parent.rm_type_name, child.rm_type_name
            ),
        )]);
    }

    let mut issues = Vec::new();
    let merged = merge_complex(parent, child, "/", &mut issues);
    if issues.is_empty() {
        Ok(merged)
    } else {
        sort_issues(&mut issues);
        Err(issues)
    }
}

/// Merge two constraint objects found at the same position.
pub fn merge_objects(parent: &CObject, child: &CObject) -> Result<CObject, Vec<Issue>> {
    let mut issues = Vec::new();
    match merge_object(parent, child, "/", &mut issues) {
        Some(merged) if issues.is_empty() => Ok(merged),
        _ => {
            sort_issues(&mut issues);
            Err(issues)
        }
    }
}

/// `archetype` and its loaded ancestors, oldest first.
fn ancestor_chain<'a>(archetype: &'a Archetype, repo: &'a Repository) -> Vec<&'a Archetype> {
    let mut chain = vec![archetype];
    let mut seen = HashSet::from([&archetype.archetype_id]);
    let mut current = archetype;
    while let Some(parent) = current
        .parent_archetype_id
        .as_ref()
        .and_then(|id| repo.get(id.as_str()))
    {
        // Cycles are rejected before flattening; stop rather than loop.
        if !seen.insert(&parent.archetype_id) {
            break;
        }
        chain.push(parent);
        current = parent;
    }
    chain.reverse();
    chain
}

/// Merge one object pair. `None` means there is no merged node for this
/// position; the reason is in `issues`.
fn merge_object(
    parent: &CObject,
    child: &CObject,
    path: &str,
    issues: &mut Vec<Issue>,
) -> Option<CObject> {
    let span = child.span().or(parent.span());

    if parent.rm_type_name() != child.rm_type_name() {
        issues.push(conflict(
            path,
            span,
            format!(
                "RM type mismatch at '{}': parent='{}', child='{}'",
                path,
                parent.rm_type_name(),
                child.rm_type_name()
            ),
        ));
        return None;
    }

    match (parent, child) {
        (CObject::Complex(p), CObject::Complex(c)) => {
            Some(CObject::Complex(merge_complex(p, c, path, issues)))
        }
        (CObject::Primitive(p), CObject::Primitive(c)) => {
            merge_primitive(p, c, path, issues).map(CObject::Primitive)
        }
        (CObject::Slot(p), CObject::Slot(c)) => merge_slot(p, c, path, issues).map(CObject::Slot),
        _ => {
            issues.push(conflict(
                path,
                span,
                format!(
                    "{} cannot specialise {} at '{}'",
                    child.kind_name(),
                    parent.kind_name(),
                    path
                ),
            ));
            None
        }
    }
}

fn merge_primitive(
    parent: &PrimitiveObject,
    child: &PrimitiveObject,
    path: &str,
    issues: &mut Vec<Issue>,
) -> Option<PrimitiveObject> {
    if let (Some(p), Some(c)) = (&parent.constraint, &child.constraint) {
        if p != c {
            issues.push(conflict(
                path,
                child.span.as_ref().or(parent.span.as_ref()),
                format!("primitive constraint differs at '{}'", path),
            ));
            return None;
        }
    }

    Some(PrimitiveObject {
        rm_type_name: parent.rm_type_name.clone(),
        node_id: child.node_id.clone().or_else(|| parent.node_id.clone()),
        occurrences: child
            .occurrences
            .clone()
            .or_else(|| parent.occurrences.clone()),
        constraint: child
            .constraint
            .clone()
            .or_else(|| parent.constraint.clone()),
        span: child.span.clone().or_else(|| parent.span.clone()),
    })
}

fn merge_slot(
    parent: &ArchetypeSlot,
    child: &ArchetypeSlot,
    path: &str,
    issues: &mut Vec<Issue>,
) -> Option<ArchetypeSlot> {
    let span = child.span.as_ref().or(parent.span.as_ref());
    let includes = merge_patterns(&parent.includes, &child.includes);
    let excludes = merge_patterns(&parent.excludes, &child.excludes);

    if includes.is_none() {
        issues.push(conflict(
            path,
            span,
            format!("slot includes differ at '{}'", path),
        ));
    }
    if excludes.is_none() {
        issues.push(conflict(
            path,
            span,
            format!("slot excludes differ at '{}'", path),
        ));
    }

    Some(ArchetypeSlot {
        rm_type_name: parent.rm_type_name.clone(),
        node_id: child.node_id.clone().or_else(|| parent.node_id.clone()),
        occurrences: child
            .occurrences
            .clone()
            .or_else(|| parent.occurrences.clone()),
        includes: includes?,
        excludes: excludes?,
        span: span.cloned(),
    })
}

/// The child's patterns replace the parent's unless both are non-empty and differ.
fn merge_patterns(parent: &[SlotPattern], child: &[SlotPattern]) -> Option<Vec<SlotPattern>> {
    match (parent.is_empty(), child.is_empty()) {
        (_, true) => Some(parent.to_vec()),
        (true, false) => Some(child.to_vec()),
        (false, false) if parent == child => Some(parent.to_vec()),
        (false, false) => None,
    }
}

fn merge_complex(
    parent: &ComplexObject,
    child: &ComplexObject,
    path: &str,
    issues: &mut Vec<Issue>,
) -> ComplexObject {
    let parent_attrs: BTreeMap<&str, &CAttribute> = parent
        .attributes
        .iter()
        .map(|a| (a.rm_attribute_name.as_str(), a))
        .collect();
    let child_attrs: BTreeMap<&str, &CAttribute> = child
        .attributes
        .iter()
        .map(|a| (a.rm_attribute_name.as_str(), a))
        .collect();
    let names: BTreeSet<&str> = parent_attrs
        .keys()
        .chain(child_attrs.keys())
        .copied()
        .collect();

    let attributes = names
        .into_iter()
        .filter_map(
            |name| match (parent_attrs.get(name), child_attrs.get(name)) {
                (Some(p), Some(c)) => Some(merge_attribute(p, c, path, issues)),
                (Some(only), None) | (None, Some(only)) => Some((*only).clone()),
                (None, None) => None,
            },
        )
        .collect();

    ComplexObject {
        rm_type_name: parent.rm_type_name.clone(),
        node_id: child.node_id.clone().or_else(|| parent.node_id.clone()),
        occurrences: child
            .occurrences
            .clone()
            .or_else(|| parent.occurrences.clone()),
        attributes,
        span: child.span.clone().or_else(|| parent.span.clone()),
    }
}

fn merge_attribute(
    parent: &CAttribute,
    child: &CAttribute,
    owner_path: &str,
    issues: &mut Vec<Issue>,
) -> CAttribute {
    let path = attribute_path(owner_path, &parent.rm_attribute_name);
    let span = child.span.as_ref().or(parent.span.as_ref());

    let existence = merge_equal_or_override(
        parent.existence.as_ref(),
        child.existence.as_ref(),
    )
    .unwrap_or_else(|| {
        issues.push(conflict(
            &path,
            span,
            format!("existence differs at '{}'", path),
        ));
        parent.existence.clone()
    });
    let cardinality = merge_equal_or_override(
        parent.cardinality.as_ref(),
        child.cardinality.as_ref(),
    )
    .unwrap_or_else(|| {
        issues.push(conflict(
            &path,
            span,
            format!("cardinality differs at '{}'", path),
        ));
        parent.cardinality.clone()
    });

    CAttribute {
        rm_attribute_name: parent.rm_attribute_name.clone(),
        children: merge_children(&parent.children, &child.children, &path, issues),
        existence,
        cardinality,
        span: span.cloned(),
    }
}

/// `Some(merged)` when the child's value may override the parent's, `None` on a conflict.
fn merge_equal_or_override<T: Clone + PartialEq>(
    parent: Option<&T>,
    child: Option<&T>,
) -> Option<Option<T>> {
    match (parent, child) {
        (p, None) => Some(p.cloned()),
        (None, c) => Some(c.cloned()),
        (Some(p), Some(c)) if p == c => Some(Some(p.clone())),
        (Some(_), Some(_)) => None,
    }
}

/// Identity of a child within one attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum ChildKey<'a> {
    NodeId(&'a str),
    RmType(&'a str),
}

impl<'a> ChildKey<'a> {
    fn of(object: &'a CObject) -> Self {
        match object.node_id() {
            Some(id) => ChildKey::NodeId(id),
            None => ChildKey::RmType(object.rm_type_name()),
        }
    }
}

fn index_children<'a>(
    children: &'a [CObject],
    side: &str,
    path: &str,
    issues: &mut Vec<Issue>,
) -> BTreeMap<ChildKey<'a>, &'a CObject> {
    let mut index: BTreeMap<ChildKey<'a>, &'a CObject> = BTreeMap::new();
    for child in children {
        let key = ChildKey::of(child);
        if let Some(existing) = index.get(&key) {
            if existing.rm_type_name() != child.rm_type_name() {
                issues.push(conflict(
                    path,
                    child.span().or(existing.span()),
                    format!("duplicate node identity in {} at '{}'", side, path),
                ));
                continue;
            }
        }
        index.insert(key, child);
    }
    index
}

fn merge_children(
    parent: &[CObject],
    child: &[CObject],
    path: &str,
    issues: &mut Vec<Issue>,
) -> Vec<CObject> {
    let parent_index = index_children(parent, "parent", path, issues);
    let child_index = index_children(child, "child", path, issues);
    let keys: BTreeSet<ChildKey<'_>> = parent_index
        .keys()
        .chain(child_index.keys())
        .copied()
        .collect();

    let mut merged = Vec::with_capacity(keys.len());
    for key in keys {
        match (parent_index.get(&key), child_index.get(&key)) {
            (Some(p), Some(c)) => {
                let node_path = object_path(path, c.node_id().or(p.node_id()));
                if let ChildKey::NodeId(node_id) = key {
                    if p.rm_type_name() != c.rm_type_name() {
                        issues.push(conflict(
                            &node_path,
                            c.span().or(p.span()),
                            format!(
                                "node id '{}' reused with different RM type at '{}': parent='{}', child='{}'",
                                node_id,
                                node_path,
                                p.rm_type_name(),
                                c.rm_type_name()
                            ),
                        ));
                        continue;
                    }
                }
                if let Some(object) = merge_object(p, c, &node_path, issues) {
                    merged.push(object);
                }
            }
            (Some(only), None) | (None, Some(only)) => merged.push((*only).clone()),
            (None, None) => {}
        }
    }

    merged.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
    merged
}

fn conflict(path: &str, span: Option<&SourceSpan>, detail: String) -> Issue {
    Issue::error(
        codes::OPT730,
        format!("Specialisation flattening conflict: {}", detail),
    )
    .with_span(span)
    .with_path(path)
}
