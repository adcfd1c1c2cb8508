//! Structural integrity checks over a compiled operational template.
//!
//! These are downstream validations (OPT750); compilation never runs them
//! itself. Assembler output passes them as long as no attribute holds two
//! children without node ids: those share their attribute's path and are
//! reported as duplicate object paths.

use crate::path::attribute_path;
use crate::{OperationalTemplate, OptAttribute, OptComplexObject, OptObjectRef};
use oam_core::{codes, sort_issues, Issue, SourceSpan};
use std::collections::{BTreeMap, BTreeSet};

/// Check the internal consistency of `opt` and return OPT750 issues, sorted.
pub fn check_opt_integrity(opt: &OperationalTemplate) -> Vec<Issue> {
    let mut issues = Vec::new();

    let mut seen = BTreeSet::new();
    let duplicates: BTreeSet<&str> = opt
        .component_archetype_ids
        .iter()
        .filter(|id| !seen.insert(id.as_str()))
        .map(|id| id.as_str())
        .collect();
    for id in duplicates {
        issues.push(integrity_issue(
            format!("Duplicate archetype id in component_archetype_ids: '{}'", id),
            None,
            opt.span.as_ref(),
        ));
    }

    if let Some(root) = &opt.root_archetype_id {
        if !opt.component_archetype_ids.is_empty() && !opt.component_archetype_ids.contains(root) {
            issues.push(integrity_issue(
                format!(
                    "root_archetype_id is not included in component_archetype_ids: '{}'",
                    root
                ),
                None,
                opt.span.as_ref(),
            ));
        }
    }

    let Some(definition) = &opt.definition else {
        sort_issues(&mut issues);
        return issues;
    };
    let root_span = definition.span.as_ref().or(opt.span.as_ref());

    if !definition.path.starts_with('/') {
        issues.push(integrity_issue(
            "OPT definition root has invalid or missing path".to_string(),
            Some(definition.path.as_str()),
            root_span,
        ));
    }

    let mut object_paths: BTreeMap<&str, usize> = BTreeMap::new();
    check_object(
        OptObjectRef::Complex(definition),
        None,
        &mut object_paths,
        &mut issues,
    );

    for (path, _) in object_paths.into_iter().filter(|(_, count)| *count > 1) {
        issues.push(integrity_issue(
            format!("Duplicate object path in OPT definition: '{}'", path),
            Some(path),
            root_span,
        ));
    }

    sort_issues(&mut issues);
    issues
}

fn check_object<'a>(
    object: OptObjectRef<'a>,
    parent_path: Option<&str>,
    object_paths: &mut BTreeMap<&'a str, usize>,
    issues: &mut Vec<Issue>,
) {
    let path = object.path();
    if !path.starts_with('/') {
        issues.push(integrity_issue(
            "OPT object has invalid or missing path".to_string(),
            Some(path),
            object.span(),
        ));
        return;
    }

    if let Some(parent) = parent_path {
        if !path.starts_with(parent) {
            issues.push(integrity_issue(
                format!(
                    "OPT object path is not under parent path: parent='{}', child='{}'",
                    parent, path
                ),
                Some(path),
                object.span(),
            ));
        }
    }

    if let Some(node_id) = object.node_id() {
        if !path.contains(&format!("[{}]", node_id)) {
            issues.push(integrity_issue(
                "OPT object node_id not reflected in path".to_string(),
                Some(path),
                object.span(),
            ));
        }
    }

    *object_paths.entry(path).or_default() += 1;

    if let Some(complex) = object.as_complex() {
        check_attributes(complex, object_paths, issues);
    }
}

fn check_attributes<'a>(
    object: &'a OptComplexObject,
    object_paths: &mut BTreeMap<&'a str, usize>,
    issues: &mut Vec<Issue>,
) {
    let mut names: BTreeMap<&str, usize> = BTreeMap::new();
    for attribute in &object.attributes {
        *names.entry(attribute.rm_attribute_name.as_str()).or_default() += 1;
    }
    for (name, _) in names.into_iter().filter(|(_, count)| *count > 1) {
        issues.push(integrity_issue(
            format!(
                "Duplicate attribute name under object '{}': '{}'",
                object.path, name
            ),
            Some(object.path.as_str()),
            object.span.as_ref(),
        ));
    }

    let mut attributes: Vec<&OptAttribute> = object.attributes.iter().collect();
    attributes.sort_by(|a, b| a.rm_attribute_name.cmp(&b.rm_attribute_name));

    for attribute in attributes {
        check_attribute(attribute, &object.path, issues);
        for child in &attribute.children {
            check_object(child.view(), Some(attribute.path.as_str()), object_paths, issues);
        }
    }
}

fn check_attribute(attribute: &OptAttribute, owner_path: &str, issues: &mut Vec<Issue>) {
    if attribute.rm_attribute_name.is_empty() {
        issues.push(integrity_issue(
            "OPT attribute has empty rm_attribute_name".to_string(),
            Some(attribute.path.as_str()),
            attribute.span.as_ref(),
        ));
        return;
    }

    let expected = attribute_path(owner_path, &attribute.rm_attribute_name);
    if attribute.path != expected {
        issues.push(integrity_issue(
            format!(
                "OPT attribute path mismatch: expected='{}', actual='{}'",
                expected, attribute.path
            ),
            Some(attribute.path.as_str()),
            attribute.span.as_ref(),
        ));
    }
}

fn integrity_issue(message: String, path: Option<&str>, span: Option<&SourceSpan>) -> Issue {
    let issue = Issue::error(codes::OPT750, message).with_span(span);
    match path {
        Some(path) => issue.with_path(path),
        None => issue,
    }
}
