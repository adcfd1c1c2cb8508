//! Slash-delimited constraint paths.
//!
//! The root object is `/`. An attribute extends its owner's path with
//! `/name`, and an object extends its attribute's path with `[node_id]`
//! when it has one: `/content[at0001]/data`.

/// Path of an attribute named `name` on the object at `object_path`.
pub(crate) fn attribute_path(object_path: &str, name: &str) -> String {
    let base = object_path.trim_end_matches('/');
    format!("{}/{}", base, name)
}

/// Path of an object under the attribute at `attribute_path`.
pub(crate) fn object_path(attribute_path: &str, node_id: Option<&str>) -> String {
    match node_id {
        Some(id) if !id.is_empty() => format!("{}[{}]", attribute_path, id),
        _ => attribute_path.to_string(),
    }
}
