//! OPT assembly: assigns paths and provenance to a flattened definition.

use crate::path::{attribute_path, object_path};
use crate::{OperationalTemplate, OptAttribute, OptComplexObject, OptObject, OptPrimitiveObject};
use oam_aom::{CAttribute, CObject, ComplexObject, Template};
use oam_core::ArchetypeId;

/// Convert a flattened definition into OPT nodes rooted at `/`.
///
/// Every node is stamped with `source_archetype_id`. Attributes are emitted
/// by name and children by `(rm_type_name, node_id)`. Slots still present
/// in the tree become complex objects without attributes.
pub fn assemble_definition(
    definition: &ComplexObject,
    source_archetype_id: Option<&ArchetypeId>,
) -> OptComplexObject {
    complex_to_opt(definition, "/".to_string(), source_archetype_id)
}

/// Build the operational template for `template`.
pub fn assemble_opt(
    template: &Template,
    root_archetype_id: Option<&ArchetypeId>,
    component_archetype_ids: Vec<ArchetypeId>,
    definition: Option<&ComplexObject>,
) -> OperationalTemplate {
    OperationalTemplate {
        template_id: template.template_id.clone(),
        concept: template.concept.clone(),
        original_language: template.original_language.clone(),
        language: template.languages.first().cloned(),
        root_archetype_id: root_archetype_id.cloned(),
        component_archetype_ids,
        definition: definition.map(|d| assemble_definition(d, root_archetype_id)),
        span: template.span.clone(),
    }
}

fn complex_to_opt(
    object: &ComplexObject,
    path: String,
    source: Option<&ArchetypeId>,
) -> OptComplexObject {
    let mut attributes: Vec<&CAttribute> = object.attributes.iter().collect();
    attributes.sort_by(|a, b| a.rm_attribute_name.cmp(&b.rm_attribute_name));

    OptComplexObject {
        rm_type_name: object.rm_type_name.clone(),
        node_id: object.node_id.clone(),
        occurrences: object.occurrences.clone(),
        source_archetype_id: source.cloned(),
        span: object.span.clone(),
        attributes: attributes
            .into_iter()
            .map(|a| attribute_to_opt(a, &path, source))
            .collect(),
        path,
    }
}

fn attribute_to_opt(
    attribute: &CAttribute,
    owner_path: &str,
    source: Option<&ArchetypeId>,
) -> OptAttribute {
    let path = attribute_path(owner_path, &attribute.rm_attribute_name);

    let mut children: Vec<&CObject> = attribute.children.iter().collect();
    children.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));

    OptAttribute {
        rm_attribute_name: attribute.rm_attribute_name.clone(),
        children: children
            .into_iter()
            .map(|c| object_to_opt(c, object_path(&path, c.node_id()), source))
            .collect(),
        existence: attribute.existence.clone(),
        cardinality: attribute.cardinality.clone(),
        path,
        span: attribute.span.clone(),
    }
}

fn object_to_opt(object: &CObject, path: String, source: Option<&ArchetypeId>) -> OptObject {
    match object {
        CObject::Complex(complex) => OptObject::Complex(complex_to_opt(complex, path, source)),
        CObject::Primitive(primitive) => OptObject::Primitive(OptPrimitiveObject {
            rm_type_name: primitive.rm_type_name.clone(),
            node_id: primitive.node_id.clone(),
            path,
            occurrences: primitive.occurrences.clone(),
            source_archetype_id: source.cloned(),
            span: primitive.span.clone(),
            constraint: primitive.constraint.clone(),
        }),
        CObject::Slot(slot) => OptObject::Complex(OptComplexObject {
            rm_type_name: slot.rm_type_name.clone(),
            node_id: slot.node_id.clone(),
            path,
            occurrences: slot.occurrences.clone(),
            source_archetype_id: source.cloned(),
            span: slot.span.clone(),
            attributes: Vec::new(),
        }),
    }
}
