//! Operational template model.
//!
//! The flattened, path-addressed output of a compilation. Serialisation
//! follows field declaration order and sequence order, so the same input
//! always renders to the same JSON bytes.

use crate::{CompileResult, CompilerConfig, JsonFormat};
use oam_aom::{Cardinality, Interval, PrimitiveConstraint};
use oam_core::{ArchetypeId, SourceSpan};
use serde::Serialize;

/// A compiled operational template.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationalTemplate {
    pub template_id: String,
    pub concept: Option<String>,
    pub original_language: Option<String>,
    pub language: Option<String>,
    /// The archetype the definition was flattened from.
    pub root_archetype_id: Option<ArchetypeId>,
    /// Archetypes in scope, in dependency order.
    pub component_archetype_ids: Vec<ArchetypeId>,
    pub definition: Option<OptComplexObject>,
    pub span: Option<SourceSpan>,
}

impl OperationalTemplate {
    pub fn to_json(&self) -> CompileResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> CompileResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Render with the layout chosen in `config`.
    pub fn to_json_with(&self, config: &CompilerConfig) -> CompileResult<String> {
        match config.json_format {
            JsonFormat::Compact => self.to_json(),
            JsonFormat::Pretty => self.to_json_pretty(),
        }
    }

    /// Every object of the definition in depth-first pre-order.
    pub fn walk(&self) -> Vec<OptObjectRef<'_>> {
        let mut out = Vec::new();
        let mut stack: Vec<OptObjectRef<'_>> = self
            .definition
            .iter()
            .map(OptObjectRef::Complex)
            .collect();

        while let Some(object) = stack.pop() {
            if let OptObjectRef::Complex(complex) = object {
                for attribute in complex.attributes.iter().rev() {
                    stack.extend(attribute.children.iter().rev().map(OptObject::view));
                }
            }
            out.push(object);
        }
        out
    }

    /// The first object in pre-order whose path is `path`.
    pub fn find(&self, path: &str) -> Option<OptObjectRef<'_>> {
        self.walk().into_iter().find(|o| o.path() == path)
    }
}

/// A flattened constraint object.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OptObject {
    Complex(OptComplexObject),
    Primitive(OptPrimitiveObject),
}

impl OptObject {
    pub fn view(&self) -> OptObjectRef<'_> {
        match self {
            OptObject::Complex(o) => OptObjectRef::Complex(o),
            OptObject::Primitive(o) => OptObjectRef::Primitive(o),
        }
    }

    pub fn path(&self) -> &str {
        self.view().path()
    }

    pub fn rm_type_name(&self) -> &str {
        self.view().rm_type_name()
    }

    pub fn node_id(&self) -> Option<&str> {
        self.view().node_id()
    }

    pub fn as_complex(&self) -> Option<&OptComplexObject> {
        match self {
            OptObject::Complex(o) => Some(o),
            OptObject::Primitive(_) => None,
        }
    }
}

/// Borrowed view of either object kind, including the definition root.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OptObjectRef<'a> {
    Complex(&'a OptComplexObject),
    Primitive(&'a OptPrimitiveObject),
}

impl<'a> OptObjectRef<'a> {
    pub fn path(&self) -> &'a str {
        match self {
            OptObjectRef::Complex(o) => &o.path,
            OptObjectRef::Primitive(o) => &o.path,
        }
    }

    pub fn rm_type_name(&self) -> &'a str {
        match self {
            OptObjectRef::Complex(o) => &o.rm_type_name,
            OptObjectRef::Primitive(o) => &o.rm_type_name,
        }
    }

    pub fn node_id(&self) -> Option<&'a str> {
        match self {
            OptObjectRef::Complex(o) => o.node_id.as_deref(),
            OptObjectRef::Primitive(o) => o.node_id.as_deref(),
        }
    }

    pub fn source_archetype_id(&self) -> Option<&'a ArchetypeId> {
        match self {
            OptObjectRef::Complex(o) => o.source_archetype_id.as_ref(),
            OptObjectRef::Primitive(o) => o.source_archetype_id.as_ref(),
        }
    }

    pub fn span(&self) -> Option<&'a SourceSpan> {
        match self {
            OptObjectRef::Complex(o) => o.span.as_ref(),
            OptObjectRef::Primitive(o) => o.span.as_ref(),
        }
    }

    pub fn as_complex(&self) -> Option<&'a OptComplexObject> {
        match self {
            OptObjectRef::Complex(o) => Some(o),
            OptObjectRef::Primitive(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptComplexObject {
    pub rm_type_name: String,
    pub node_id: Option<String>,
    pub path: String,
    pub occurrences: Option<Interval>,
    pub source_archetype_id: Option<ArchetypeId>,
    pub span: Option<SourceSpan>,
    pub attributes: Vec<OptAttribute>,
}

impl OptComplexObject {
    pub fn attribute(&self, name: &str) -> Option<&OptAttribute> {
        self.attributes.iter().find(|a| a.rm_attribute_name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptPrimitiveObject {
    pub rm_type_name: String,
    pub node_id: Option<String>,
    pub path: String,
    pub occurrences: Option<Interval>,
    pub source_archetype_id: Option<ArchetypeId>,
    pub span: Option<SourceSpan>,
    pub constraint: Option<PrimitiveConstraint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptAttribute {
    pub rm_attribute_name: String,
    pub children: Vec<OptObject>,
    pub existence: Option<Interval>,
    pub cardinality: Option<Cardinality>,
    pub path: String,
    pub span: Option<SourceSpan>,
}
