//! Constraint tree types.

use oam_core::SourceSpan;
use serde::Serialize;
use std::fmt;

/// An interval over ordered values. `None` bounds are unbounded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Interval<T = i64> {
    pub lower: Option<T>,
    pub upper: Option<T>,
    pub lower_included: bool,
    pub upper_included: bool,
}

impl<T> Interval<T> {
    /// Closed interval `lower..upper`.
    pub fn new(lower: Option<T>, upper: Option<T>) -> Self {
        Self {
            lower,
            upper,
            lower_included: true,
            upper_included: true,
        }
    }

    /// `lower..*`
    pub fn at_least(lower: T) -> Self {
        Self::new(Some(lower), None)
    }
}

impl<T: Clone> Interval<T> {
    /// `n..n`
    pub fn exactly(n: T) -> Self {
        Self::new(Some(n.clone()), Some(n))
    }
}

/// Cardinality of a container attribute.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cardinality {
    pub occurrences: Interval,
    pub is_ordered: bool,
    pub is_unique: bool,
}

impl Cardinality {
    pub fn new(occurrences: Interval) -> Self {
        Self {
            occurrences,
            is_ordered: false,
            is_unique: false,
        }
    }

    pub fn ordered(mut self) -> Self {
        self.is_ordered = true;
        self
    }

    pub fn unique(mut self) -> Self {
        self.is_unique = true;
        self
    }
}

/// Constraint payload of a primitive object.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PrimitiveConstraint {
    String {
        values: Option<Vec<String>>,
        pattern: Option<String>,
    },
    Integer {
        values: Option<Vec<i64>>,
        interval: Option<Interval<i64>>,
    },
    Real {
        values: Option<Vec<f64>>,
        interval: Option<Interval<f64>>,
    },
    Boolean {
        values: Option<Vec<bool>>,
    },
}

/// How a slot pattern is matched against archetype ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    /// Literal string equality.
    Exact,
    /// Regular expression that must match the whole id.
    Regex,
}

/// One include/exclude entry of an archetype slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SlotPattern {
    pub kind: PatternKind,
    pub value: String,
}

impl SlotPattern {
    pub fn exact(value: impl Into<String>) -> Self {
        Self {
            kind: PatternKind::Exact,
            value: value.into(),
        }
    }

    pub fn regex(value: impl Into<String>) -> Self {
        Self {
            kind: PatternKind::Regex,
            value: value.into(),
        }
    }
}

/// Renders in ADL style: `"literal"` or `/regex/`.
impl fmt::Display for SlotPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            PatternKind::Exact => write!(f, "\"{}\"", self.value),
            PatternKind::Regex => write!(f, "/{}/", self.value),
        }
    }
}

/// A node of the constraint tree.
#[derive(Debug, Clone, PartialEq)]
pub enum CObject {
    Complex(ComplexObject),
    Primitive(PrimitiveObject),
    Slot(ArchetypeSlot),
}

impl CObject {
    pub fn rm_type_name(&self) -> &str {
        match self {
            CObject::Complex(o) => &o.rm_type_name,
            CObject::Primitive(o) => &o.rm_type_name,
            CObject::Slot(o) => &o.rm_type_name,
        }
    }

    pub fn node_id(&self) -> Option<&str> {
        match self {
            CObject::Complex(o) => o.node_id.as_deref(),
            CObject::Primitive(o) => o.node_id.as_deref(),
            CObject::Slot(o) => o.node_id.as_deref(),
        }
    }

    pub fn occurrences(&self) -> Option<&Interval> {
        match self {
            CObject::Complex(o) => o.occurrences.as_ref(),
            CObject::Primitive(o) => o.occurrences.as_ref(),
            CObject::Slot(o) => o.occurrences.as_ref(),
        }
    }

    pub fn span(&self) -> Option<&SourceSpan> {
        match self {
            CObject::Complex(o) => o.span.as_ref(),
            CObject::Primitive(o) => o.span.as_ref(),
            CObject::Slot(o) => o.span.as_ref(),
        }
    }

    /// Short name of the variant, used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            CObject::Complex(_) => "complex object",
            CObject::Primitive(_) => "primitive object",
            CObject::Slot(_) => "archetype slot",
        }
    }

    pub fn as_complex(&self) -> Option<&ComplexObject> {
        match self {
            CObject::Complex(o) => Some(o),
            _ => None,
        }
    }

    /// Sort key used for deterministic sibling order: `(rm_type_name, node_id or "")`.
    pub fn sort_key(&self) -> (&str, &str) {
        (self.rm_type_name(), self.node_id().unwrap_or(""))
    }
}

impl From<ComplexObject> for CObject {
    fn from(o: ComplexObject) -> Self {
        CObject::Complex(o)
    }
}

impl From<PrimitiveObject> for CObject {
    fn from(o: PrimitiveObject) -> Self {
        CObject::Primitive(o)
    }
}

impl From<ArchetypeSlot> for CObject {
    fn from(o: ArchetypeSlot) -> Self {
        CObject::Slot(o)
    }
}

/// A complex constraint object with attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct ComplexObject {
    pub rm_type_name: String,
    pub node_id: Option<String>,
    pub occurrences: Option<Interval>,
    pub attributes: Vec<CAttribute>,
    pub span: Option<SourceSpan>,
}

impl ComplexObject {
    pub fn new(rm_type_name: impl Into<String>) -> Self {
        Self {
            rm_type_name: rm_type_name.into(),
            node_id: None,
            occurrences: None,
            attributes: Vec::new(),
            span: None,
        }
    }

    pub fn with_node_id(mut self, node_id: impl Into<String>) -> Self {
        self.node_id = Some(node_id.into());
        self
    }

    pub fn with_occurrences(mut self, occurrences: Interval) -> Self {
        self.occurrences = Some(occurrences);
        self
    }

    pub fn with_attribute(mut self, attribute: CAttribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn with_span(mut self, span: SourceSpan) -> Self {
        self.span = Some(span);
        self
    }

    /// Get an attribute by RM attribute name.
    pub fn attribute(&self, name: &str) -> Option<&CAttribute> {
        self.attributes.iter().find(|a| a.rm_attribute_name == name)
    }
}

/// A primitive constraint object (string, integer, real, boolean leaf).
#[derive(Debug, Clone, PartialEq)]
pub struct PrimitiveObject {
    pub rm_type_name: String,
    pub node_id: Option<String>,
    pub occurrences: Option<Interval>,
    pub constraint: Option<PrimitiveConstraint>,
    pub span: Option<SourceSpan>,
}

impl PrimitiveObject {
    pub fn new(rm_type_name: impl Into<String>) -> Self {
        Self {
            rm_type_name: rm_type_name.into(),
            node_id: None,
            occurrences: None,
            constraint: None,
            span: None,
        }
    }

    pub fn with_node_id(mut self, node_id: impl Into<String>) -> Self {
        self.node_id = Some(node_id.into());
        self
    }

    pub fn with_occurrences(mut self, occurrences: Interval) -> Self {
        self.occurrences = Some(occurrences);
        self
    }

    pub fn with_constraint(mut self, constraint: PrimitiveConstraint) -> Self {
        self.constraint = Some(constraint);
        self
    }

    pub fn with_span(mut self, span: SourceSpan) -> Self {
        self.span = Some(span);
        self
    }
}

/// A placeholder filled by archetypes whose ids match the include/exclude patterns.
#[derive(Debug, Clone, PartialEq)]
pub struct ArchetypeSlot {
    pub rm_type_name: String,
    pub node_id: Option<String>,
    pub occurrences: Option<Interval>,
    pub includes: Vec<SlotPattern>,
    pub excludes: Vec<SlotPattern>,
    pub span: Option<SourceSpan>,
}

impl ArchetypeSlot {
    pub fn new(rm_type_name: impl Into<String>) -> Self {
        Self {
            rm_type_name: rm_type_name.into(),
            node_id: None,
            occurrences: None,
            includes: Vec::new(),
            excludes: Vec::new(),
            span: None,
        }
    }

    pub fn with_node_id(mut self, node_id: impl Into<String>) -> Self {
        self.node_id = Some(node_id.into());
        self
    }

    pub fn with_occurrences(mut self, occurrences: Interval) -> Self {
        self.occurrences = Some(occurrences);
        self
    }

    pub fn include(mut self, pattern: SlotPattern) -> Self {
        self.includes.push(pattern);
        self
    }

    pub fn exclude(mut self, pattern: SlotPattern) -> Self {
        self.excludes.push(pattern);
        self
    }

    pub fn with_span(mut self, span: SourceSpan) -> Self {
        self.span = Some(span);
        self
    }
}

/// Constraint over one RM attribute of a complex object.
#[derive(Debug, Clone, PartialEq)]
pub struct CAttribute {
    pub rm_attribute_name: String,
    pub children: Vec<CObject>,
    pub existence: Option<Interval>,
    pub cardinality: Option<Cardinality>,
    pub span: Option<SourceSpan>,
}

impl CAttribute {
    pub fn new(rm_attribute_name: impl Into<String>) -> Self {
        Self {
            rm_attribute_name: rm_attribute_name.into(),
            children: Vec::new(),
            existence: None,
            cardinality: None,
            span: None,
        }
    }

    pub fn with_child(mut self, child: impl Into<CObject>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn with_existence(mut self, existence: Interval) -> Self {
        self.existence = Some(existence);
        self
    }

    pub fn with_cardinality(mut self, cardinality: Cardinality) -> Self {
        self.cardinality = Some(cardinality);
        self
    }

    pub fn with_span(mut self, span: SourceSpan) -> Self {
        self.span = Some(span);
        self
    }

    /// Find a child by node id.
    pub fn child(&self, node_id: &str) -> Option<&CObject> {
        self.children.iter().find(|c| c.node_id() == Some(node_id))
    }
}
