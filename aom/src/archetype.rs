//! AOM roots: Archetype and Template.

use crate::ComplexObject;
use oam_core::{ArchetypeId, SourceSpan};

/// A parsed archetype. Immutable once loaded into a repository.
#[derive(Debug, Clone, PartialEq)]
pub struct Archetype {
    pub archetype_id: ArchetypeId,
    /// Specialisation parent, when this archetype refines another one.
    pub parent_archetype_id: Option<ArchetypeId>,
    pub concept: Option<String>,
    pub definition: Option<ComplexObject>,
    pub span: Option<SourceSpan>,
}

impl Archetype {
    pub fn new(archetype_id: impl Into<ArchetypeId>) -> Self {
        Self {
            archetype_id: archetype_id.into(),
            parent_archetype_id: None,
            concept: None,
            definition: None,
            span: None,
        }
    }

    pub fn specialising(mut self, parent: impl Into<ArchetypeId>) -> Self {
        self.parent_archetype_id = Some(parent.into());
        self
    }

    pub fn with_concept(mut self, concept: impl Into<String>) -> Self {
        self.concept = Some(concept.into());
        self
    }

    pub fn with_definition(mut self, definition: ComplexObject) -> Self {
        self.definition = Some(definition);
        self
    }

    pub fn with_span(mut self, span: SourceSpan) -> Self {
        self.span = Some(span);
        self
    }
}

/// A parsed template: the composition a compilation starts from.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    pub template_id: String,
    pub concept: Option<String>,
    pub original_language: Option<String>,
    pub languages: Vec<String>,
    pub definition: Option<ComplexObject>,
    pub span: Option<SourceSpan>,
}

impl Template {
    pub fn new(template_id: impl Into<String>) -> Self {
        Self {
            template_id: template_id.into(),
            concept: None,
            original_language: None,
            languages: Vec::new(),
            definition: None,
            span: None,
        }
    }

    pub fn with_concept(mut self, concept: impl Into<String>) -> Self {
        self.concept = Some(concept.into());
        self
    }

    pub fn with_original_language(mut self, language: impl Into<String>) -> Self {
        self.original_language = Some(language.into());
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.languages.push(language.into());
        self
    }

    pub fn with_definition(mut self, definition: ComplexObject) -> Self {
        self.definition = Some(definition);
        self
    }

    pub fn with_span(mut self, span: SourceSpan) -> Self {
        self.span = Some(span);
        self
    }
}
