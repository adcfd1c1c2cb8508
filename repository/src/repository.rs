//! The Repository - immutable archetype lookup.

use oam_aom::Archetype;
use oam_core::ArchetypeId;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// The Repository provides lookup of loaded archetypes by id.
/// It is immutable after construction and safe to share across threads.
#[derive(Debug, Clone, Default)]
pub struct Repository {
    /// Archetypes in load order (sorted by source path when loaded from disk).
    archetypes: Vec<Archetype>,
    /// Archetype position lookup by id.
    index: HashMap<ArchetypeId, usize>,
    /// Source file per archetype id, when known.
    sources: HashMap<ArchetypeId, PathBuf>,
}

impl Repository {
    /// Create a repository (use RepositoryBuilder for construction).
    pub(crate) fn new(
        archetypes: Vec<Archetype>,
        index: HashMap<ArchetypeId, usize>,
        sources: HashMap<ArchetypeId, PathBuf>,
    ) -> Self {
        Self {
            archetypes,
            index,
            sources,
        }
    }

    /// Build an in-memory repository. Duplicate ids keep the first archetype.
    pub fn from_archetypes(archetypes: impl IntoIterator<Item = Archetype>) -> Self {
        let mut builder = crate::RepositoryBuilder::new();
        for archetype in archetypes {
            builder.add(archetype, None);
        }
        builder.build().0
    }

    /// Get an archetype by id.
    pub fn get(&self, id: &str) -> Option<&Archetype> {
        self.index.get(id).map(|&i| &self.archetypes[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// All archetypes in deterministic load order.
    pub fn archetypes(&self) -> &[Archetype] {
        &self.archetypes
    }

    /// Archetype ids in load order.
    pub fn ids(&self) -> impl Iterator<Item = &ArchetypeId> {
        self.archetypes.iter().map(|a| &a.archetype_id)
    }

    /// The file an archetype was loaded from.
    pub fn source_of(&self, id: &str) -> Option<&Path> {
        self.sources.get(id).map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.archetypes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.archetypes.is_empty()
    }
}
