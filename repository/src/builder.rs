//! RepositoryBuilder for constructing an immutable Repository.

use crate::Repository;
use oam_aom::Archetype;
use oam_core::{codes, ArchetypeId, Issue};
use std::collections::HashMap;
use std::path::PathBuf;

/// Builder for constructing an immutable Repository.
///
/// Duplicate archetype ids are kept deterministically: the first archetype
/// wins and every later duplicate is reported as an AOM242 ERROR.
#[derive(Debug, Default)]
pub struct RepositoryBuilder {
    archetypes: Vec<Archetype>,
    index: HashMap<ArchetypeId, usize>,
    sources: HashMap<ArchetypeId, PathBuf>,
    issues: Vec<Issue>,
}

impl RepositoryBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an archetype loaded from `source` (if it came from a file).
    /// Returns false when the id was already present.
    pub fn add(&mut self, archetype: Archetype, source: Option<PathBuf>) -> bool {
        let id = archetype.archetype_id.clone();
        if self.index.contains_key(&id) {
            let kept = self
                .sources
                .get(&id)
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "<memory>".to_string());
            let mut issue = Issue::error(
                codes::AOM242,
                format!(
                    "Duplicate archetype id '{}'; keeping first definition from '{}'",
                    id, kept
                ),
            );
            if let Some(ref path) = source {
                issue = issue.with_file(path.display().to_string());
            }
            tracing::debug!(archetype_id = %id, "duplicate archetype id ignored");
            self.issues.push(issue);
            return false;
        }

        self.index.insert(id.clone(), self.archetypes.len());
        if let Some(path) = source {
            self.sources.insert(id, path);
        }
        self.archetypes.push(archetype);
        true
    }

    /// Build the immutable Repository together with the issues raised while adding.
    pub fn build(self) -> (Repository, Vec<Issue>) {
        (
            Repository::new(self.archetypes, self.index, self.sources),
            self.issues,
        )
    }
}
