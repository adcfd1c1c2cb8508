//! Identity types for OAM artefacts.
//!
//! Archetype ids are opaque strings. They are totally ordered by plain
//! lexicographic comparison, which every stage uses for tie-breaking.

use serde::Serialize;
use std::borrow::Borrow;
use std::fmt;

/// Identifier of an archetype (e.g. `openEHR-EHR-OBSERVATION.blood_pressure.v1`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ArchetypeId(String);

impl ArchetypeId {
    /// Create a new ArchetypeId from a raw string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the raw value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArchetypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for ArchetypeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ArchetypeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ArchetypeId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ArchetypeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl PartialEq<str> for ArchetypeId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ArchetypeId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
