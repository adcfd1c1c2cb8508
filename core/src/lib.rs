//! OAM Core Types
//!
//! This crate provides the foundational types shared by every OAM layer:
//! - Identity types (ArchetypeId)
//! - Source locations (SourceSpan)
//! - Diagnostics (Issue, Severity) and their deterministic ordering
//! - Reserved diagnostic codes

pub mod codes;
mod collector;
mod id;
mod issue;
mod span;

pub use collector::*;
pub use id::*;
pub use issue::*;
pub use span::*;
