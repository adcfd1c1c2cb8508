//! OAM Archetype Object Model
//!
//! Typed constraint trees produced by the upstream ADL parser and semantic
//! builder. The compiler consumes these trees; it never parses text.
//!
//! A tree is strictly owned: a complex object owns its attributes and an
//! attribute owns its children. Cycles only exist between archetypes (via
//! specialisation), never inside one tree.

mod archetype;
mod constraints;

pub use archetype::*;
pub use constraints::*;
