//! OAM Archetype Repository
//!
//! Deterministic lookup of loaded archetypes by id. The repository is
//! immutable after construction via RepositoryBuilder or `load_from_dir`.

mod builder;
mod loader;
mod repository;

pub use builder::RepositoryBuilder;
pub use loader::{load_from_dir, ArchetypeParser, RepositoryError, RepositoryResult};
pub use repository::Repository;
