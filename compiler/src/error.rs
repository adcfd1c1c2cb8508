//! Compiler error types.
//!
//! Problems with the archetypes themselves are reported as `Issue`s; these
//! errors only cover failures of the environment around a compilation.

use oam_repository::RepositoryError;
use thiserror::Error;

/// Errors that stop a compilation before any diagnostics can be produced.
#[derive(Debug, Error)]
pub enum CompileError {
    /// The archetype repository could not be loaded.
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Serialising the operational template failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for compiler operations.
pub type CompileResult<T> = Result<T, CompileError>;
