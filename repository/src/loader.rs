//! Loading a repository from a directory of `.adl` files.
//!
//! Parsing is delegated to an [`ArchetypeParser`]; this module only owns the
//! deterministic directory scan and the bookkeeping around it.

use crate::{Repository, RepositoryBuilder};
use oam_aom::Archetype;
use oam_core::{codes, Issue};
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// Environment failures that prevent loading a repository at all.
///
/// Problems with individual files are reported as issues instead.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The repository root does not exist or is not a directory.
    #[error("Not a directory: {}", path.display())]
    NotADirectory { path: PathBuf },

    /// The repository root could not be scanned.
    #[error("Cannot scan directory '{}': {source}", path.display())]
    Scan {
        path: PathBuf,
        source: walkdir::Error,
    },
}

impl RepositoryError {
    pub fn not_a_directory(path: impl Into<PathBuf>) -> Self {
        Self::NotADirectory { path: path.into() }
    }

    pub fn scan(path: impl Into<PathBuf>, source: walkdir::Error) -> Self {
        Self::Scan {
            path: path.into(),
            source,
        }
    }
}

/// Result type for repository loading.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Turns ADL source text into an archetype.
///
/// Returns `None` when the text is not an archetype (a template, or input too
/// broken to build); the accompanying issues explain why.
pub trait ArchetypeParser {
    fn parse_archetype(&self, source: &str, file: &Path) -> (Option<Archetype>, Vec<Issue>);
}

impl<F> ArchetypeParser for F
where
    F: Fn(&str, &Path) -> (Option<Archetype>, Vec<Issue>),
{
    fn parse_archetype(&self, source: &str, file: &Path) -> (Option<Archetype>, Vec<Issue>) {
        self(source, file)
    }
}

/// Load every `.adl` file under `dir` (recursively) and index the archetypes by id.
///
/// Files are visited in sorted path order. Unreadable files become ADL005
/// issues and are skipped; duplicate ids keep the first file (AOM242).
pub fn load_from_dir<P: ArchetypeParser + ?Sized>(
    dir: impl AsRef<Path>,
    parser: &P,
) -> RepositoryResult<(Repository, Vec<Issue>)> {
    let root = dir.as_ref();
    if !root.is_dir() {
        return Err(RepositoryError::not_a_directory(root));
    }

    let mut issues = Vec::new();
    let mut files = Vec::new();

    for entry in WalkDir::new(root) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => return Err(RepositoryError::scan(root, e)),
            Err(e) => {
                let mut issue = Issue::error(codes::ADL005, format!("Cannot read input file: {}", e));
                if let Some(path) = e.path() {
                    issue = issue.with_file(path.display().to_string());
                }
                issues.push(issue);
                continue;
            }
        };
        let path = entry.path();
        if entry.file_type().is_file() && path.extension().is_some_and(|ext| ext == "adl") {
            files.push(path.to_path_buf());
        }
    }
    files.sort();

    let mut builder = RepositoryBuilder::new();
    for path in files {
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) => {
                issues.push(
                    Issue::error(codes::ADL005, format!("Cannot read input file: {}", e))
                        .with_file(path.display().to_string()),
                );
                continue;
            }
        };

        let (archetype, parse_issues) = parser.parse_archetype(&text, &path);
        issues.extend(parse_issues);
        let Some(archetype) = archetype else {
            tracing::debug!(file = %path.display(), "no archetype produced");
            continue;
        };

        tracing::debug!(file = %path.display(), archetype_id = %archetype.archetype_id, "loaded archetype");
        builder.add(archetype, Some(path));
    }

    let (repo, build_issues) = builder.build();
    issues.extend(build_issues);
    Ok((repo, issues))
}
