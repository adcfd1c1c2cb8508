//! Source locations carried by parsed artefacts.
//!
//! Spans are diagnostic metadata only. No compilation logic depends on them.

use serde::Serialize;

/// A best-effort source span. Line and column numbers are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SourceSpan {
    pub file: Option<String>,
    pub start_line: u32,
    pub start_col: u32,
    pub end_line: u32,
    pub end_col: u32,
}

impl SourceSpan {
    pub fn new(
        file: Option<String>,
        start_line: u32,
        start_col: u32,
        end_line: u32,
        end_col: u32,
    ) -> Self {
        Self {
            file,
            start_line,
            start_col,
            end_line,
            end_col,
        }
    }

    /// A single-line span in `file`.
    pub fn line(file: impl Into<String>, line: u32, start_col: u32, end_col: u32) -> Self {
        Self::new(Some(file.into()), line, start_col, line, end_col)
    }
}
