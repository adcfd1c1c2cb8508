//! Structured diagnostics.
//!
//! Every OAM stage reports recoverable problems as `Issue` values. Compilation
//! aborts on the presence of an ERROR issue, never on an `Err` or a panic.

use crate::SourceSpan;
use serde::Serialize;
use std::fmt;

/// Issue severity. Serialized as uppercase strings to keep JSON output stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Info,
    Warn,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A structured diagnostic for a recoverable problem.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Issue {
    pub code: String,
    pub severity: Severity,
    pub message: String,

    pub file: Option<String>,
    pub line: Option<u32>,
    pub col: Option<u32>,
    pub end_line: Option<u32>,
    pub end_col: Option<u32>,

    pub path: Option<String>,
    pub node_id: Option<String>,
}

impl Issue {
    pub fn new(code: impl Into<String>, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            severity,
            message: message.into(),
            file: None,
            line: None,
            col: None,
            end_line: None,
            end_col: None,
            path: None,
            node_id: None,
        }
    }

    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(code, Severity::Error, message)
    }

    pub fn warn(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(code, Severity::Warn, message)
    }

    pub fn info(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(code, Severity::Info, message)
    }

    /// Place the issue at `span`. A `None` span leaves the location empty.
    pub fn with_span(mut self, span: Option<&SourceSpan>) -> Self {
        if let Some(span) = span {
            self.file = span.file.clone();
            self.line = Some(span.start_line);
            self.col = Some(span.start_col);
            self.end_line = Some(span.end_line);
            self.end_col = Some(span.end_col);
        }
        self
    }

    /// Place the issue in a file without a line/column.
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_node_id(mut self, node_id: Option<impl Into<String>>) -> Self {
        self.node_id = node_id.map(Into::into);
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    fn location(&self) -> Option<String> {
        let file = self.file.as_deref()?;
        let Some(line) = self.line else {
            return Some(file.to_string());
        };
        let Some(col) = self.col else {
            return Some(format!("{}:{}", file, line));
        };
        let Some(end_col) = self.end_col else {
            return Some(format!("{}:{}:{}", file, line, col));
        };
        let end_line = self.end_line.unwrap_or(line);
        if end_line == line {
            Some(format!("{}:{}:{}-{}", file, line, col, end_col))
        } else {
            Some(format!("{}:{}:{}-{}:{}", file, line, col, end_line, end_col))
        }
    }
}

/// One-line human readable rendering:
/// `file:line:col-end_col: SEVERITY CODE: message (path=..., node_id=...)`.
impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(location) = self.location() {
            write!(f, "{}: ", location)?;
        }
        write!(f, "{} {}: {}", self.severity, self.code, self.message)?;

        let mut extras = Vec::new();
        if let Some(ref path) = self.path {
            extras.push(format!("path={}", path));
        }
        if let Some(ref node_id) = self.node_id {
            extras.push(format!("node_id={}", node_id));
        }
        if !extras.is_empty() {
            write!(f, " ({})", extras.join(", "))?;
        }
        Ok(())
    }
}

/// True when any issue in `issues` is an ERROR.
pub fn has_errors<'a>(issues: impl IntoIterator<Item = &'a Issue>) -> bool {
    issues.into_iter().any(Issue::is_error)
}
