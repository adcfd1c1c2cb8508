//! Compiler configuration.

/// JSON layout used when rendering an operational template.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JsonFormat {
    /// Single line, no insignificant whitespace.
    #[default]
    Compact,
    /// Two-space indented.
    Pretty,
}

/// Configuration for a compilation.
#[derive(Debug, Clone)]
pub struct CompilerConfig {
    /// Compile the whole repository when no slot selected any archetype.
    pub full_repository_fallback: bool,
    /// Resolve the template's archetype slots against the repository.
    pub resolve_slots: bool,
    /// Layout of `OperationalTemplate::to_json_with`.
    pub json_format: JsonFormat,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            full_repository_fallback: true,
            resolve_slots: true,
            json_format: JsonFormat::Compact,
        }
    }
}

impl CompilerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_full_repository_fallback(mut self, enabled: bool) -> Self {
        self.full_repository_fallback = enabled;
        self
    }

    pub fn with_resolve_slots(mut self, enabled: bool) -> Self {
        self.resolve_slots = enabled;
        self
    }

    pub fn with_json_format(mut self, format: JsonFormat) -> Self {
        self.json_format = format;
        self
    }

    /// Only compile what the template's slots select.
    pub fn strict() -> Self {
        Self {
            full_repository_fallback: false,
            ..Self::default()
        }
    }
}
