//! Expectations over a compile outcome.

use oam_compiler::{check_opt_integrity, CompileOutcome};
use oam_core::ArchetypeId;

use crate::error::{ScenarioError, ScenarioResult};

/// Everything a scenario expects from its compilation.
#[derive(Default)]
pub struct Expectation {
    // Outcome
    pub success: Option<bool>,
    pub codes: Option<Vec<String>>,

    // Template shape
    pub components: Option<Vec<String>>,
    pub root: Option<Option<String>>,
    pub nodes: Vec<(String, String)>,
    pub absent: Vec<String>,
    pub integrity_clean: bool,

    // Issues
    pub messages: Vec<(String, String)>,
    pub message_patterns: Vec<(String, String)>,
    pub issue_paths: Vec<(String, String)>,

    // Custom check
    #[allow(clippy::type_complexity)]
    pub custom: Option<Box<dyn Fn(&CompileOutcome) -> bool + Send + Sync>>,
}

impl std::fmt::Debug for Expectation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Expectation")
            .field("success", &self.success)
            .field("codes", &self.codes)
            .field("components", &self.components)
            .field("root", &self.root)
            .field("nodes", &self.nodes)
            .field("messages", &self.messages)
            .field("custom", &self.custom.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

impl Expectation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Verify the expectation against an outcome.
    pub fn verify(&self, scenario: &str, outcome: &CompileOutcome) -> ScenarioResult<()> {
        let fail = |message: String| Err(ScenarioError::expectation_failed(scenario, message));

        if let Some(expected) = self.success {
            if outcome.is_success() != expected {
                return fail(format!(
                    "expected success={}, got issues: {}",
                    expected,
                    render_issues(outcome)
                ));
            }
        }

        if let Some(ref expected) = self.codes {
            let actual: Vec<&str> = outcome.issues.iter().map(|i| i.code.as_str()).collect();
            if actual != *expected {
                return fail(format!(
                    "expected issue codes {:?}, got {:?}",
                    expected, actual
                ));
            }
        }

        for (code, needle) in &self.messages {
            let found = outcome
                .issues
                .iter()
                .any(|i| i.code == *code && i.message.contains(needle.as_str()));
            if !found {
                return fail(format!(
                    "expected a {} issue containing '{}', got: {}",
                    code,
                    needle,
                    render_issues(outcome)
                ));
            }
        }

        for (code, pattern) in &self.message_patterns {
            let re = regex_lite::Regex::new(pattern)
                .map_err(|e| ScenarioError::invalid_pattern(pattern, e.to_string()))?;
            if !outcome
                .issues
                .iter()
                .any(|i| i.code == *code && re.is_match(&i.message))
            {
                return fail(format!(
                    "expected a {} issue matching '{}', got: {}",
                    code,
                    pattern,
                    render_issues(outcome)
                ));
            }
        }

        for (code, path) in &self.issue_paths {
            if !outcome
                .issues
                .iter()
                .any(|i| i.code == *code && i.path.as_deref() == Some(path.as_str()))
            {
                return fail(format!("expected a {} issue at path '{}'", code, path));
            }
        }

        if self.components.is_some()
            || self.root.is_some()
            || !self.nodes.is_empty()
            || !self.absent.is_empty()
            || self.integrity_clean
        {
            let Some(opt) = &outcome.opt else {
                return fail(format!(
                    "expected an operational template, got issues: {}",
                    render_issues(outcome)
                ));
            };

            if let Some(ref expected) = self.components {
                let actual: Vec<&str> = opt
                    .component_archetype_ids
                    .iter()
                    .map(ArchetypeId::as_str)
                    .collect();
                if actual != *expected {
                    return fail(format!(
                        "expected components {:?}, got {:?}",
                        expected, actual
                    ));
                }
            }

            if let Some(ref expected) = self.root {
                let actual = opt.root_archetype_id.as_ref().map(ArchetypeId::as_str);
                if actual != expected.as_deref() {
                    return fail(format!("expected root {:?}, got {:?}", expected, actual));
                }
            }

            for (path, rm_type) in &self.nodes {
                match opt.find(path) {
                    Some(node) if node.rm_type_name() == rm_type => {}
                    Some(node) => {
                        return fail(format!(
                            "expected {} at '{}', found {}",
                            rm_type,
                            path,
                            node.rm_type_name()
                        ))
                    }
                    None => return fail(format!("expected {} at '{}', found nothing", rm_type, path)),
                }
            }

            for path in &self.absent {
                if opt.find(path).is_some() {
                    return fail(format!("expected no node at '{}'", path));
                }
            }

            if self.integrity_clean {
                let issues = check_opt_integrity(opt);
                if !issues.is_empty() {
                    let rendered: Vec<String> = issues.iter().map(ToString::to_string).collect();
                    return fail(format!("integrity issues: {}", rendered.join("; ")));
                }
            }
        }

        if let Some(ref custom) = self.custom {
            if !custom(outcome) {
                return fail("custom expectation failed".to_string());
            }
        }

        Ok(())
    }
}

fn render_issues(outcome: &CompileOutcome) -> String {
    if outcome.issues.is_empty() {
        return "none".to_string();
    }
    outcome
        .issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Fluent builder for expectations.
pub struct ExpectationBuilder {
    expectation: Expectation,
}

impl ExpectationBuilder {
    pub fn new() -> Self {
        Self {
            expectation: Expectation::new(),
        }
    }

    pub fn build(self) -> Expectation {
        self.expectation
    }

    // ========== Outcome ==========

    /// Expect an operational template to be produced.
    pub fn success(mut self) -> Self {
        self.expectation.success = Some(true);
        self
    }

    /// Expect compilation to abort.
    pub fn failure(mut self) -> Self {
        self.expectation.success = Some(false);
        self
    }

    /// Expect exactly these issue codes, in reported order.
    pub fn codes(mut self, codes: &[&str]) -> Self {
        self.expectation.codes = Some(codes.iter().map(|c| c.to_string()).collect());
        self
    }

    /// Expect no issues at all.
    pub fn clean(self) -> Self {
        self.codes(&[])
    }

    // ========== Template shape ==========

    /// Expect these component archetypes, in order.
    pub fn components(mut self, ids: &[&str]) -> Self {
        self.expectation.components = Some(ids.iter().map(|id| id.to_string()).collect());
        self
    }

    pub fn root(mut self, id: &str) -> Self {
        self.expectation.root = Some(Some(id.to_string()));
        self
    }

    pub fn no_root(mut self) -> Self {
        self.expectation.root = Some(None);
        self
    }

    /// Expect an object of `rm_type` at `path`.
    pub fn node(mut self, path: &str, rm_type: &str) -> Self {
        self.expectation
            .nodes
            .push((path.to_string(), rm_type.to_string()));
        self
    }

    pub fn no_node(mut self, path: &str) -> Self {
        self.expectation.absent.push(path.to_string());
        self
    }

    /// Expect the template to pass the integrity checks.
    pub fn integrity_clean(mut self) -> Self {
        self.expectation.integrity_clean = true;
        self
    }

    // ========== Issues ==========

    /// Expect an issue with `code` whose message contains `needle`.
    pub fn message(mut self, code: &str, needle: &str) -> Self {
        self.expectation
            .messages
            .push((code.to_string(), needle.to_string()));
        self
    }

    /// Expect an issue with `code` whose message matches the regex `pattern`.
    pub fn message_matches(mut self, code: &str, pattern: &str) -> Self {
        self.expectation
            .message_patterns
            .push((code.to_string(), pattern.to_string()));
        self
    }

    /// Expect an issue with `code` reported at `path`.
    pub fn issue_at(mut self, code: &str, path: &str) -> Self {
        self.expectation
            .issue_paths
            .push((code.to_string(), path.to_string()));
        self
    }

    // ========== Advanced ==========

    /// Custom expectation function.
    pub fn expect_fn<F>(mut self, f: F) -> Self
    where
        F: Fn(&CompileOutcome) -> bool + Send + Sync + 'static,
    {
        self.expectation.custom = Some(Box::new(f));
        self
    }
}

impl Default for ExpectationBuilder {
    fn default() -> Self {
        Self::new()
    }
}
