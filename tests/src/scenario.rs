//! Scenario definition and builder.

use oam_aom::{Archetype, Template};
use oam_compiler::{CompileOutcome, Compiler, CompilerConfig};
use oam_repository::RepositoryBuilder;

use crate::assertion::{Expectation, ExpectationBuilder};
use crate::error::{ScenarioError, ScenarioResult};

/// A complete compilation scenario: an in-memory repository, a template and
/// what the compilation should produce.
pub struct Scenario {
    /// Scenario name (for reporting).
    name: String,
    /// Archetypes in load order.
    archetypes: Vec<Archetype>,
    template: Option<Template>,
    config: CompilerConfig,
    expectation: Expectation,
}

impl Scenario {
    /// Create a new scenario with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            archetypes: Vec::new(),
            template: None,
            config: CompilerConfig::default(),
            expectation: Expectation::new(),
        }
    }

    /// Add an archetype to the repository.
    pub fn archetype(mut self, archetype: Archetype) -> Self {
        self.archetypes.push(archetype);
        self
    }

    pub fn archetypes(mut self, archetypes: impl IntoIterator<Item = Archetype>) -> Self {
        self.archetypes.extend(archetypes);
        self
    }

    pub fn template(mut self, template: Template) -> Self {
        self.template = Some(template);
        self
    }

    pub fn config(mut self, config: CompilerConfig) -> Self {
        self.config = config;
        self
    }

    /// Set what the compilation must produce.
    pub fn expect<F>(mut self, expectation_fn: F) -> Self
    where
        F: FnOnce(ExpectationBuilder) -> ExpectationBuilder,
    {
        self.expectation = expectation_fn(ExpectationBuilder::new()).build();
        self
    }

    /// Compile the scenario and verify the expectation.
    ///
    /// Duplicate archetype ids surface as load issues, as they would when
    /// loading from disk.
    pub fn run(&self) -> ScenarioResult<CompileOutcome> {
        let template = self
            .template
            .as_ref()
            .ok_or_else(|| ScenarioError::missing_template(&self.name))?;

        let mut builder = RepositoryBuilder::new();
        for archetype in &self.archetypes {
            builder.add(archetype.clone(), None);
        }
        let (repo, load_issues) = builder.build();

        let outcome = Compiler::new(self.config.clone()).compile(template, &repo, load_issues);
        self.expectation.verify(&self.name, &outcome)?;
        Ok(outcome)
    }

    /// Get the scenario name.
    pub fn name(&self) -> &str {
        &self.name
    }
}
