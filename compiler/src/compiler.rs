//! Compilation pipeline.

use crate::{
    assemble_opt, flatten_specialisation, resolve_slots, CompileResult, CompilerConfig,
    OperationalTemplate,
};
use oam_aom::{Archetype, Template};
use oam_core::{codes, has_errors, sort_issues, ArchetypeId, Issue};
use oam_graph::dependency_order;
use oam_repository::{load_from_dir, ArchetypeParser, Repository};
use std::collections::BTreeSet;
use std::path::Path;
use tracing::{debug, info, instrument, warn};

/// Result of one compilation: the template, if it could be built, and every
/// issue found on the way, sorted.
#[derive(Debug, Clone, PartialEq)]
pub struct CompileOutcome {
    pub opt: Option<OperationalTemplate>,
    pub issues: Vec<Issue>,
}

impl CompileOutcome {
    fn success(opt: OperationalTemplate, mut issues: Vec<Issue>) -> Self {
        sort_issues(&mut issues);
        Self {
            opt: Some(opt),
            issues,
        }
    }

    fn failure(stage: &str, mut issues: Vec<Issue>) -> Self {
        sort_issues(&mut issues);
        warn!(
            stage,
            errors = issues.iter().filter(|i| i.is_error()).count(),
            "compilation aborted"
        );
        Self { opt: None, issues }
    }

    pub fn is_success(&self) -> bool {
        self.opt.is_some()
    }

    pub fn has_errors(&self) -> bool {
        has_errors(&self.issues)
    }

    pub fn into_parts(self) -> (Option<OperationalTemplate>, Vec<Issue>) {
        (self.opt, self.issues)
    }
}

/// The Compiler turns a template plus an archetype repository into an
/// operational template.
///
/// It holds only configuration; one instance may compile any number of
/// templates, from any number of threads.
#[derive(Debug, Clone, Default)]
pub struct Compiler {
    config: CompilerConfig,
}

impl Compiler {
    /// Create a new compiler.
    pub fn new(config: CompilerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Load `dir` with `parser` and compile `template` against it.
    ///
    /// Only failures to scan the directory are errors; everything else,
    /// including unreadable files, is reported in the outcome's issues.
    pub fn compile_dir<P: ArchetypeParser + ?Sized>(
        &self,
        template: &Template,
        dir: impl AsRef<Path>,
        parser: &P,
    ) -> CompileResult<CompileOutcome> {
        let (repo, load_issues) = load_from_dir(dir, parser)?;
        Ok(self.compile(template, &repo, load_issues))
    }

    /// Compile `template` against an already loaded repository.
    ///
    /// `load_issues` are the diagnostics from loading `repo`; any ERROR
    /// among them aborts the compilation.
    #[instrument(skip_all, fields(template_id = %template.template_id))]
    pub fn compile(
        &self,
        template: &Template,
        repo: &Repository,
        load_issues: Vec<Issue>,
    ) -> CompileOutcome {
        let mut issues = load_issues;

        // Slots
        let mut selected = Vec::new();
        if self.config.resolve_slots {
            if let Some(definition) = &template.definition {
                let (ids, slot_issues) = resolve_slots(definition, repo);
                debug!(selected = ids.len(), "slots resolved");
                selected = ids;
                issues.extend(slot_issues);
            }
        }
        if has_errors(&issues) {
            return CompileOutcome::failure("load", issues);
        }

        // Scope
        let scope = self.scope(repo, &selected);
        debug!(scope = scope.len(), "scope selected");

        let missing = missing_parents(&scope, repo);
        if !missing.is_empty() {
            issues.extend(missing);
            return CompileOutcome::failure("dependencies", issues);
        }

        // Order
        let (order, order_issues) = dependency_order(scope.iter().copied());
        issues.extend(order_issues);
        if has_errors(&issues) {
            return CompileOutcome::failure("dependencies", issues);
        }
        debug!(components = order.len(), "dependency order computed");

        // Flatten
        let root = order.last().and_then(|id| repo.get(id.as_str()));
        let definition = match root {
            Some(archetype) if archetype.definition.is_some() => {
                match flatten_specialisation(archetype, repo) {
                    Ok(definition) => definition,
                    Err(conflicts) => {
                        issues.extend(conflicts);
                        return CompileOutcome::failure("flatten", issues);
                    }
                }
            }
            _ => None,
        };

        let root_id = root.map(|a| &a.archetype_id);
        let opt = assemble_opt(template, root_id, order.clone(), definition.as_ref());
        info!(
            root = root_id.map(ArchetypeId::as_str).unwrap_or(""),
            components = order.len(),
            "operational template compiled"
        );
        CompileOutcome::success(opt, issues)
    }

    /// Archetypes to compile: the parent closure of `selected`, or the
    /// whole repository when nothing was selected and the fallback is on.
    fn scope<'r>(&self, repo: &'r Repository, selected: &[ArchetypeId]) -> Vec<&'r Archetype> {
        if selected.is_empty() {
            return if self.config.full_repository_fallback {
                repo.archetypes().iter().collect()
            } else {
                Vec::new()
            };
        }

        let mut ids: BTreeSet<&ArchetypeId> = BTreeSet::new();
        let mut scope = Vec::new();
        for id in selected {
            let mut next = repo.get(id.as_str());
            while let Some(archetype) = next {
                if !ids.insert(&archetype.archetype_id) {
                    break;
                }
                scope.push(archetype);
                next = archetype
                    .parent_archetype_id
                    .as_ref()
                    .and_then(|parent| repo.get(parent.as_str()));
            }
        }
        scope
    }
}

/// OPT700 for each archetype in `scope` whose parent is not loaded.
fn missing_parents(scope: &[&Archetype], repo: &Repository) -> Vec<Issue> {
    scope
        .iter()
        .filter_map(|archetype| {
            let parent = archetype.parent_archetype_id.as_ref()?;
            if repo.contains(parent.as_str()) {
                return None;
            }
            Some(
                Issue::error(
                    codes::OPT700,
                    format!(
                        "Cannot resolve archetype dependency: missing parent '{}' referenced by '{}'",
                        parent, archetype.archetype_id
                    ),
                )
                .with_span(archetype.span.as_ref())
                .with_node_id(archetype.concept.as_deref()),
            )
        })
        .collect()
}

/// Compile `template` against `repo` with the default configuration.
pub fn compile(template: &Template, repo: &Repository) -> CompileOutcome {
    Compiler::default().compile(template, repo, Vec::new())
}

/// Load `dir` and compile `template` with the default configuration.
pub fn compile_opt<P: ArchetypeParser + ?Sized>(
    template: &Template,
    dir: impl AsRef<Path>,
    parser: &P,
) -> CompileResult<CompileOutcome> {
    Compiler::default().compile_dir(template, dir, parser)
}
