//! OAM Compiler
//!
//! Compile a template and its archetypes into an operational template.
//!
//! Responsibilities:
//! - Resolve the template's archetype slots against the repository
//! - Check specialisation dependencies (missing parents, cycles, order)
//! - Flatten the root archetype's specialisation chain
//! - Assemble the path-addressed operational template
//!
//! Problems with the input are returned as sorted `Issue`s. Only failures of
//! the environment (an unreadable archetype directory) are `CompileError`s.

mod assemble;
mod compiler;
mod config;
mod error;
mod flatten;
mod integrity;
mod opt;
mod path;
mod slots;

pub use assemble::{assemble_definition, assemble_opt};
pub use compiler::{compile, compile_opt, CompileOutcome, Compiler};
pub use config::{CompilerConfig, JsonFormat};
pub use error::{CompileError, CompileResult};
pub use flatten::{flatten_specialisation, merge_definitions, merge_objects};
pub use integrity::check_opt_integrity;
pub use opt::{
    OperationalTemplate, OptAttribute, OptComplexObject, OptObject, OptObjectRef,
    OptPrimitiveObject,
};
pub use slots::{pattern_matches, resolve_slots, slot_candidates};
