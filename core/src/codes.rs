//! Diagnostic codes shared across OAM components.
//!
//! These constants keep code spelling consistent between the compiler and
//! the validators that inspect its output.

/// Input file could not be read.
pub const ADL005: &str = "ADL005";

/// Duplicate archetype id across repository files (first definition wins).
pub const AOM242: &str = "AOM242";

/// Missing specialisation parent.
pub const OPT700: &str = "OPT700";

/// Dependency cycle between archetypes.
pub const OPT705: &str = "OPT705";

/// Archetype slot has no matching archetype.
pub const OPT720: &str = "OPT720";

/// Specialisation flattening conflict.
pub const OPT730: &str = "OPT730";

/// OPT integrity violation (emitted by the integrity checker, never by the compiler).
pub const OPT750: &str = "OPT750";
