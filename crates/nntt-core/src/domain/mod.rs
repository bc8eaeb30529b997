//! Configuration domain: values, the default schema, and merge rules.
//!
//! Nothing in this module touches the file system, so every rule here can be
//! tested with in-memory documents.

/// Merging a loaded document with the default schema.
pub mod merge;
/// The registered default parameters.
pub mod schema;
/// [`value::ParamValue`] and its kinds.
pub mod value;
