//! Storage infrastructure: configuration document persistence.
//!
//! Keeping file-format concerns here means the store and the merge rules do
//! not care whether a document is YAML or TOML.

pub mod document;
