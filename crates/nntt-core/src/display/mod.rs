//! Presentation helpers for configurations.

pub mod table;
