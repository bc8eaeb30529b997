//! nntt-cli library entry point.
//!
//! Re-exports the argument definitions and command handlers so that
//! integration tests in `tests/` and the binary entry point in `main.rs`
//! share the same module tree.

/// Command-line argument definitions.
pub mod cli;
/// Command handlers.
pub mod commands;
/// The training template's default parameter schema.
pub mod defaults;

pub use cli::{Cli, Command};
pub use commands::run;
