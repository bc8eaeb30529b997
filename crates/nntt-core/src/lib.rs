//! # nntt-core
//!
//! Shared domain types for NN-Training-Template configuration: parameter
//! values, the registered default schema, the default-merge rules, and the
//! plain-text parameter tables used to display a configuration.
//!
//! This crate does no I/O.  Reading and writing configuration documents lives
//! in `nntt-config`; this crate only decides what a merged configuration
//! looks like.
//!
//! # Architecture overview (for beginners)
//!
//! A training run is configured by a YAML document such as:
//!
//! ```text
//! name: my_project
//! train:
//!   lr: 0.01
//!   momentum: 0.9
//! ```
//!
//! Top-level keys are either plain values (`name`) or *groups* of related
//! sub-parameters (`train`).  Before loading, the program registers a
//! **default schema** listing every parameter it expects.  Loading then
//! **merges** the document with that schema:
//!
//! - **`domain`** – [`ParamValue`], [`DefaultSchema`], and [`merge_defaults`].
//! - **`display`** – [`ParameterTable`] rendering for a merged configuration.

pub mod display;
pub mod domain;

pub use display::table::{build_parameter_tables, ParameterTable, GLOBAL_TABLE_TITLE};
pub use domain::merge::{merge_defaults, MergeError};
pub use domain::schema::DefaultSchema;
pub use domain::value::{ParamGroup, ParamValue, ValueKind};
