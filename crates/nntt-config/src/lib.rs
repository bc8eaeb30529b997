//! # nntt-config
//!
//! Directory-backed configuration store for NN-Training-Template.
//!
//! [`ConfigStore`] keeps a registered default schema and the current
//! configuration.  Loading a document fills in every missing default and
//! rejects group sub-parameters whose kind differs from the registered
//! default.
//!
//! # Usage example
//!
//! ```no_run
//! use nntt_config::ConfigStore;
//!
//! # fn main() -> Result<(), nntt_config::ConfigError> {
//! let mut store = ConfigStore::new("./config")?;
//! store.register_parameter("lr", 0.01, Some("train"));
//! store.register_parameter("name", "test_project", None);
//!
//! store.load("experiment.yaml")?;
//! let lr = store.get("train")["lr"].as_f64();
//! store.show_parameters();
//! # let _ = lr;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod storage;
pub mod store;

pub use error::{ConfigError, ConfigErrorKind};
pub use storage::document::DocumentFormat;
pub use store::{ConfigStore, DEFAULT_CONFIG_DIR, DEFAULT_TEMPLATE_NAME};

pub use nntt_core::{DefaultSchema, ParamGroup, ParamValue, ValueKind};
