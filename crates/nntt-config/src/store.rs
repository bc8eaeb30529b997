//! The configuration store: default schema + current configuration.
//!
//! A [`ConfigStore`] is tied to one storage directory.  The typical life of a
//! store in a training script:
//!
//! ```text
//! ConfigStore::new("./config")            -- directory must exist
//!  └─ register_parameter(..)  x N         -- build the default schema
//!  └─ load("experiment.yaml")             -- parse + merge defaults
//!  └─ get / set                           -- read and tweak parameters
//!  └─ show_parameters()                   -- print the merged tables
//! ```
//!
//! `generate_template` writes the *default schema* (not the loaded
//! configuration) so a new experiment file can be started from it.

use std::path::{Path, PathBuf};

use nntt_core::{
    build_parameter_tables, merge_defaults, DefaultSchema, ParamGroup, ParameterTable, ParamValue,
};
use tracing::{debug, info};

use crate::error::ConfigError;
use crate::storage::document::{read_document, write_document};

/// Storage directory used when none is given.
pub const DEFAULT_CONFIG_DIR: &str = "./config";

/// Document name used by [`ConfigStore::generate_template`] callers that do
/// not pick one.
pub const DEFAULT_TEMPLATE_NAME: &str = "template_cfg.yaml";

const BANNER_RULE: &str = "*-*-*-*-*-*-*-*-*-*-*";
const BANNER_TITLE: &str = "|  Parameter Table  |";

/// Holds a default schema and the current configuration for one storage
/// directory.
#[derive(Debug)]
pub struct ConfigStore {
    config_dir: PathBuf,
    config: ParamGroup,
    defaults: DefaultSchema,
}

impl ConfigStore {
    /// Creates a store backed by `config_dir`.
    ///
    /// The directory is checked here only; later calls assume it still
    /// exists.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::DirectoryNotFound`] if `config_dir` does not
    /// exist.
    pub fn new(config_dir: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let config_dir = config_dir.into();
        if !config_dir.exists() {
            return Err(ConfigError::DirectoryNotFound { path: config_dir });
        }
        Ok(Self {
            config_dir,
            config: ParamGroup::new(),
            defaults: DefaultSchema::new(),
        })
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// The registered default schema.
    pub fn defaults(&self) -> &DefaultSchema {
        &self.defaults
    }

    /// The current configuration.
    pub fn config(&self) -> &ParamGroup {
        &self.config
    }

    /// Registers a default value, optionally inside a named group.
    ///
    /// See [`DefaultSchema::register`].
    pub fn register_parameter(
        &mut self,
        name: &str,
        default: impl Into<ParamValue>,
        group: Option<&str>,
    ) {
        self.defaults.register(name, default, group);
    }

    /// Loads `document_name` from the storage directory and merges it with
    /// the default schema.
    ///
    /// On success the current configuration is replaced by the merged
    /// document.  On failure it is left exactly as it was.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::DocumentNotFound`] if the document does not exist.
    /// - [`ConfigError::NotAFile`] if the name resolves to a directory or
    ///   other non-file.
    /// - [`ConfigError::Merge`] if a group sub-parameter has the wrong kind or
    ///   a group key holds a scalar.
    /// - Parse and I/O errors from reading the document.
    pub fn load(&mut self, document_name: &str) -> Result<(), ConfigError> {
        let path = self.config_dir.join(document_name);
        if !path.exists() {
            return Err(ConfigError::DocumentNotFound { path });
        }
        if !path.is_file() {
            return Err(ConfigError::NotAFile { path });
        }

        let mut document = read_document(&path)?;
        merge_defaults(&mut document, &self.defaults)?;

        info!(
            path = %path.display(),
            parameters = document.len(),
            "configuration loaded"
        );
        self.config = document;
        Ok(())
    }

    /// Returns the value at `key`, creating an empty group there first if the
    /// key is missing.
    ///
    /// This allows chained writes into a group that was never registered or
    /// loaded:
    ///
    /// ```ignore
    /// store.get("train")["lr"] = 0.01.into();
    /// ```
    pub fn get(&mut self, key: &str) -> &mut ParamValue {
        self.config
            .entry(key.to_string())
            .or_insert_with(ParamValue::empty_group)
    }

    /// Returns the value at `key` without creating it.
    pub fn value(&self, key: &str) -> Option<&ParamValue> {
        self.config.get(key)
    }

    /// Overwrites `key` with `value`.  No schema validation is applied.
    pub fn set(&mut self, key: &str, value: impl Into<ParamValue>) {
        let value = value.into();
        debug!(parameter = key, %value, "parameter set");
        self.config.insert(key.to_string(), value);
    }

    /// Writes the default schema to `document_name` in the storage
    /// directory, replacing any existing file of that name.
    ///
    /// Returns the path that was written.
    ///
    /// # Errors
    ///
    /// Returns serialization or I/O errors from writing the document.
    pub fn generate_template(&self, document_name: &str) -> Result<PathBuf, ConfigError> {
        let path = self.config_dir.join(document_name);
        info!(path = %path.display(), "saving default config template");
        write_document(&path, &self.defaults)?;
        Ok(path)
    }

    /// Splits the current configuration into display tables.
    pub fn parameter_tables(&self) -> Vec<ParameterTable> {
        build_parameter_tables(&self.config)
    }

    /// Renders the banner and every parameter table as one string.
    pub fn render_parameters(&self) -> String {
        let mut out = format!("{BANNER_RULE}\n{BANNER_TITLE}\n{BANNER_RULE}\n");
        for table in self.parameter_tables() {
            out.push_str(&format!("=> {}\n{table}\n", table.title));
        }
        out
    }

    /// Prints the current configuration to stdout.
    pub fn show_parameters(&self) {
        print!("{}", self.render_parameters());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> ConfigStore {
        ConfigStore::new(dir.path()).expect("temp dir exists")
    }

    #[test]
    fn test_new_with_missing_directory_is_not_found() {
        // Arrange
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("does-not-exist");

        // Act
        let err = ConfigStore::new(&missing).unwrap_err();

        // Assert
        assert!(err.is_not_found());
        assert!(matches!(err, ConfigError::DirectoryNotFound { .. }));
    }

    #[test]
    fn test_get_unknown_key_creates_empty_group() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);

        let value = store.get("model");

        assert_eq!(*value, ParamValue::empty_group());
        assert_eq!(store.value("model"), Some(&ParamValue::empty_group()));
    }

    #[test]
    fn test_get_auto_created_group_is_persisted() {
        // Arrange
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);

        // Act: write through the first handle, read through a second call
        store.get("model")["layers"] = 4.into();
        let again = store.get("model");

        // Assert
        assert_eq!(again["layers"], ParamValue::Int(4));
    }

    #[test]
    fn test_get_existing_key_does_not_replace_it() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.set("seed", 42);

        assert_eq!(*store.get("seed"), ParamValue::Int(42));
    }

    #[test]
    fn test_set_then_get_returns_value_exactly() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.register_parameter("lr", 0.01, Some("train"));

        // Overwrites even a registered group with a scalar; no validation.
        store.set("train", "disabled");

        assert_eq!(*store.get("train"), ParamValue::from("disabled"));
    }

    #[test]
    fn test_value_does_not_auto_create() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        assert_eq!(store.value("missing"), None);
        assert!(store.config().is_empty());
    }

    #[test]
    fn test_register_parameter_does_not_touch_current_config() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);

        store.register_parameter("name", "demo", None);

        assert!(store.config().is_empty());
        assert_eq!(store.defaults().get("name"), Some(&ParamValue::from("demo")));
    }

    #[test]
    fn test_render_parameters_lists_global_then_groups() {
        // Arrange
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.set("name", "demo");
        store.get("train")["lr"] = 0.01.into();

        // Act
        let rendered = store.render_parameters();

        // Assert
        let global = rendered.find("=> Global Parameters").expect("global table");
        let train = rendered.find("=> train").expect("train table");
        assert!(rendered.starts_with(BANNER_RULE));
        assert!(global < train);
        assert!(rendered.contains("demo"));
        assert!(rendered.contains("0.01"));
    }
}
