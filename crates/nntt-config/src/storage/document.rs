//! Reading and writing configuration documents.
//!
//! The format is picked from the file extension: `.toml` files are TOML,
//! everything else is YAML.  Both formats go through `serde`, so the same
//! [`ParamValue`] tree comes out regardless of the format on disk.

use std::path::Path;

use nntt_core::{ParamGroup, ParamValue};
use serde::Serialize;

use crate::error::ConfigError;

/// On-disk format of a configuration document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Yaml,
    Toml,
}

impl DocumentFormat {
    /// Chooses the format from the extension of `path` (case-insensitive).
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => DocumentFormat::Toml,
            _ => DocumentFormat::Yaml,
        }
    }
}

/// Reads the document at `path` and returns its root mapping.
///
/// An empty document (or one holding only `null`) yields an empty mapping.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] if the file cannot be read,
/// [`ConfigError::Encoding`] if it is not UTF-8,
/// [`ConfigError::ParseYaml`] / [`ConfigError::ParseToml`] if the content is
/// malformed, and [`ConfigError::NotAMapping`] if the root is a scalar or a
/// list.
pub fn read_document(path: &Path) -> Result<ParamGroup, ConfigError> {
    let bytes = std::fs::read(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let content = String::from_utf8(bytes).map_err(|source| ConfigError::Encoding {
        path: path.to_path_buf(),
        source,
    })?;
    if content.trim().is_empty() {
        return Ok(ParamGroup::new());
    }

    let root: ParamValue = match DocumentFormat::from_path(path) {
        DocumentFormat::Yaml => {
            serde_yaml::from_str(&content).map_err(|source| ConfigError::ParseYaml {
                path: path.to_path_buf(),
                source,
            })?
        }
        DocumentFormat::Toml => {
            toml::from_str(&content).map_err(|source| ConfigError::ParseToml {
                path: path.to_path_buf(),
                source,
            })?
        }
    };

    match root {
        ParamValue::Group(group) => Ok(group),
        ParamValue::Null => Ok(ParamGroup::new()),
        other => Err(ConfigError::NotAMapping {
            path: path.to_path_buf(),
            found: other.kind(),
        }),
    }
}

/// Serializes `value` into the document at `path`, replacing any existing
/// file.
///
/// # Errors
///
/// Returns [`ConfigError::SerializeYaml`] / [`ConfigError::SerializeToml`] if
/// the value cannot be represented in the target format, or
/// [`ConfigError::Io`] if the file cannot be written.
pub fn write_document<T: Serialize>(path: &Path, value: &T) -> Result<(), ConfigError> {
    let content = match DocumentFormat::from_path(path) {
        DocumentFormat::Yaml => serde_yaml::to_string(value).map_err(ConfigError::SerializeYaml)?,
        DocumentFormat::Toml => toml::to_string_pretty(value)?,
    };
    std::fs::write(path, content).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigErrorKind;
    use nntt_core::ValueKind;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(DocumentFormat::from_path(Path::new("a.yaml")), DocumentFormat::Yaml);
        assert_eq!(DocumentFormat::from_path(Path::new("a.yml")), DocumentFormat::Yaml);
        assert_eq!(DocumentFormat::from_path(Path::new("a.TOML")), DocumentFormat::Toml);
        assert_eq!(DocumentFormat::from_path(Path::new("noext")), DocumentFormat::Yaml);
    }

    #[test]
    fn test_read_yaml_mapping() {
        // Arrange
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "cfg.yaml", "name: demo\ntrain:\n  lr: 0.01\n");

        // Act
        let doc = read_document(&path).expect("read");

        // Assert
        assert_eq!(doc["name"], ParamValue::from("demo"));
        assert_eq!(doc["train"]["lr"], ParamValue::Float(0.01));
    }

    #[test]
    fn test_read_toml_mapping() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "cfg.toml", "name = \"demo\"\n\n[train]\nlr = 0.01\nepochs = 3\n");

        let doc = read_document(&path).expect("read");

        assert_eq!(doc["name"], ParamValue::from("demo"));
        assert_eq!(doc["train"]["epochs"], ParamValue::Int(3));
    }

    #[test]
    fn test_read_toml_datetime_as_string() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "cfg.toml", "started = 1979-05-27T07:32:00Z\n");

        let doc = read_document(&path).expect("read");

        assert_eq!(doc["started"], ParamValue::from("1979-05-27T07:32:00Z"));
    }

    #[test]
    fn test_read_empty_and_comment_only_documents_as_empty_mapping() {
        let dir = TempDir::new().unwrap();
        let empty = write(&dir, "empty.yaml", "");
        let comments = write(&dir, "comments.yaml", "# nothing here\n");

        assert!(read_document(&empty).expect("empty").is_empty());
        assert!(read_document(&comments).expect("comments").is_empty());
    }

    #[test]
    fn test_read_scalar_root_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "list.yaml", "- a\n- b\n");

        let err = read_document(&path).unwrap_err();

        assert!(matches!(
            err,
            ConfigError::NotAMapping {
                found: ValueKind::List,
                ..
            }
        ));
    }

    #[test]
    fn test_read_malformed_yaml_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "bad.yaml", "train: [unclosed\n");

        let err = read_document(&path).unwrap_err();

        assert_eq!(err.kind(), ConfigErrorKind::Parse);
    }

    #[test]
    fn test_read_non_utf8_document_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("latin1.yaml");
        std::fs::write(&path, b"name: caf\xe9\n").unwrap();

        let err = read_document(&path).unwrap_err();

        assert!(matches!(err, ConfigError::Encoding { .. }));
        assert_eq!(err.kind(), ConfigErrorKind::Parse);
    }

    #[test]
    fn test_write_null_to_toml_fails_to_serialize() {
        let dir = TempDir::new().unwrap();
        let mut group = ParamGroup::new();
        group.insert("missing".to_string(), ParamValue::Null);

        let err = write_document(&dir.path().join("out.toml"), &group).unwrap_err();

        assert_eq!(err.kind(), ConfigErrorKind::Serialize);
    }

    #[test]
    fn test_write_then_read_toml_keeps_groups_and_scalars() {
        // Arrange
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.toml");
        let mut train = ParamGroup::new();
        train.insert("lr".to_string(), ParamValue::Float(0.01));
        let mut group = ParamGroup::new();
        group.insert("name".to_string(), ParamValue::from("demo"));
        group.insert("train".to_string(), ParamValue::Group(train));
        group.insert("version".to_string(), ParamValue::from("v0.1"));

        // Act
        write_document(&path, &group).expect("write");
        let restored = read_document(&path).expect("read");

        // Assert
        assert_eq!(restored, group);
    }
}
