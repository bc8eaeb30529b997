//! Error type for configuration store operations.

use std::path::PathBuf;

use nntt_core::{MergeError, ValueKind};
use thiserror::Error;

/// Broad category of a [`ConfigError`].
///
/// Callers that only care whether something was missing or had the wrong
/// shape can match on this instead of on every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigErrorKind {
    /// The storage directory or a requested document does not exist.
    NotFound,
    /// A path or value has the wrong kind (directory instead of file,
    /// string instead of number, ...).
    TypeKind,
    /// Any other file-system failure.
    Io,
    /// The document could not be parsed.
    Parse,
    /// The schema could not be written in the target format.
    Serialize,
}

/// Error type for configuration store operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The storage directory given at construction does not exist.
    #[error("target directory ({}) cannot be found", .path.display())]
    DirectoryNotFound { path: PathBuf },

    /// The requested document does not exist inside the storage directory.
    #[error("target file ({}) cannot be found", .path.display())]
    DocumentNotFound { path: PathBuf },

    /// The requested document name resolves to something other than a regular
    /// file (typically a directory).
    #[error("target path ({}) is not a file", .path.display())]
    NotAFile { path: PathBuf },

    /// The document parsed, but its root is not a mapping.
    #[error("document {} must hold a mapping at its root, but got {found}", .path.display())]
    NotAMapping { path: PathBuf, found: ValueKind },

    /// A loaded value does not match the kind of its registered default.
    #[error(transparent)]
    Merge(#[from] MergeError),

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document bytes are not valid UTF-8.
    #[error("config document {} is not valid UTF-8: {source}", .path.display())]
    Encoding {
        path: PathBuf,
        #[source]
        source: std::string::FromUtf8Error,
    },

    /// The YAML content could not be parsed.
    #[error("failed to parse config YAML {}: {source}", .path.display())]
    ParseYaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML {}: {source}", .path.display())]
    ParseToml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// The schema could not be serialized to YAML.
    #[error("failed to serialize config YAML: {0}")]
    SerializeYaml(#[source] serde_yaml::Error),

    /// The schema could not be serialized to TOML (TOML has no `null`).
    #[error("failed to serialize config TOML: {0}")]
    SerializeToml(#[from] toml::ser::Error),
}

impl ConfigError {
    /// Returns the broad category of this error.
    pub fn kind(&self) -> ConfigErrorKind {
        match self {
            ConfigError::DirectoryNotFound { .. } | ConfigError::DocumentNotFound { .. } => {
                ConfigErrorKind::NotFound
            }
            ConfigError::NotAFile { .. }
            | ConfigError::NotAMapping { .. }
            | ConfigError::Merge(_) => ConfigErrorKind::TypeKind,
            ConfigError::Io { .. } => ConfigErrorKind::Io,
            ConfigError::Encoding { .. }
            | ConfigError::ParseYaml { .. }
            | ConfigError::ParseToml { .. } => ConfigErrorKind::Parse,
            ConfigError::SerializeYaml(_) | ConfigError::SerializeToml(_) => {
                ConfigErrorKind::Serialize
            }
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ConfigErrorKind::NotFound
    }

    pub fn is_type_kind(&self) -> bool {
        self.kind() == ConfigErrorKind::TypeKind
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_paths_are_not_found() {
        let dir = ConfigError::DirectoryNotFound {
            path: PathBuf::from("/no/such/dir"),
        };
        let doc = ConfigError::DocumentNotFound {
            path: PathBuf::from("/no/such/dir/a.yaml"),
        };
        assert!(dir.is_not_found());
        assert!(doc.is_not_found());
        assert!(!doc.is_type_kind());
    }

    #[test]
    fn test_merge_errors_are_type_kind() {
        let err = ConfigError::from(MergeError::GroupShape {
            group: "train".to_string(),
            found: ValueKind::String,
        });
        assert_eq!(err.kind(), ConfigErrorKind::TypeKind);
    }

    #[test]
    fn test_not_a_file_message_includes_path() {
        let err = ConfigError::NotAFile {
            path: PathBuf::from("config/sub"),
        };
        assert_eq!(err.to_string(), "target path (config/sub) is not a file");
        assert!(err.is_type_kind());
    }

    #[test]
    fn test_merge_error_display_is_transparent() {
        let inner = MergeError::TypeMismatch {
            group: "train".to_string(),
            parameter: "lr".to_string(),
            expected: ValueKind::Number,
            found: ValueKind::Boolean,
        };
        let err = ConfigError::from(inner.clone());
        assert_eq!(err.to_string(), inner.to_string());
    }
}
