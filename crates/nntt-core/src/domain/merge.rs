//! Merging a loaded document with the default schema.
//!
//! The merge walks the *schema*, not the document:
//!
//! ```text
//! for each (key, default) in schema:
//!     key missing in document          -> insert default (scalar or whole group)
//!     default is a group               -> for each (sub, sub_default):
//!                                             sub missing -> insert sub_default
//!                                             kinds differ -> TypeMismatch (stop)
//!     default is a scalar              -> keep document value, no check
//! ```
//!
//! Only sub-parameters of groups are kind-checked.  A top-level scalar
//! override of any kind is accepted as-is.
//!
//! The merge stops at the first mismatch and leaves the document partially
//! merged.  Callers that must not observe partial results should merge into a
//! scratch copy and only commit it on success.

use std::collections::btree_map::Entry;

use thiserror::Error;

use super::schema::DefaultSchema;
use super::value::{ParamGroup, ParamValue, ValueKind};

/// Errors raised while merging a document with the default schema.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MergeError {
    /// A sub-parameter in the document has a different kind than its default.
    #[error(
        "the type of parameter '{parameter}' in group '{group}' should be {expected}, but got {found}"
    )]
    TypeMismatch {
        group: String,
        parameter: String,
        expected: ValueKind,
        found: ValueKind,
    },

    /// The schema declares a group but the document holds a non-mapping value
    /// under that key.
    #[error("parameter '{group}' should be a mapping of sub-parameters, but got {found}")]
    GroupShape { group: String, found: ValueKind },
}

/// Fills missing entries of `document` from `schema` and validates group
/// sub-parameter kinds.
///
/// # Errors
///
/// Returns [`MergeError::TypeMismatch`] on the first sub-parameter whose kind
/// differs from its default, and [`MergeError::GroupShape`] when a group key
/// holds a non-mapping value.  Entries merged before the error remain in
/// `document`.
pub fn merge_defaults(document: &mut ParamGroup, schema: &DefaultSchema) -> Result<(), MergeError> {
    for (name, default) in schema.iter() {
        match document.entry(name.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(default.clone());
            }
            Entry::Occupied(mut slot) => {
                let ParamValue::Group(default_group) = default else {
                    continue;
                };
                let loaded = slot.get_mut();
                let found = loaded.kind();
                let loaded_group = loaded.as_group_mut().ok_or_else(|| MergeError::GroupShape {
                    group: name.clone(),
                    found,
                })?;
                merge_group(name, loaded_group, default_group)?;
            }
        }
    }
    Ok(())
}

fn merge_group(
    group_name: &str,
    loaded: &mut ParamGroup,
    defaults: &ParamGroup,
) -> Result<(), MergeError> {
    for (sub_name, sub_default) in defaults {
        match loaded.get(sub_name) {
            None => {
                loaded.insert(sub_name.clone(), sub_default.clone());
            }
            Some(value) if value.kind() != sub_default.kind() => {
                return Err(MergeError::TypeMismatch {
                    group: group_name.to_string(),
                    parameter: sub_name.clone(),
                    expected: sub_default.kind(),
                    found: value.kind(),
                });
            }
            Some(_) => {}
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn training_schema() -> DefaultSchema {
        let mut schema = DefaultSchema::new();
        schema.register("lr", 0.01, Some("train"));
        schema.register("momentum", 0.1, Some("train"));
        schema.register("name", "test_project", None);
        schema.register("version", "v0.1", None);
        schema
    }

    fn parse(yaml: &str) -> ParamGroup {
        serde_yaml::from_str(yaml).expect("valid yaml")
    }

    #[test]
    fn test_empty_document_receives_every_default() {
        // Arrange
        let schema = training_schema();
        let mut doc = ParamGroup::new();

        // Act
        merge_defaults(&mut doc, &schema).expect("merge");

        // Assert
        for (key, default) in schema.iter() {
            assert_eq!(doc.get(key), Some(default), "missing default for {key}");
        }
    }

    #[test]
    fn test_missing_sub_parameter_is_filled_from_default() {
        let schema = training_schema();
        let mut doc = parse("train:\n  lr: 0.5\n");

        merge_defaults(&mut doc, &schema).expect("merge");

        let train = &doc["train"];
        assert_eq!(train["lr"], ParamValue::Float(0.5));
        assert_eq!(train["momentum"], ParamValue::Float(0.1));
    }

    #[test]
    fn test_document_only_keys_are_kept() {
        let schema = training_schema();
        let mut doc = parse("extra: 3\ntrain:\n  warmup: 100\n");

        merge_defaults(&mut doc, &schema).expect("merge");

        assert_eq!(doc["extra"], ParamValue::Int(3));
        assert_eq!(doc["train"]["warmup"], ParamValue::Int(100));
    }

    #[test]
    fn test_sub_parameter_kind_mismatch_is_rejected() {
        // Arrange
        let schema = training_schema();
        let mut doc = parse("train:\n  lr: fast\n");

        // Act
        let err = merge_defaults(&mut doc, &schema).unwrap_err();

        // Assert
        assert_eq!(
            err,
            MergeError::TypeMismatch {
                group: "train".to_string(),
                parameter: "lr".to_string(),
                expected: ValueKind::Number,
                found: ValueKind::String,
            }
        );
    }

    #[test]
    fn test_integer_override_of_float_default_is_accepted() {
        let schema = training_schema();
        let mut doc = parse("train:\n  lr: 1\n");

        merge_defaults(&mut doc, &schema).expect("int and float are both numbers");

        assert_eq!(doc["train"]["lr"], ParamValue::Int(1));
    }

    #[test]
    fn test_top_level_scalar_override_is_not_kind_checked() {
        let schema = training_schema();
        let mut doc = parse("version: 2\n");

        merge_defaults(&mut doc, &schema).expect("top-level scalars are not validated");

        assert_eq!(doc["version"], ParamValue::Int(2));
    }

    #[test]
    fn test_group_key_holding_scalar_is_rejected() {
        let schema = training_schema();
        let mut doc = parse("train: 3\n");

        let err = merge_defaults(&mut doc, &schema).unwrap_err();

        assert_eq!(
            err,
            MergeError::GroupShape {
                group: "train".to_string(),
                found: ValueKind::Number,
            }
        );
    }

    #[test]
    fn test_mismatch_leaves_earlier_entries_merged() {
        // "name" sorts before "train", so it is merged before the failure.
        let schema = training_schema();
        let mut doc = parse("train:\n  momentum: high\n");

        assert!(merge_defaults(&mut doc, &schema).is_err());

        assert_eq!(doc["name"], ParamValue::from("test_project"));
        assert!(!doc.contains_key("version"));
    }

    #[test]
    fn test_mismatch_error_message_names_parameter_and_kinds() {
        let err = MergeError::TypeMismatch {
            group: "train".to_string(),
            parameter: "lr".to_string(),
            expected: ValueKind::Number,
            found: ValueKind::String,
        };
        assert_eq!(
            err.to_string(),
            "the type of parameter 'lr' in group 'train' should be number, but got string"
        );
    }
}
