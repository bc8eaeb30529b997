//! Registered default parameters.
//!
//! The schema is built up by registration calls before any document is
//! loaded.  Each top-level entry is either a scalar default or a group of
//! sub-parameter defaults.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::value::{ParamGroup, ParamValue};

/// The set of expected parameters and their fallback values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DefaultSchema {
    entries: ParamGroup,
}

impl DefaultSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a default for `name`.
    ///
    /// With `group = None` the default is stored at the top level.  Otherwise
    /// it is stored inside the group, creating the group on first use.  The
    /// type of `default` is not validated.
    ///
    /// If `group` names an existing *scalar* default, that scalar is replaced
    /// by a new group.
    pub fn register(&mut self, name: &str, default: impl Into<ParamValue>, group: Option<&str>) {
        let default = default.into();
        match group {
            None => {
                debug!(parameter = name, %default, "registered default");
                self.entries.insert(name.to_string(), default);
            }
            Some(group_name) => {
                let slot = self
                    .entries
                    .entry(group_name.to_string())
                    .or_insert_with(ParamValue::empty_group);
                if !slot.is_group() {
                    warn!(
                        group = group_name,
                        replaced = %slot,
                        "scalar default replaced by a parameter group"
                    );
                    *slot = ParamValue::empty_group();
                }
                if let Some(sub) = slot.as_group_mut() {
                    debug!(group = group_name, parameter = name, %default, "registered default");
                    sub.insert(name.to_string(), default);
                }
            }
        }
    }

    /// Returns the default registered at the top level under `name`.
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.entries.get(name)
    }

    /// Iterates over top-level defaults in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &ParamValue)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the underlying mapping.
    pub fn as_group(&self) -> &ParamGroup {
        &self.entries
    }
}
