//! Plain-text parameter tables.
//!
//! Renders rows of `(name, value)` pairs as a bordered table with centred
//! cells:
//!
//! ```text
//! +---------------+----------------+
//! | ParameterName | ParameterValue |
//! +---------------+----------------+
//! |      lr       |      0.01      |
//! +---------------+----------------+
//! ```

use std::fmt;

use crate::domain::value::{ParamGroup, ParamValue};

const NAME_HEADER: &str = "ParameterName";
const VALUE_HEADER: &str = "ParameterValue";

/// Title of the table that collects every top-level scalar.
pub const GLOBAL_TABLE_TITLE: &str = "Global Parameters";

/// One titled table of parameter rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterTable {
    pub title: String,
    pub rows: Vec<(String, String)>,
}

impl ParameterTable {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            rows: Vec::new(),
        }
    }

    /// Appends a row.  Line breaks in either cell are escaped so every row
    /// stays on one line.
    pub fn add_row(&mut self, name: impl Into<String>, value: &ParamValue) {
        self.rows
            .push((single_line(&name.into()), single_line(&value.to_string())));
    }
}

fn single_line(cell: &str) -> String {
    cell.replace('\r', "\\r").replace('\n', "\\n")
}

/// Splits a configuration into display tables.
///
/// The first table is always [`GLOBAL_TABLE_TITLE`] and holds every
/// top-level value that is not a group (it may be empty).  Each top-level
/// group then gets its own table, titled with the group name.
pub fn build_parameter_tables(config: &ParamGroup) -> Vec<ParameterTable> {
    let mut tables = vec![ParameterTable::new(GLOBAL_TABLE_TITLE)];
    for (name, value) in config {
        match value {
            ParamValue::Group(group) => {
                let mut table = ParameterTable::new(name.as_str());
                for (sub_name, sub_value) in group {
                    table.add_row(sub_name.as_str(), sub_value);
                }
                tables.push(table);
            }
            scalar => tables[0].add_row(name.as_str(), scalar),
        }
    }
    tables
}

impl fmt::Display for ParameterTable {
    /// Writes the table body only; the title is left to the caller.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name_width = self
            .rows
            .iter()
            .map(|(name, _)| name.chars().count())
            .chain(std::iter::once(NAME_HEADER.len()))
            .max()
            .unwrap_or(0);
        let value_width = self
            .rows
            .iter()
            .map(|(_, value)| value.chars().count())
            .chain(std::iter::once(VALUE_HEADER.len()))
            .max()
            .unwrap_or(0);

        let border = format!(
            "+{}+{}+",
            "-".repeat(name_width + 2),
            "-".repeat(value_width + 2)
        );

        writeln!(f, "{border}")?;
        writeln!(
            f,
            "| {NAME_HEADER:^name_width$} | {VALUE_HEADER:^value_width$} |"
        )?;
        writeln!(f, "{border}")?;
        for (name, value) in &self.rows {
            writeln!(f, "| {name:^name_width$} | {value:^value_width$} |")?;
        }
        write!(f, "{border}")
    }
}
