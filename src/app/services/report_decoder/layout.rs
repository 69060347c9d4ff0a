//! Column layouts for report data rows
//!
//! Report files either use the fixed legacy layout (format version <= 3)
//! or carry an explicit list of column names (versions 4 and 5). Either way
//! the result is a name-to-index map used to pick values out of parsed rows.

use std::collections::HashMap;

use crate::constants::{LEGACY_SURFACE_LAYOUT, MISSING};

/// Name-to-column-index mapping for one block of data rows
#[derive(Debug, Clone, Default)]
pub struct ColumnLayout {
    name_to_index: HashMap<String, usize>,
}

impl ColumnLayout {
    /// Build a layout from an ordered list of column names
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Self {
        let name_to_index = names
            .iter()
            .enumerate()
            .map(|(index, name)| (name.as_ref().to_string(), index))
            .collect();
        Self { name_to_index }
    }

    /// The fixed surface layout used by format versions <= 3
    pub fn legacy_surface() -> Self {
        Self::from_names(LEGACY_SURFACE_LAYOUT)
    }

    /// An empty layout: every lookup yields the missing sentinel
    pub fn empty() -> Self {
        Self::default()
    }

    /// Index of a named column, if present
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.name_to_index.get(name).copied()
    }

    /// Whether the layout names this column
    pub fn has_column(&self, name: &str) -> bool {
        self.name_to_index.contains_key(name)
    }

    /// Value of a named column in a parsed row
    ///
    /// Returns the missing sentinel when the column is absent from the
    /// layout or the row is too short.
    pub fn value(&self, row: &[f64], name: &str) -> f64 {
        self.index_of(name)
            .and_then(|index| row.get(index).copied())
            .unwrap_or(MISSING)
    }

    /// Number of named columns
    pub fn len(&self) -> usize {
        self.name_to_index.len()
    }

    /// Whether the layout names no columns at all
    pub fn is_empty(&self) -> bool {
        self.name_to_index.is_empty()
    }
}
