//! Canonical Time-Indexed Table

use serde::Serialize;

/// A single sensor series within the canonical table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    /// Sensor name as discovered in the upload
    pub(crate) name: String,
    /// One value per table row, gap-free after fill
    pub(crate) values: Vec<f64>,
}

/// The normalizer output: ascending unique `seconds` row keys plus one
/// gap-free `f64` series per discovered sensor.
///
/// Column order is first-discovery order from the upload.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CanonicalTable {
    seconds: Vec<f64>,
    columns: Vec<Column>,
}

impl CanonicalTable {
    pub(crate) fn from_parts(seconds: Vec<f64>, columns: Vec<Column>) -> Self {
        debug_assert!(columns.iter().all(|c| c.values.len() == seconds.len()));
        Self { seconds, columns }
    }

    /// Row keys: elapsed time in seconds, strictly increasing
    pub fn seconds(&self) -> &[f64] {
        &self.seconds
    }

    /// Names of all sensor columns, in discovery order
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Values for one sensor, if present
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
    }

    /// Whether a sensor column exists
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    /// Number of rows
    pub fn n_rows(&self) -> usize {
        self.seconds.len()
    }

    /// Number of sensor columns
    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    /// True when the table holds no rows
    pub fn is_empty(&self) -> bool {
        self.seconds.is_empty()
    }
}
