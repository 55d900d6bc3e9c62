//! Unified column schema and the rows written against it.

use std::collections::{BTreeMap, BTreeSet};

/// Case-folds and trims a header name. No renaming or aliasing happens here.
pub fn normalize_column_name(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').trim().to_lowercase()
}

/// Sorted union of every normalized column seen for one record type, plus the
/// synthetic year column.
///
/// Built once before any row is emitted and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnifiedSchema {
    columns: Vec<String>,
    positions: BTreeMap<String, usize>,
    year_position: usize,
}

impl UnifiedSchema {
    /// Builds the schema from already collected header names.
    ///
    /// Names are normalized again here; blank names never become columns.
    pub fn new<I, S>(names: I, year_column: &str) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let year_column = normalize_column_name(year_column);
        let mut set: BTreeSet<String> = names
            .into_iter()
            .map(|name| normalize_column_name(name.as_ref()))
            .filter(|name| !name.is_empty())
            .collect();
        set.insert(year_column.clone());
        let columns: Vec<String> = set.into_iter().collect();
        let positions: BTreeMap<String, usize> = columns
            .iter()
            .enumerate()
            .map(|(idx, name)| (name.clone(), idx))
            .collect();
        let year_position = positions[&year_column];
        Self {
            columns,
            positions,
            year_position,
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Index of a normalized column name.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.positions.contains_key(name)
    }

    pub fn year_column(&self) -> &str {
        &self.columns[self.year_position]
    }

    pub fn year_position(&self) -> usize {
        self.year_position
    }

    /// A row with every column present and empty.
    pub fn empty_row(&self) -> NormalizedRow {
        NormalizedRow {
            values: vec![String::new(); self.columns.len()],
        }
    }
}

/// One value per [`UnifiedSchema`] column, in schema order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NormalizedRow {
    values: Vec<String>,
}

impl FromIterator<String> for NormalizedRow {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl NormalizedRow {
    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn value(&self, index: usize) -> &str {
        self.values.get(index).map(String::as_str).unwrap_or("")
    }

    pub fn set(&mut self, index: usize, value: String) {
        if let Some(slot) = self.values.get_mut(index) {
            *slot = value;
        }
    }

    /// Value of a column looked up by name; empty when the schema lacks it.
    pub fn get<'a>(&'a self, schema: &UnifiedSchema, name: &str) -> &'a str {
        schema
            .position(name)
            .map(|idx| self.value(idx))
            .unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_folds_case_and_trims() {
        assert_eq!(normalize_column_name("  DepReg "), "depreg");
        assert_eq!(normalize_column_name("\u{feff}AÑO"), "año");
        assert_eq!(normalize_column_name("Sexo Madre"), "sexo madre");
    }

    #[test]
    fn schema_is_sorted_union_with_year() {
        let schema = UnifiedSchema::new(["b", "A", "c", "a", " "], "año");
        assert_eq!(schema.columns(), &["a", "año", "b", "c"]);
        assert_eq!(schema.year_column(), "año");
        assert_eq!(schema.year_position(), 1);
        assert_eq!(schema.position("c"), Some(3));
        assert_eq!(schema.position("missing"), None);
    }

    #[test]
    fn empty_row_has_every_column() {
        let schema = UnifiedSchema::new(["x", "y"], "year");
        let mut row = schema.empty_row();
        assert_eq!(row.len(), 3);
        row.set(schema.position("y").unwrap(), "7".to_string());
        assert_eq!(row.get(&schema, "y"), "7");
        assert_eq!(row.get(&schema, "x"), "");
        assert_eq!(row.get(&schema, "nope"), "");
    }
}
