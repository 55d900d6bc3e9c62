//! Mandatory key positions and the single row rejection rule.

use vitals_model::{KeyFields, NormalizedRow, UnifiedSchema};

/// Schema positions of the key fields. `None` means the column never
/// appeared in any header of the record type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPositions {
    pub year: Option<usize>,
    pub primary: Option<usize>,
    pub secondary: Option<usize>,
}

impl KeyPositions {
    pub fn resolve(keys: &KeyFields, schema: &UnifiedSchema) -> Self {
        Self {
            year: schema.position(&keys.year),
            primary: schema.position(&keys.primary),
            secondary: schema.position(&keys.secondary),
        }
    }

    pub fn year_value<'a>(&self, row: &'a NormalizedRow) -> &'a str {
        self.year.map(|idx| row.value(idx)).unwrap_or("")
    }

    pub fn primary_value<'a>(&self, row: &'a NormalizedRow) -> &'a str {
        self.primary.map(|idx| row.value(idx)).unwrap_or("")
    }

    /// Trimmed secondary code, empty when absent.
    pub fn secondary_value<'a>(&self, row: &'a NormalizedRow) -> &'a str {
        self.secondary.map(|idx| row.value(idx).trim()).unwrap_or("")
    }
}

/// Which mandatory key was empty when a row got excluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exclusion {
    MissingYear,
    MissingPrimaryCode,
}

/// Returns the reason a row must be dropped, or `None` when it is accepted.
///
/// Only called after coercion, so unparseable keys are already blank.
pub fn check_mandatory_keys(row: &NormalizedRow, keys: &KeyPositions) -> Option<Exclusion> {
    if keys.year_value(row).is_empty() {
        return Some(Exclusion::MissingYear);
    }
    if keys.primary_value(row).is_empty() {
        return Some(Exclusion::MissingPrimaryCode);
    }
    None
}
