//! Per record type quality counters.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::ids::{RecordTypeName, Year, YearRange};

/// Counters accumulated while one record type is consolidated.
///
/// Every input row lands in exactly one of `rows_output` or
/// `rows_excluded_missing_depreg`. Duplicates are written and counted on top.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CleanStats {
    pub record_type: RecordTypeName,
    pub files_considered: u64,
    pub files_skipped: u64,
    pub rows_input: u64,
    pub rows_output: u64,
    pub rows_excluded_missing_depreg: u64,
    pub duplicates_exact: u64,
    pub duplicates_operational: u64,
    pub nulls: BTreeMap<String, u64>,
    pub parse_errors: BTreeMap<String, u64>,
    pub year_rows: BTreeMap<Year, u64>,
    /// Header width of each year file that contributed to the schema.
    pub header_columns: BTreeMap<Year, usize>,
    /// Non-empty values per output column across written rows.
    pub filled: BTreeMap<String, u64>,
}

impl CleanStats {
    pub fn new(record_type: RecordTypeName) -> Self {
        Self {
            record_type,
            files_considered: 0,
            files_skipped: 0,
            rows_input: 0,
            rows_output: 0,
            rows_excluded_missing_depreg: 0,
            duplicates_exact: 0,
            duplicates_operational: 0,
            nulls: BTreeMap::new(),
            parse_errors: BTreeMap::new(),
            year_rows: BTreeMap::new(),
            header_columns: BTreeMap::new(),
            filled: BTreeMap::new(),
        }
    }

    pub fn record_null(&mut self, field: &str) {
        *self.nulls.entry(field.to_string()).or_default() += 1;
    }

    pub fn record_parse_error(&mut self, field: &str) {
        *self.parse_errors.entry(field.to_string()).or_default() += 1;
    }

    pub fn record_written(&mut self, year: Year) {
        self.rows_output += 1;
        *self.year_rows.entry(year).or_default() += 1;
    }

    pub fn record_filled(&mut self, column: &str) {
        *self.filled.entry(column.to_string()).or_default() += 1;
    }

    pub fn null_count(&self, field: &str) -> u64 {
        self.nulls.get(field).copied().unwrap_or(0)
    }

    pub fn parse_error_count(&self, field: &str) -> u64 {
        self.parse_errors.get(field).copied().unwrap_or(0)
    }

    pub fn rows_for_year(&self, year: Year) -> u64 {
        self.year_rows.get(&year).copied().unwrap_or(0)
    }

    /// Written rows per year for every year of `range`, zeros included.
    pub fn coverage(&self, range: &YearRange) -> Vec<(Year, u64)> {
        range
            .iter()
            .map(|year| (year, self.rows_for_year(year)))
            .collect()
    }

    /// Most complete columns first, ties broken by name.
    pub fn completeness(&self, limit: usize) -> Vec<(&str, u64)> {
        let mut entries: Vec<(&str, u64)> = self
            .filled
            .iter()
            .map(|(column, count)| (column.as_str(), *count))
            .collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        entries.truncate(limit);
        entries
    }
}
