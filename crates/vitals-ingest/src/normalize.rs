//! Mapping raw records onto the unified schema.

use std::borrow::Cow;

use vitals_model::{NormalizedRow, UnifiedSchema, Year, normalize_column_name};

/// Field access over one raw input record.
pub trait RawRecord {
    fn field(&self, index: usize) -> Option<Cow<'_, str>>;
}

impl RawRecord for csv::ByteRecord {
    fn field(&self, index: usize) -> Option<Cow<'_, str>> {
        self.get(index).map(String::from_utf8_lossy)
    }
}

impl RawRecord for csv::StringRecord {
    fn field(&self, index: usize) -> Option<Cow<'_, str>> {
        self.get(index).map(Cow::Borrowed)
    }
}

impl<S: AsRef<str>> RawRecord for [S] {
    fn field(&self, index: usize) -> Option<Cow<'_, str>> {
        self.get(index).map(|value| Cow::Borrowed(value.as_ref()))
    }
}

/// Precomputed lookup from each schema column to its position in one file's
/// raw header.
///
/// Built once per file; when a normalized name occurs twice in the raw
/// header, the first occurrence wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderIndex {
    sources: Vec<Option<usize>>,
    year_position: usize,
}

impl HeaderIndex {
    pub fn new<S: AsRef<str>>(raw_headers: &[S], schema: &UnifiedSchema) -> Self {
        let mut sources = vec![None; schema.len()];
        for (raw_idx, raw) in raw_headers.iter().enumerate() {
            let name = normalize_column_name(raw.as_ref());
            if name.is_empty() {
                continue;
            }
            if let Some(slot) = schema.position(&name).and_then(|pos| sources.get_mut(pos))
                && slot.is_none()
            {
                *slot = Some(raw_idx);
            }
        }
        Self {
            sources,
            year_position: schema.year_position(),
        }
    }

    /// Number of schema columns this file provides a value for.
    pub fn matched_columns(&self) -> usize {
        self.sources.iter().filter(|source| source.is_some()).count()
    }

    /// Builds the normalized row for one raw record.
    ///
    /// Values are trimmed, absent columns are empty and the year column is
    /// always the file's year.
    pub fn normalize<R: RawRecord + ?Sized>(&self, record: &R, year: Year) -> NormalizedRow {
        self.sources
            .iter()
            .enumerate()
            .map(|(idx, source)| {
                if idx == self.year_position {
                    return year.to_string();
                }
                source
                    .and_then(|raw_idx| record.field(raw_idx))
                    .map(|value| value.trim().to_string())
                    .unwrap_or_default()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_columns_are_filled_empty() {
        let schema = UnifiedSchema::new(["a", "b", "c"], "year");
        let index = HeaderIndex::new(&["B", "C"], &schema);
        let row = index.normalize(&["2", "3"][..], Year::new(2010));
        assert_eq!(row.values(), &["", "2", "3", "2010"]);
        assert_eq!(index.matched_columns(), 2);
    }

    #[test]
    fn year_comes_from_file_not_content() {
        let schema = UnifiedSchema::new(["año", "depreg"], "año");
        let index = HeaderIndex::new(&["AÑO", "depreg"], &schema);
        let row = index.normalize(&["1999", "5"][..], Year::new(2015));
        assert_eq!(row.get(&schema, "año"), "2015");
        assert_eq!(row.get(&schema, "depreg"), "5");
    }

    #[test]
    fn first_duplicate_header_wins() {
        let schema = UnifiedSchema::new(["x"], "year");
        let index = HeaderIndex::new(&["X", " x "], &schema);
        let row = index.normalize(&["first", "second"][..], Year::new(2010));
        assert_eq!(row.get(&schema, "x"), "first");
    }

    #[test]
    fn values_are_trimmed_and_short_records_padded() {
        let schema = UnifiedSchema::new(["a", "b"], "year");
        let index = HeaderIndex::new(&["a", "b"], &schema);
        let row = index.normalize(&["  7 "][..], Year::new(2011));
        assert_eq!(row.values(), &["7", "", "2011"]);
    }

    #[test]
    fn byte_records_decode_lossily() {
        let schema = UnifiedSchema::new(["a"], "year");
        let index = HeaderIndex::new(&["a"], &schema);
        let record = csv::ByteRecord::from(vec![&b"caf\xe9"[..]]);
        let row = index.normalize(&record, Year::new(2012));
        assert_eq!(row.get(&schema, "a"), "caf\u{fffd}");
    }
}
