#![deny(unsafe_code)]

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ModelError;

/// Slug naming a yearly dataset (`nacimientos`, `defunciones`, ...).
///
/// The slug is used verbatim in input and output file names, so it is
/// restricted to lowercase ASCII letters, digits, `_` and `-`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RecordTypeName(String);

impl RecordTypeName {
    pub fn new(value: impl Into<String>) -> Result<Self, ModelError> {
        let value = value.into();
        let trimmed = value.trim();
        let valid = !trimmed.is_empty()
            && trimmed
                .chars()
                .all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '_' || ch == '-');
        if !valid {
            return Err(ModelError::InvalidRecordTypeName(value));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RecordTypeName {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RecordTypeName> for String {
    fn from(value: RecordTypeName) -> Self {
        value.0
    }
}

impl fmt::Display for RecordTypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Calendar year of a source file.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Year(i32);

impl Year {
    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    pub const fn get(self) -> i32 {
        self.0
    }
}

impl From<i32> for Year {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Inclusive range of years covered by a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawYearRange")]
pub struct YearRange {
    start: Year,
    end: Year,
}

#[derive(Deserialize)]
struct RawYearRange {
    start: i32,
    end: i32,
}

impl TryFrom<RawYearRange> for YearRange {
    type Error = ModelError;

    fn try_from(raw: RawYearRange) -> Result<Self, Self::Error> {
        Self::new(raw.start, raw.end)
    }
}

impl YearRange {
    pub fn new(start: i32, end: i32) -> Result<Self, ModelError> {
        if start > end {
            return Err(ModelError::InvalidYearRange { start, end });
        }
        Ok(Self {
            start: Year(start),
            end: Year(end),
        })
    }

    pub fn start(&self) -> Year {
        self.start
    }

    pub fn end(&self) -> Year {
        self.end
    }

    pub fn contains(&self, year: Year) -> bool {
        self.start <= year && year <= self.end
    }

    /// Years in increasing order, both ends included.
    pub fn iter(&self) -> impl Iterator<Item = Year> + use<> {
        (self.start.0..=self.end.0).map(Year)
    }
}

impl Default for YearRange {
    fn default() -> Self {
        Self {
            start: Year(2009),
            end: Year(2022),
        }
    }
}

impl fmt::Display for YearRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_type_name_accepts_slugs() {
        let name = RecordTypeName::new(" defunciones_fetales ").unwrap();
        assert_eq!(name.as_str(), "defunciones_fetales");
    }

    #[test]
    fn record_type_name_rejects_paths_and_case() {
        assert!(RecordTypeName::new("").is_err());
        assert!(RecordTypeName::new("../etc").is_err());
        assert!(RecordTypeName::new("Nacimientos").is_err());
        assert!(RecordTypeName::new("a b").is_err());
    }

    #[test]
    fn year_range_is_inclusive() {
        let range = YearRange::new(2009, 2011).unwrap();
        let years: Vec<i32> = range.iter().map(Year::get).collect();
        assert_eq!(years, vec![2009, 2010, 2011]);
        assert!(range.contains(Year::new(2011)));
        assert!(!range.contains(Year::new(2012)));
    }

    #[test]
    fn year_range_rejects_inverted_bounds() {
        assert!(YearRange::new(2022, 2009).is_err());
        assert!(YearRange::new(2010, 2010).is_ok());
    }
}
