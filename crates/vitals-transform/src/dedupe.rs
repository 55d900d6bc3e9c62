//! Two-tier duplicate detection.
//!
//! Detection only measures: duplicates are still written, the counts end up
//! in the quality report.

use std::collections::HashSet;

use vitals_model::NormalizedRow;

use crate::exclusion::KeyPositions;
use crate::signature::Signature;

/// Append-only set of signatures seen so far in one record type run.
#[derive(Debug, Default, Clone)]
pub struct SeenSet {
    seen: HashSet<Signature>,
}

impl SeenSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when the signature was not present before.
    pub fn insert(&mut self, signature: Signature) -> bool {
        self.seen.insert(signature)
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

/// Duplicate classification of one accepted row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DuplicateStatus {
    /// An earlier row had exactly the same values.
    pub exact: bool,
    /// `None` when the row has no secondary code and was not checked.
    pub operational: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct DuplicateDetector {
    keys: KeyPositions,
    exact: SeenSet,
    operational: SeenSet,
}

impl DuplicateDetector {
    pub fn new(keys: KeyPositions) -> Self {
        Self {
            keys,
            exact: SeenSet::new(),
            operational: SeenSet::new(),
        }
    }

    /// Records the row's signatures and reports whether each was seen before.
    ///
    /// The operational signature (year, primary, secondary) is only computed
    /// when the secondary code is non-empty.
    pub fn observe(&mut self, row: &NormalizedRow) -> DuplicateStatus {
        let exact = !self.exact.insert(Signature::of(row.values()));
        let secondary = self.keys.secondary_value(row);
        let operational = if secondary.is_empty() {
            None
        } else {
            let signature = Signature::of([
                self.keys.year_value(row),
                self.keys.primary_value(row),
                secondary,
            ]);
            Some(!self.operational.insert(signature))
        };
        DuplicateStatus { exact, operational }
    }

    pub fn exact_seen(&self) -> &SeenSet {
        &self.exact
    }

    pub fn operational_seen(&self) -> &SeenSet {
        &self.operational
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitals_model::{KeyFields, UnifiedSchema};

    fn detector() -> DuplicateDetector {
        let schema = UnifiedSchema::new(["depreg", "mupreg", "sexo"], "año");
        DuplicateDetector::new(KeyPositions::resolve(&KeyFields::default(), &schema))
    }

    fn row(values: &[&str]) -> NormalizedRow {
        values.iter().map(|v| (*v).to_string()).collect()
    }

    #[test]
    fn verbatim_repeat_is_exact_duplicate() {
        let mut detector = detector();
        let first = detector.observe(&row(&["2010", "1", "101", "M"]));
        let second = detector.observe(&row(&["2010", "1", "101", "M"]));
        assert!(!first.exact);
        assert!(second.exact);
        assert_eq!(second.operational, Some(true));
        assert_eq!(detector.exact_seen().len(), 1);
    }

    #[test]
    fn incidental_difference_is_operational_only() {
        let mut detector = detector();
        detector.observe(&row(&["2010", "1", "101", "M"]));
        let status = detector.observe(&row(&["2010", "1", "101", "F"]));
        assert!(!status.exact);
        assert_eq!(status.operational, Some(true));
    }

    #[test]
    fn missing_secondary_skips_operational_check() {
        let mut detector = detector();
        detector.observe(&row(&["2010", "1", "", "M"]));
        let status = detector.observe(&row(&["2010", "1", "", "F"]));
        assert_eq!(status.operational, None);
        assert!(detector.operational_seen().is_empty());
    }

    #[test]
    fn different_year_is_not_operational_duplicate() {
        let mut detector = detector();
        detector.observe(&row(&["2010", "1", "101", "M"]));
        let status = detector.observe(&row(&["2011", "1", "101", "M"]));
        assert_eq!(status.operational, Some(false));
        assert!(!status.exact);
    }
}
