//! Per-row pipeline: coerce, check mandatory keys, detect duplicates.

use tracing::trace;
use vitals_model::{CleanStats, NormalizedRow, RecordType, UnifiedSchema, Year};

use crate::coerce::FieldCoercer;
use crate::dedupe::{DuplicateDetector, DuplicateStatus};
use crate::exclusion::{Exclusion, KeyPositions, check_mandatory_keys};

/// What happened to one normalized row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowOutcome {
    /// Dropped; never written.
    Excluded(Exclusion),
    /// Must be written, duplicates included.
    Accepted(DuplicateStatus),
}

impl RowOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }
}

/// Stateful processor for every row of one record type, in arrival order.
#[derive(Debug)]
pub struct RowProcessor {
    coercer: FieldCoercer,
    keys: KeyPositions,
    duplicates: DuplicateDetector,
    filled: Vec<u64>,
}

impl RowProcessor {
    pub fn new(record_type: &RecordType, schema: &UnifiedSchema) -> Self {
        let keys = KeyPositions::resolve(&record_type.keys, schema);
        Self {
            coercer: FieldCoercer::new(record_type, schema),
            keys,
            duplicates: DuplicateDetector::new(keys),
            filled: vec![0; schema.len()],
        }
    }

    /// Runs one row through coercion, exclusion and duplicate detection.
    ///
    /// Accepted rows are counted as written for `year`; the caller must then
    /// write the (possibly rewritten) row.
    pub fn process(
        &mut self,
        row: &mut NormalizedRow,
        year: Year,
        stats: &mut CleanStats,
    ) -> RowOutcome {
        stats.rows_input += 1;
        self.coercer.apply(row, stats);

        if let Some(reason) = check_mandatory_keys(row, &self.keys) {
            trace!(year = %year, ?reason, "row excluded");
            stats.rows_excluded_missing_depreg += 1;
            return RowOutcome::Excluded(reason);
        }

        let status = self.duplicates.observe(row);
        if status.exact {
            stats.duplicates_exact += 1;
        }
        if status.operational == Some(true) {
            stats.duplicates_operational += 1;
        }

        for (count, value) in self.filled.iter_mut().zip(row.values()) {
            if !value.is_empty() {
                *count += 1;
            }
        }
        stats.record_written(year);
        RowOutcome::Accepted(status)
    }

    /// Moves the per-column fill counts into `stats`.
    pub fn finish(self, schema: &UnifiedSchema, stats: &mut CleanStats) {
        for (column, count) in schema.columns().iter().zip(self.filled) {
            stats.filled.insert(column.clone(), count);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitals_model::{NumericField, RecordTypeName};

    fn setup() -> (RecordType, UnifiedSchema, CleanStats) {
        let record_type = RecordType::new(RecordTypeName::new("defunciones").unwrap())
            .with_numeric_field(NumericField::decimal("edadif"))
            .with_diagnostic_field("edadif");
        let schema = UnifiedSchema::new(["depreg", "mupreg", "edadif"], "año");
        let stats = CleanStats::new(record_type.name.clone());
        (record_type, schema, stats)
    }

    fn row(values: &[&str]) -> NormalizedRow {
        values.iter().map(|v| (*v).to_string()).collect()
    }

    #[test]
    fn every_row_is_written_or_excluded() {
        let (record_type, schema, mut stats) = setup();
        let mut processor = RowProcessor::new(&record_type, &schema);
        let year = Year::new(2015);

        // schema order: año, depreg, edadif, mupreg
        let mut rows = vec![
            row(&["2015", "1", "30", "101"]),
            row(&["2015", "", "40", "102"]),
            row(&["2015", "abc", "50", "103"]),
            row(&["2015", "1", "30", "101"]),
        ];
        let outcomes: Vec<_> = rows
            .iter_mut()
            .map(|r| processor.process(r, year, &mut stats))
            .collect();
        processor.finish(&schema, &mut stats);

        assert!(outcomes[0].is_accepted());
        assert_eq!(outcomes[1], RowOutcome::Excluded(Exclusion::MissingPrimaryCode));
        assert_eq!(outcomes[2], RowOutcome::Excluded(Exclusion::MissingPrimaryCode));
        assert_eq!(
            outcomes[3],
            RowOutcome::Accepted(DuplicateStatus {
                exact: true,
                operational: Some(true)
            })
        );

        assert_eq!(stats.rows_input, 4);
        assert_eq!(stats.rows_output, 2);
        assert_eq!(stats.rows_excluded_missing_depreg, 2);
        assert_eq!(stats.duplicates_exact, 1);
        assert_eq!(stats.duplicates_operational, 1);
        assert_eq!(stats.parse_error_count("depreg"), 1);
        assert_eq!(stats.null_count("depreg"), 2);
        assert_eq!(stats.rows_for_year(year), 2);
        assert_eq!(rows[0].values(), &["2015", "1", "30.0", "101"]);
        assert_eq!(stats.filled.get("edadif"), Some(&2));
    }

    #[test]
    fn fill_counts_cover_every_column() {
        let (record_type, schema, mut stats) = setup();
        let mut processor = RowProcessor::new(&record_type, &schema);
        let mut first = row(&["2012", "3", "", ""]);
        processor.process(&mut first, Year::new(2012), &mut stats);
        processor.finish(&schema, &mut stats);

        assert_eq!(stats.filled.len(), schema.len());
        assert_eq!(stats.filled.get("mupreg"), Some(&0));
        assert_eq!(stats.filled.get("depreg"), Some(&1));
    }
}
