//! Long-format quality report: one `section,tipo,year,metric,value` row per
//! measurement so consumers never negotiate a schema.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tracing::debug;
use vitals_model::{CleanStats, RecordType, Year, YearRange};

use crate::error::{ReportError, Result};
use crate::staging::{commit, discard, part_path};

pub const REPORT_HEADER: [&str; 5] = ["section", "tipo", "year", "metric", "value"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Summary,
    Nulls,
    ParseErrors,
    CoverageYear,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    pub section: Section,
    pub tipo: String,
    /// Empty for metrics that span every year.
    pub year: Option<Year>,
    pub metric: String,
    pub value: u64,
}

impl ReportRow {
    fn new(section: Section, tipo: &str, year: Option<Year>, metric: String, value: u64) -> Self {
        Self {
            section,
            tipo: tipo.to_string(),
            year,
            metric,
            value,
        }
    }
}

/// Builds the report section of one record type.
///
/// Order: summary counters, then a nulls/parse_errors pair per inspection
/// field, then one coverage row per year of `years` (zeros included).
pub fn build_report_rows(
    stats: &CleanStats,
    record_type: &RecordType,
    years: &YearRange,
) -> Vec<ReportRow> {
    let tipo = stats.record_type.as_str();
    let summary = [
        ("files_considered", stats.files_considered),
        ("rows_input", stats.rows_input),
        ("rows_output", stats.rows_output),
        ("rows_excluded_missing_depreg", stats.rows_excluded_missing_depreg),
        ("duplicates_exact", stats.duplicates_exact),
        ("duplicates_operational", stats.duplicates_operational),
    ];

    let mut rows: Vec<ReportRow> = summary
        .into_iter()
        .map(|(metric, value)| {
            ReportRow::new(Section::Summary, tipo, None, metric.to_string(), value)
        })
        .collect();

    for field in record_type.inspection_fields() {
        rows.push(ReportRow::new(
            Section::Nulls,
            tipo,
            None,
            format!("nulls_{field}"),
            stats.null_count(field),
        ));
        rows.push(ReportRow::new(
            Section::ParseErrors,
            tipo,
            None,
            format!("parse_errors_{field}"),
            stats.parse_error_count(field),
        ));
    }

    rows.extend(stats.coverage(years).into_iter().map(|(year, count)| {
        ReportRow::new(
            Section::CoverageYear,
            tipo,
            Some(year),
            "rows_output_year".to_string(),
            count,
        )
    }));
    rows
}

/// Serializes report rows with the fixed header, even when `rows` is empty.
pub fn write_report<W: Write>(
    writer: W,
    rows: &[ReportRow],
) -> std::result::Result<(), csv::Error> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv_writer.write_record(REPORT_HEADER)?;
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Writes the report for a whole run to `path` via a part file.
pub fn write_quality_report(path: &Path, rows: &[ReportRow]) -> Result<()> {
    let part = part_path(path);
    let file = File::create(&part).map_err(|source| ReportError::io(&part, source))?;
    if let Err(source) = write_report(file, rows) {
        discard(&part);
        return Err(ReportError::csv(&part, source));
    }
    commit(&part, path)?;
    debug!(path = %path.display(), rows = rows.len(), "quality report written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitals_model::{NumericField, RecordTypeName};

    #[test]
    fn coverage_lists_every_year_with_zeros() {
        let name = RecordTypeName::new("nacimientos").unwrap();
        let record_type = RecordType::new(name.clone());
        let mut stats = CleanStats::new(name);
        stats.record_written(Year::new(2010));
        let years = YearRange::new(2009, 2011).unwrap();

        let coverage: Vec<_> = build_report_rows(&stats, &record_type, &years)
            .into_iter()
            .filter(|row| row.section == Section::CoverageYear)
            .map(|row| (row.year.map(Year::get), row.value))
            .collect();
        assert_eq!(
            coverage,
            vec![(Some(2009), 0), (Some(2010), 1), (Some(2011), 0)]
        );
    }

    #[test]
    fn inspection_pairs_follow_summary() {
        let name = RecordTypeName::new("defunciones").unwrap();
        let record_type = RecordType::new(name.clone())
            .with_numeric_field(NumericField::decimal("edadif"))
            .with_diagnostic_field("edadif");
        let stats = CleanStats::new(name);
        let years = YearRange::new(2009, 2009).unwrap();

        let metrics: Vec<_> = build_report_rows(&stats, &record_type, &years)
            .into_iter()
            .map(|row| row.metric)
            .collect();
        assert_eq!(
            metrics,
            vec![
                "files_considered",
                "rows_input",
                "rows_output",
                "rows_excluded_missing_depreg",
                "duplicates_exact",
                "duplicates_operational",
                "nulls_año",
                "parse_errors_año",
                "nulls_depreg",
                "parse_errors_depreg",
                "nulls_edadif",
                "parse_errors_edadif",
                "rows_output_year",
            ]
        );
    }

    #[test]
    fn empty_report_still_has_header() {
        let mut buffer = Vec::new();
        write_report(&mut buffer, &[]).unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), "section,tipo,year,metric,value\n");
    }
}
