//! Snapshot of a full two-type quality report written through the part file.

use std::fs;

use tempfile::TempDir;
use vitals_model::{CleanStats, NumericField, RecordType, RecordTypeName, Year, YearRange};
use vitals_report::{build_report_rows, part_path, write_quality_report};

fn nacimientos() -> (RecordType, CleanStats) {
    let name = RecordTypeName::new("nacimientos").expect("slug");
    let mut stats = CleanStats::new(name.clone());
    stats.files_considered = 3;
    stats.rows_input = 5;
    stats.rows_excluded_missing_depreg = 1;
    stats.duplicates_exact = 1;
    stats.duplicates_operational = 2;
    stats.record_null("depreg");
    for year in [2009, 2009, 2011, 2011] {
        stats.record_written(Year::new(year));
    }
    (RecordType::new(name), stats)
}

fn defunciones() -> (RecordType, CleanStats) {
    let name = RecordTypeName::new("defunciones").expect("slug");
    let mut stats = CleanStats::new(name.clone());
    stats.files_considered = 1;
    stats.rows_input = 1;
    stats.record_parse_error("edadif");
    stats.record_null("edadif");
    stats.record_written(Year::new(2010));
    let record_type = RecordType::new(name)
        .with_numeric_field(NumericField::decimal("edadif"))
        .with_diagnostic_field("edadif");
    (record_type, stats)
}

#[test]
fn report_for_two_record_types() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("control_calidad_2009_2011.csv");
    let years = YearRange::new(2009, 2011).expect("range");

    let mut rows = Vec::new();
    for (record_type, stats) in [nacimientos(), defunciones()] {
        rows.extend(build_report_rows(&stats, &record_type, &years));
    }
    write_quality_report(&path, &rows).expect("write report");

    assert!(!part_path(&path).exists());
    let text = fs::read_to_string(&path).expect("read report");
    insta::assert_snapshot!(text, @r"
    section,tipo,year,metric,value
    summary,nacimientos,,files_considered,3
    summary,nacimientos,,rows_input,5
    summary,nacimientos,,rows_output,4
    summary,nacimientos,,rows_excluded_missing_depreg,1
    summary,nacimientos,,duplicates_exact,1
    summary,nacimientos,,duplicates_operational,2
    nulls,nacimientos,,nulls_año,0
    parse_errors,nacimientos,,parse_errors_año,0
    nulls,nacimientos,,nulls_depreg,1
    parse_errors,nacimientos,,parse_errors_depreg,0
    coverage_year,nacimientos,2009,rows_output_year,2
    coverage_year,nacimientos,2010,rows_output_year,0
    coverage_year,nacimientos,2011,rows_output_year,2
    summary,defunciones,,files_considered,1
    summary,defunciones,,rows_input,1
    summary,defunciones,,rows_output,1
    summary,defunciones,,rows_excluded_missing_depreg,0
    summary,defunciones,,duplicates_exact,0
    summary,defunciones,,duplicates_operational,0
    nulls,defunciones,,nulls_año,0
    parse_errors,defunciones,,parse_errors_año,0
    nulls,defunciones,,nulls_depreg,0
    parse_errors,defunciones,,parse_errors_depreg,0
    nulls,defunciones,,nulls_edadif,1
    parse_errors,defunciones,,parse_errors_edadif,1
    coverage_year,defunciones,2009,rows_output_year,0
    coverage_year,defunciones,2010,rows_output_year,1
    coverage_year,defunciones,2011,rows_output_year,0
    ");
}

#[test]
fn rerun_overwrites_previous_report() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("control_calidad_2009_2011.csv");
    let years = YearRange::new(2009, 2011).expect("range");
    let (record_type, stats) = defunciones();
    let rows = build_report_rows(&stats, &record_type, &years);

    write_quality_report(&path, &rows).expect("first run");
    let first = fs::read(&path).expect("read");
    write_quality_report(&path, &rows).expect("second run");
    assert_eq!(fs::read(&path).expect("read"), first);
}
