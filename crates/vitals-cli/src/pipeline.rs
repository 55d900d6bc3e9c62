//! Consolidation pipeline with explicit stages.
//!
//! Per record type:
//! 1. **Discover**: locate `{year}_{tipo}.csv` for every configured year
//! 2. **Unify**: union of normalized headers plus the year column
//! 3. **Stream**: normalize, coerce, exclude, detect duplicates, write
//! 4. **Report**: one long-format quality section per record type
//!
//! Record types share no state, so they can run on scoped threads.

use std::path::{Path, PathBuf};
use std::thread;
use std::time::Instant;

use anyhow::{Context, Result, anyhow};
use tracing::{Span, debug, error, info, info_span};

use vitals_ingest::{IngestError, YearFileReader, discover_year_files, unify_schema};
use vitals_model::{CleanStats, RecordType, RunConfig};
use vitals_report::{ConsolidationWriter, build_report_rows, write_quality_report};
use vitals_transform::RowProcessor;

use crate::types::{RecordTypeFailure, RecordTypeSummary, RunResult};

/// Inputs of one run, resolved from CLI flags and configuration.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub raw_dir: PathBuf,
    pub processed_dir: PathBuf,
    pub config: RunConfig,
    /// Record types to process, in report order.
    pub record_types: Vec<RecordType>,
    pub parallel: bool,
}

/// Consolidates every selected record type and writes the quality report.
///
/// # Errors
///
/// Fails when the raw directory is missing or the output directory or report
/// cannot be written. A record type that fails on its own is collected in
/// [`RunResult::failures`] while the others continue.
pub fn run_pipeline(options: &RunOptions) -> Result<RunResult> {
    if !options.raw_dir.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: options.raw_dir.clone(),
        }
        .into());
    }
    std::fs::create_dir_all(&options.processed_dir)
        .with_context(|| format!("create {}", options.processed_dir.display()))?;

    let outcomes = if options.parallel {
        clean_in_parallel(options)
    } else {
        options
            .record_types
            .iter()
            .map(|record_type| clean_record_type(options, record_type))
            .collect()
    };

    let mut record_types = Vec::new();
    let mut failures = Vec::new();
    for (record_type, outcome) in options.record_types.iter().zip(outcomes) {
        match outcome {
            Ok(summary) => record_types.push(summary),
            Err(err) => {
                let message = format!("{err:#}");
                error!(tipo = %record_type.name, error = %message, "record type failed");
                failures.push(RecordTypeFailure {
                    record_type: record_type.name.to_string(),
                    error: message,
                });
            }
        }
    }

    let report = if record_types.is_empty() {
        None
    } else {
        Some(write_report(options, &record_types)?)
    };

    Ok(RunResult {
        raw_dir: options.raw_dir.clone(),
        processed_dir: options.processed_dir.clone(),
        years: options.config.years,
        record_types,
        failures,
        report,
    })
}

fn clean_in_parallel(options: &RunOptions) -> Vec<Result<RecordTypeSummary>> {
    let parent = Span::current();
    thread::scope(|scope| {
        let handles: Vec<_> = options
            .record_types
            .iter()
            .map(|record_type| {
                let parent = parent.clone();
                scope.spawn(move || parent.in_scope(|| clean_record_type(options, record_type)))
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| {
                handle
                    .join()
                    .unwrap_or_else(|_| Err(anyhow!("record type worker panicked")))
            })
            .collect()
    })
}

/// Runs the full per-row pipeline for one record type.
pub fn clean_record_type(
    options: &RunOptions,
    record_type: &RecordType,
) -> Result<RecordTypeSummary> {
    let span = info_span!("record_type", tipo = %record_type.name);
    let _guard = span.enter();
    let start = Instant::now();
    let config = &options.config;
    let raw_dir = options.raw_dir.as_path();

    let files = discover_year_files(raw_dir, &record_type.name, &config.years)?;
    let unified = unify_schema(record_type, raw_dir, &files)?;
    let schema = &unified.schema;

    let mut stats = CleanStats::new(record_type.name.clone());
    stats.files_considered = unified.files_considered() as u64;
    stats.files_skipped = unified.skipped.len() as u64;
    stats.header_columns = unified.header_columns.clone();
    info!(
        files = unified.files.len(),
        files_skipped = stats.files_skipped,
        columns = schema.len(),
        "schema unified"
    );

    let output = options
        .processed_dir
        .join(config.outputs.consolidated_file(&record_type.name, &config.years));
    let mut writer = ConsolidationWriter::create(&output, schema)?;
    let mut processor = RowProcessor::new(record_type, schema);

    for file in &unified.files {
        let file_start = Instant::now();
        let input_before = stats.rows_input;
        let output_before = stats.rows_output;
        let reader = YearFileReader::open(file, schema)?;
        for row in reader {
            let mut row = row?;
            if processor.process(&mut row, file.year, &mut stats).is_accepted() {
                writer.write_row(&row)?;
            }
        }
        debug!(
            file = %file.file_name(),
            year = %file.year,
            rows_input = stats.rows_input - input_before,
            rows_output = stats.rows_output - output_before,
            duration_ms = file_start.elapsed().as_millis(),
            "year file processed"
        );
    }

    processor.finish(schema, &mut stats);
    let output = writer.finish()?;
    let duration_ms = start.elapsed().as_millis();
    info!(
        rows_input = stats.rows_input,
        rows_output = stats.rows_output,
        rows_excluded = stats.rows_excluded_missing_depreg,
        duplicates_exact = stats.duplicates_exact,
        duplicates_operational = stats.duplicates_operational,
        duration_ms,
        "record type consolidated"
    );

    Ok(RecordTypeSummary {
        record_type: record_type.clone(),
        stats,
        output,
        columns: schema.len(),
        duration_ms,
    })
}

fn write_report(options: &RunOptions, summaries: &[RecordTypeSummary]) -> Result<PathBuf> {
    let years = &options.config.years;
    let rows: Vec<_> = summaries
        .iter()
        .flat_map(|summary| build_report_rows(&summary.stats, &summary.record_type, years))
        .collect();
    let path = report_path(&options.processed_dir, &options.config);
    write_quality_report(&path, &rows)?;
    info!(path = %path.display(), rows = rows.len(), "quality report written");
    Ok(path)
}

pub fn report_path(processed_dir: &Path, config: &RunConfig) -> PathBuf {
    processed_dir.join(config.outputs.report_file(&config.years))
}
