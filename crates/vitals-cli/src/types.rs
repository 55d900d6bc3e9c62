use std::path::PathBuf;

use vitals_model::{CleanStats, RecordType, YearRange};

/// Everything a run produced, successful or not.
#[derive(Debug)]
pub struct RunResult {
    pub raw_dir: PathBuf,
    pub processed_dir: PathBuf,
    pub years: YearRange,
    pub record_types: Vec<RecordTypeSummary>,
    pub failures: Vec<RecordTypeFailure>,
    /// Quality report path; `None` when no record type succeeded.
    pub report: Option<PathBuf>,
}

impl RunResult {
    pub fn has_errors(&self) -> bool {
        !self.failures.is_empty()
    }
}

#[derive(Debug)]
pub struct RecordTypeSummary {
    pub record_type: RecordType,
    pub stats: CleanStats,
    pub output: PathBuf,
    /// Width of the unified schema, year column included.
    pub columns: usize,
    pub duration_ms: u128,
}

#[derive(Debug)]
pub struct RecordTypeFailure {
    pub record_type: String,
    pub error: String,
}
