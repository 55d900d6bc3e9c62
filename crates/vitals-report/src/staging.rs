//! Write-then-rename helpers so a failed run never leaves a truncated file.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ReportError, Result};

const PART_SUFFIX: &str = ".part";

/// `data/x.csv` → `data/x.csv.part`.
pub fn part_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(PART_SUFFIX);
    PathBuf::from(name)
}

/// Syncs a completed part file to disk and moves it over the final path,
/// replacing any previous run.
pub(crate) fn commit(part: &Path, target: &Path) -> Result<()> {
    fs::File::open(part)
        .and_then(|file| file.sync_all())
        .map_err(|source| ReportError::io(part, source))?;
    fs::rename(part, target).map_err(|source| ReportError::io(target, source))
}

/// Best-effort cleanup of an abandoned part file.
pub(crate) fn discard(part: &Path) {
    if part.exists() {
        let _ = fs::remove_file(part);
    }
}
