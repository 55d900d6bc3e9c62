//! Year-file discovery.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::debug;
use vitals_model::{RecordTypeName, Year, YearRange};

use crate::error::{IngestError, Result};

/// One input file, addressed by record type and year.
///
/// The year comes from the file name only; file contents never override it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearFile {
    pub year: Year,
    pub path: PathBuf,
}

impl YearFile {
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("unknown")
            .to_string()
    }
}

/// Lists all CSV files in a directory.
///
/// Returns files sorted by filename.
pub fn list_csv_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let entries = std::fs::read_dir(dir).map_err(|e| IngestError::DirectoryRead {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut files = Vec::new();
    for entry_result in entries {
        let entry = entry_result.map_err(|e| IngestError::DirectoryRead {
            path: dir.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let is_csv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        if is_csv {
            files.push(path);
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Stem every year file of `record_type` must carry, e.g. `2012_defunciones`.
pub fn year_file_stem(year: Year, record_type: &RecordTypeName) -> String {
    format!("{year}_{record_type}")
}

fn index_by_stem(files: Vec<PathBuf>) -> BTreeMap<String, PathBuf> {
    let mut by_stem = BTreeMap::new();
    for path in files {
        let Some(stem) = path.file_stem().and_then(|v| v.to_str()) else {
            continue;
        };
        by_stem.entry(stem.to_lowercase()).or_insert(path);
    }
    by_stem
}

/// Finds the `{year}_{record_type}.csv` file of every year in `years`.
///
/// Files are looked up directly in `raw_dir` first, then in a per-year
/// sub-directory (`raw_dir/{year}/`). Years without a file are left out;
/// the result is in increasing year order.
pub fn discover_year_files(
    raw_dir: &Path,
    record_type: &RecordTypeName,
    years: &YearRange,
) -> Result<Vec<YearFile>> {
    let flat = index_by_stem(list_csv_files(raw_dir)?);
    let mut found = Vec::new();
    for year in years.iter() {
        let stem = year_file_stem(year, record_type);
        if let Some(path) = flat.get(&stem) {
            found.push(YearFile {
                year,
                path: path.clone(),
            });
            continue;
        }
        let year_dir = raw_dir.join(year.to_string());
        if !year_dir.is_dir() {
            continue;
        }
        let nested = index_by_stem(list_csv_files(&year_dir)?);
        if let Some(path) = nested.get(&stem) {
            found.push(YearFile {
                year,
                path: path.clone(),
            });
        }
    }
    debug!(
        record_type = %record_type,
        file_count = found.len(),
        "discovered year files"
    );
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) {
        std::fs::write(dir.join(name), "a,b\n1,2\n").unwrap();
    }

    #[test]
    fn test_list_csv_files_sorted_and_filtered() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "2010_nacimientos.csv");
        touch(dir.path(), "2009_nacimientos.CSV");
        touch(dir.path(), "notes.txt");

        let files = list_csv_files(dir.path()).unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["2009_nacimientos.CSV", "2010_nacimientos.csv"]);
    }

    #[test]
    fn test_missing_directory() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        assert!(matches!(
            list_csv_files(&missing),
            Err(IngestError::DirectoryNotFound { .. })
        ));
    }

    #[test]
    fn test_discover_only_requested_type_and_range() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "2008_defunciones.csv");
        touch(dir.path(), "2009_defunciones.csv");
        touch(dir.path(), "2009_defunciones_fetales.csv");
        touch(dir.path(), "2011_Defunciones.csv");
        touch(dir.path(), "2010_nacimientos.csv");

        let name = RecordTypeName::new("defunciones").unwrap();
        let years = YearRange::new(2009, 2011).unwrap();
        let files = discover_year_files(dir.path(), &name, &years).unwrap();
        let years: Vec<i32> = files.iter().map(|f| f.year.get()).collect();
        assert_eq!(years, vec![2009, 2011]);
        assert_eq!(files[0].file_name(), "2009_defunciones.csv");
    }

    #[test]
    fn test_discover_per_year_subdirectory() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("2010");
        std::fs::create_dir_all(&nested).unwrap();
        touch(&nested, "2010_divorcios.csv");
        touch(dir.path(), "2011_divorcios.csv");

        let name = RecordTypeName::new("divorcios").unwrap();
        let years = YearRange::new(2009, 2012).unwrap();
        let files = discover_year_files(dir.path(), &name, &years).unwrap();
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].year, Year::new(2010));
        assert!(files[0].path.starts_with(&nested));
    }
}
