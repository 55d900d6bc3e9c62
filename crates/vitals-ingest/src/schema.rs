//! Header reading and schema unification across year files.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use csv::{ByteRecord, ReaderBuilder};
use tracing::{debug, warn};
use vitals_model::{RecordType, UnifiedSchema, Year, normalize_column_name};

use crate::discovery::YearFile;
use crate::error::{IngestError, Result};

/// Why a year file contributed nothing to the schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderProblem {
    /// File has no header line or only blank names.
    Empty,
    /// Header could not be read or is not valid UTF-8.
    Unreadable(String),
}

/// Reads only the header line of a CSV file and normalizes its names.
///
/// Blank names are kept in place so positions line up with data records.
pub fn read_header(path: &Path) -> std::result::Result<Vec<String>, HeaderProblem> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|e| HeaderProblem::Unreadable(e.to_string()))?;
    let mut record = ByteRecord::new();
    let has_line = reader
        .read_byte_record(&mut record)
        .map_err(|e| HeaderProblem::Unreadable(e.to_string()))?;
    if !has_line {
        return Err(HeaderProblem::Empty);
    }
    let mut names = Vec::with_capacity(record.len());
    for field in &record {
        let text = std::str::from_utf8(field)
            .map_err(|e| HeaderProblem::Unreadable(format!("header is not UTF-8: {e}")))?;
        names.push(normalize_column_name(text));
    }
    if names.iter().all(String::is_empty) {
        return Err(HeaderProblem::Empty);
    }
    Ok(names)
}

/// Result of unifying the headers of one record type.
#[derive(Debug, Clone)]
pub struct UnifiedInputs {
    pub schema: UnifiedSchema,
    /// Files with a usable header, in increasing year order.
    pub files: Vec<YearFile>,
    /// Files skipped because of their header.
    pub skipped: Vec<(YearFile, HeaderProblem)>,
    /// Number of header columns per usable year file.
    pub header_columns: BTreeMap<Year, usize>,
}

impl UnifiedInputs {
    pub fn files_considered(&self) -> usize {
        self.files.len() + self.skipped.len()
    }
}

/// Computes the sorted union of normalized header names over every year
/// file of a record type, plus the synthetic year column.
///
/// # Errors
///
/// Returns [`IngestError::MissingInput`] when `files` is empty.
pub fn unify_schema(
    record_type: &RecordType,
    raw_dir: &Path,
    files: &[YearFile],
) -> Result<UnifiedInputs> {
    if files.is_empty() {
        return Err(IngestError::MissingInput {
            record_type: record_type.name.to_string(),
            dir: PathBuf::from(raw_dir),
        });
    }

    let mut names: BTreeSet<String> = BTreeSet::new();
    let mut usable = Vec::with_capacity(files.len());
    let mut skipped = Vec::new();
    let mut header_columns = BTreeMap::new();

    for file in files {
        match read_header(&file.path) {
            Ok(header) => {
                debug!(
                    record_type = %record_type.name,
                    file = %file.file_name(),
                    columns = header.len(),
                    "header read"
                );
                header_columns.insert(file.year, header.len());
                names.extend(header.into_iter().filter(|name| !name.is_empty()));
                usable.push(file.clone());
            }
            Err(problem) => {
                warn!(
                    record_type = %record_type.name,
                    file = %file.file_name(),
                    problem = ?problem,
                    "skipping file with empty or unreadable header"
                );
                skipped.push((file.clone(), problem));
            }
        }
    }

    let schema = UnifiedSchema::new(names, &record_type.keys.year);
    Ok(UnifiedInputs {
        schema,
        files: usable,
        skipped,
        header_columns,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use vitals_model::RecordTypeName;

    fn year_file(dir: &Path, year: i32, contents: &[u8]) -> YearFile {
        let path = dir.join(format!("{year}_nacimientos.csv"));
        std::fs::write(&path, contents).unwrap();
        YearFile {
            year: Year::new(year),
            path,
        }
    }

    fn nacimientos() -> RecordType {
        RecordType::new(RecordTypeName::new("nacimientos").unwrap())
    }

    #[test]
    fn read_header_normalizes_names() {
        let dir = TempDir::new().unwrap();
        let file = year_file(dir.path(), 2009, b"\xef\xbb\xbfDEPREG, Mupreg ,,Sexo\n1,2,3,4\n");
        let header = read_header(&file.path).unwrap();
        assert_eq!(header, vec!["depreg", "mupreg", "", "sexo"]);
    }

    #[test]
    fn read_header_flags_empty_and_invalid_files() {
        let dir = TempDir::new().unwrap();
        let empty = year_file(dir.path(), 2009, b"");
        assert_eq!(read_header(&empty.path), Err(HeaderProblem::Empty));
        let blank = year_file(dir.path(), 2010, b" , \n1,2\n");
        assert_eq!(read_header(&blank.path), Err(HeaderProblem::Empty));
        let binary = year_file(dir.path(), 2011, b"a,\xff\xfe\n");
        assert!(matches!(
            read_header(&binary.path),
            Err(HeaderProblem::Unreadable(_))
        ));
    }

    #[test]
    fn unify_unions_headers_and_skips_bad_files() {
        let dir = TempDir::new().unwrap();
        let files = vec![
            year_file(dir.path(), 2009, b"A,B\n1,2\n"),
            year_file(dir.path(), 2010, b""),
            year_file(dir.path(), 2011, b"b,C\n3,4\n"),
        ];
        let unified = unify_schema(&nacimientos(), dir.path(), &files).unwrap();
        assert_eq!(unified.schema.columns(), &["a", "año", "b", "c"]);
        assert_eq!(unified.files.len(), 2);
        assert_eq!(unified.skipped.len(), 1);
        assert_eq!(unified.skipped[0].0.year, Year::new(2010));
        assert_eq!(unified.files_considered(), 3);
        assert_eq!(unified.header_columns.get(&Year::new(2011)), Some(&2));
    }

    #[test]
    fn unify_without_files_is_missing_input() {
        let dir = TempDir::new().unwrap();
        let error = unify_schema(&nacimientos(), dir.path(), &[]).unwrap_err();
        assert!(matches!(
            error,
            IngestError::MissingInput { record_type, .. } if record_type == "nacimientos"
        ));
    }
}
