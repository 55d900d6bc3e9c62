//! Streaming reader over the data rows of one year file.

use std::fs::File;

use csv::{ByteRecord, Reader, ReaderBuilder};
use vitals_model::{NormalizedRow, UnifiedSchema};

use crate::discovery::YearFile;
use crate::error::{IngestError, Result};
use crate::normalize::HeaderIndex;

/// Yields one [`NormalizedRow`] per data record, in file order.
///
/// Records are read one at a time, so memory does not grow with file size.
/// Rows shorter than the header are padded; extra fields are ignored.
pub struct YearFileReader {
    file: YearFile,
    reader: Reader<File>,
    index: HeaderIndex,
    record: ByteRecord,
}

impl YearFileReader {
    pub fn open(file: &YearFile, schema: &UnifiedSchema) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(&file.path)
            .map_err(|e| IngestError::csv(&file.path, e))?;
        let headers = reader
            .byte_headers()
            .map_err(|e| IngestError::csv(&file.path, e))?;
        let names: Vec<String> = headers
            .iter()
            .map(|name| String::from_utf8_lossy(name).into_owned())
            .collect();
        let index = HeaderIndex::new(&names, schema);
        Ok(Self {
            file: file.clone(),
            reader,
            index,
            record: ByteRecord::new(),
        })
    }

    pub fn header_index(&self) -> &HeaderIndex {
        &self.index
    }

    /// Reads the next record, or `None` at end of file.
    pub fn next_row(&mut self) -> Result<Option<NormalizedRow>> {
        let has_record = self
            .reader
            .read_byte_record(&mut self.record)
            .map_err(|e| IngestError::csv(&self.file.path, e))?;
        if !has_record {
            return Ok(None);
        }
        Ok(Some(self.index.normalize(&self.record, self.file.year)))
    }
}

impl Iterator for YearFileReader {
    type Item = Result<NormalizedRow>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_row().transpose()
    }
}
