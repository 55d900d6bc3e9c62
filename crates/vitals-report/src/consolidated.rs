//! Streaming writer for the consolidated dataset of one record type.

use std::fs::File;
use std::path::{Path, PathBuf};

use tracing::debug;
use vitals_model::{NormalizedRow, UnifiedSchema};

use crate::error::{ReportError, Result};
use crate::staging::{commit, discard, part_path};

/// Writes rows in schema order to `<path>.part` and renames it into place on
/// [`finish`](Self::finish). Dropping an unfinished writer removes the part file.
#[derive(Debug)]
pub struct ConsolidationWriter {
    path: PathBuf,
    part: PathBuf,
    writer: Option<csv::Writer<File>>,
    width: usize,
    rows: u64,
}

impl ConsolidationWriter {
    /// Creates the part file and writes the schema header.
    pub fn create(path: &Path, schema: &UnifiedSchema) -> Result<Self> {
        let part = part_path(path);
        let file = File::create(&part).map_err(|source| ReportError::io(&part, source))?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        writer
            .write_record(schema.columns())
            .map_err(|source| ReportError::csv(&part, source))?;
        debug!(path = %part.display(), columns = schema.len(), "opened consolidated output");
        Ok(Self {
            path: path.to_path_buf(),
            part,
            writer: Some(writer),
            width: schema.len(),
            rows: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn rows_written(&self) -> u64 {
        self.rows
    }

    pub fn write_row(&mut self, row: &NormalizedRow) -> Result<()> {
        if row.len() != self.width {
            return Err(ReportError::RowWidth {
                path: self.path.clone(),
                expected: self.width,
                found: row.len(),
            });
        }
        let Some(writer) = self.writer.as_mut() else {
            return Ok(());
        };
        writer
            .write_record(row.values())
            .map_err(|source| ReportError::csv(&self.part, source))?;
        self.rows += 1;
        Ok(())
    }

    /// Flushes and moves the output into its final location.
    pub fn finish(mut self) -> Result<PathBuf> {
        if let Some(mut writer) = self.writer.take() {
            writer
                .flush()
                .map_err(|source| ReportError::io(&self.part, source))?;
        }
        commit(&self.part, &self.path)?;
        debug!(path = %self.path.display(), rows = self.rows, "consolidated output committed");
        Ok(self.path.clone())
    }
}

impl Drop for ConsolidationWriter {
    fn drop(&mut self) {
        if self.writer.take().is_some() {
            discard(&self.part);
        }
    }
}
