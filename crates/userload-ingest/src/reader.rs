//! Source file reading.
//!
//! The source format is comma-separated text where the first line is a
//! header. The header is discarded unconditionally, even when it looks like
//! data. Rows whose fields are all blank are dropped before they reach the
//! parser; everything else is yielded verbatim.

use std::fs::File;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecordsIntoIter};
use tracing::debug;

use userload_model::RawRow;

use crate::error::{IngestError, Result};

/// One usable row of the source file, tagged with its 1-based line number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRow {
    pub line: u64,
    pub fields: RawRow,
}

/// Streaming reader over the data rows of a source file.
pub struct RowSource {
    path: PathBuf,
    records: StringRecordsIntoIter<File>,
}

impl std::fmt::Debug for RowSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RowSource")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl RowSource {
    /// Open a source file and position the reader past the header row.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::SourceUnavailable`] when the file cannot be
    /// opened, and [`IngestError::Read`] when the header line itself cannot
    /// be read.
    pub fn open(path: &Path) -> Result<Self> {
        let reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(path)
            .map_err(|source| IngestError::SourceUnavailable {
                path: path.to_path_buf(),
                source,
            })?;
        let mut records = reader.into_records();
        if let Some(header) = records.next() {
            let header = header.map_err(|source| IngestError::Read {
                path: path.to_path_buf(),
                source,
            })?;
            debug!(path = %path.display(), columns = header.len(), "skipped header row");
        }
        Ok(Self {
            path: path.to_path_buf(),
            records,
        })
    }

    /// Path of the underlying source file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Iterator for RowSource {
    type Item = Result<SourceRow>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let record = match self.records.next()? {
                Ok(record) => record,
                Err(source) => {
                    return Some(Err(IngestError::Read {
                        path: self.path.clone(),
                        source,
                    }));
                }
            };
            // Entirely blank rows are discarded, not counted as malformed.
            if record.iter().all(|field| field.trim().is_empty()) {
                continue;
            }
            let line = record.position().map_or(0, |position| position.line());
            let fields: RawRow = record.iter().map(str::to_string).collect();
            return Some(Ok(SourceRow { line, fields }));
        }
    }
}
