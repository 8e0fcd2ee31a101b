//! Error types for source file ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading the source file.
///
/// Both variants are fatal to the run: row-level problems (short rows,
/// blank rows) are handled by the parser and never surface here.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Source file missing, unreadable, or unopenable.
    #[error("source file unavailable: {path}: {source}")]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Unrecoverable read failure after the file was opened.
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_unavailable_display_names_the_path() {
        let source = csv::ReaderBuilder::new()
            .from_path("/no/such/file.csv")
            .unwrap_err();
        let err = IngestError::SourceUnavailable {
            path: PathBuf::from("/no/such/file.csv"),
            source,
        };
        assert!(err.to_string().starts_with("source file unavailable: /no/such/file.csv"));
    }
}
