//! The per-row processing pipeline.
//!
//! Each row runs the full Parse -> Normalize -> Validate -> CheckDuplicate
//! -> Persist sequence before the next row is read. Row-level problems are
//! classified into a [`RowOutcome`] and the run continues; only source read
//! failures and a lost storage connection abort the run.

use std::collections::HashSet;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use userload_ingest::{IngestError, RowSource, SourceRow, parse_row};
use userload_model::RowOutcome;
use userload_store::{InsertOutcome, StoreError, UserStore};
use userload_validate::{normalize, validate};

/// Pipeline behavior switches.
#[derive(Debug, Clone, Copy, Default)]
pub struct PipelineOptions {
    /// Perform every check but skip the persistence side effect.
    pub dry_run: bool,
}

/// Fatal run failures. Row-level problems never surface here.
#[derive(Debug, Error)]
pub enum RunError {
    /// The source file failed at the reading boundary.
    #[error(transparent)]
    Source(#[from] IngestError),

    /// The storage connection became unusable mid-run. Rows already
    /// persisted stay persisted; no rollback occurs.
    #[error("storage connection lost after {processed} rows: {source}")]
    ConnectionLost {
        processed: usize,
        #[source]
        source: StoreError,
    },
}

/// Outcome of one processed row, tagged with its source line number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowRecord {
    pub line: u64,
    pub outcome: RowOutcome,
}

/// Per-outcome totals for the summary table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OutcomeCounts {
    pub inserted: usize,
    pub duplicate: usize,
    pub invalid: usize,
    pub malformed: usize,
    pub failed: usize,
}

impl OutcomeCounts {
    fn record(&mut self, outcome: &RowOutcome) {
        match outcome {
            RowOutcome::Inserted => self.inserted += 1,
            RowOutcome::SkippedDuplicate => self.duplicate += 1,
            RowOutcome::SkippedInvalid(_) => self.invalid += 1,
            RowOutcome::SkippedMalformed => self.malformed += 1,
            RowOutcome::Failed(_) => self.failed += 1,
        }
    }
}

/// Aggregated result of one pipeline run.
#[derive(Debug, Serialize)]
pub struct RunReport {
    pub source: PathBuf,
    pub dry_run: bool,
    pub rows: Vec<RowRecord>,
    pub counts: OutcomeCounts,
}

impl RunReport {
    /// Number of rows processed (header and blank rows excluded).
    #[must_use]
    pub fn processed(&self) -> usize {
        self.rows.len()
    }
}

/// Drive the pipeline over every data row of `source`.
///
/// The store handle is injected by the caller, so tests can substitute an
/// in-memory implementation.
///
/// # Errors
///
/// Returns [`RunError::Source`] on a read failure and
/// [`RunError::ConnectionLost`] when storage becomes unusable; in both
/// cases rows processed before the failure keep their outcomes.
pub async fn run(
    source: RowSource,
    store: &dyn UserStore,
    options: PipelineOptions,
) -> Result<RunReport, RunError> {
    let path = source.path().to_path_buf();
    let mut rows: Vec<RowRecord> = Vec::new();
    let mut counts = OutcomeCounts::default();
    // Emails accepted during this run. Lets a dry run flag duplicates that
    // only exist within the file, and saves a round-trip in a live run.
    let mut accepted: HashSet<String> = HashSet::new();

    for item in source {
        let SourceRow { line, fields } = item?;
        let outcome = match process_row(line, &fields, store, options, &mut accepted).await {
            Ok(outcome) => outcome,
            Err(error) if error.is_connection_lost() => {
                return Err(RunError::ConnectionLost {
                    processed: rows.len(),
                    source: error,
                });
            }
            Err(error) => {
                warn!(line, "row failed: {error}");
                RowOutcome::Failed(error.to_string())
            }
        };
        counts.record(&outcome);
        rows.push(RowRecord { line, outcome });
    }

    info!(
        source = %path.display(),
        rows = rows.len(),
        inserted = counts.inserted,
        duplicate = counts.duplicate,
        invalid = counts.invalid,
        malformed = counts.malformed,
        failed = counts.failed,
        "run complete"
    );
    Ok(RunReport {
        source: path,
        dry_run: options.dry_run,
        rows,
        counts,
    })
}

/// Process one row to completion.
///
/// Storage errors propagate to the caller for fatal/row-local
/// classification; everything else is classified here.
async fn process_row(
    line: u64,
    fields: &[String],
    store: &dyn UserStore,
    options: PipelineOptions,
    accepted: &mut HashSet<String>,
) -> Result<RowOutcome, StoreError> {
    let candidate = match parse_row(fields) {
        Ok(candidate) => candidate,
        Err(error) => {
            warn!(line, "skipping row: {error}");
            return Ok(RowOutcome::SkippedMalformed);
        }
    };

    // Normalize before validating so messages, duplicate checks, and
    // storage all see the same shape.
    let record = normalize(&candidate);
    if let Err(reason) = validate(&record) {
        warn!(line, email = %record.email, "skipping row: {reason}");
        return Ok(RowOutcome::SkippedInvalid(reason));
    }

    if accepted.contains(&record.email) || store.email_exists(&record.email).await? {
        info!(line, email = %record.email, "skipping duplicate");
        return Ok(RowOutcome::SkippedDuplicate);
    }

    if options.dry_run {
        accepted.insert(record.email.clone());
        info!(
            line,
            name = %record.name,
            surname = %record.surname,
            email = %record.email,
            "would insert"
        );
        return Ok(RowOutcome::Inserted);
    }

    match store.insert(&record).await? {
        InsertOutcome::Inserted => {
            accepted.insert(record.email.clone());
            info!(
                line,
                name = %record.name,
                surname = %record.surname,
                email = %record.email,
                "inserted"
            );
            Ok(RowOutcome::Inserted)
        }
        InsertOutcome::DuplicateEmail => {
            info!(line, email = %record.email, "skipping duplicate (lost insert race)");
            Ok(RowOutcome::SkippedDuplicate)
        }
    }
}
