//! Integration tests for the pipeline, using a substitute in-memory store.

use std::io::Write;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tempfile::NamedTempFile;

use userload_cli::pipeline::{self, PipelineOptions, RunError, RunReport};
use userload_ingest::RowSource;
use userload_model::{NormalizedRecord, RejectReason, RowOutcome};
use userload_store::{InsertOutcome, StoreError, UserStore};

/// In-memory [`UserStore`] that mirrors the email uniqueness constraint and
/// counts every storage call.
#[derive(Default)]
struct MemoryStore {
    rows: Mutex<Vec<NormalizedRecord>>,
    exists_calls: AtomicUsize,
    insert_calls: AtomicUsize,
}

impl MemoryStore {
    fn stored(&self) -> Vec<NormalizedRecord> {
        self.rows.lock().unwrap().clone()
    }

    fn seed(&self, record: NormalizedRecord) {
        self.rows.lock().unwrap().push(record);
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn email_exists(&self, email: &str) -> Result<bool, StoreError> {
        self.exists_calls.fetch_add(1, Ordering::Relaxed);
        Ok(self.rows.lock().unwrap().iter().any(|r| r.email == email))
    }

    async fn insert(&self, record: &NormalizedRecord) -> Result<InsertOutcome, StoreError> {
        self.insert_calls.fetch_add(1, Ordering::Relaxed);
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|r| r.email == record.email) {
            return Ok(InsertOutcome::DuplicateEmail);
        }
        rows.push(record.clone());
        Ok(InsertOutcome::Inserted)
    }
}

fn record(name: &str, surname: &str, email: &str) -> NormalizedRecord {
    NormalizedRecord {
        name: name.to_string(),
        surname: surname.to_string(),
        email: email.to_string(),
    }
}

fn source_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

async fn run_live(store: &dyn UserStore, contents: &str) -> RunReport {
    run_with_options(store, contents, PipelineOptions { dry_run: false }).await
}

async fn run_with_options(
    store: &dyn UserStore,
    contents: &str,
    options: PipelineOptions,
) -> RunReport {
    let file = source_file(contents);
    let source = RowSource::open(file.path()).unwrap();
    pipeline::run(source, store, options).await.unwrap()
}

#[tokio::test]
async fn normalizes_and_inserts_valid_rows() {
    let store = MemoryStore::default();
    let report = run_live(
        &store,
        "name,surname,email\n john ,SMITH,John.Smith@EXAMPLE.com\n",
    )
    .await;

    assert_eq!(report.counts.inserted, 1);
    assert_eq!(
        store.stored(),
        vec![record("John", "Smith", "john.smith@example.com")]
    );
}

#[tokio::test]
async fn two_runs_over_the_same_file_insert_each_record_once() {
    let store = MemoryStore::default();
    let contents = "name,surname,email\n\
                    John,Smith,john@example.com\n\
                    Jane,Doe,jane@example.com\n";

    let first = run_live(&store, contents).await;
    assert_eq!(first.counts.inserted, 2);
    assert_eq!(first.counts.duplicate, 0);

    let second = run_live(&store, contents).await;
    assert_eq!(second.counts.inserted, 0);
    assert_eq!(second.counts.duplicate, 2);
    assert_eq!(store.stored().len(), 2);
}

#[tokio::test]
async fn malformed_rows_skip_storage_entirely() {
    let store = MemoryStore::default();
    let report = run_live(&store, "name,surname,email\nBob,Jones\n").await;

    assert_eq!(report.counts.malformed, 1);
    assert_eq!(report.rows[0].outcome, RowOutcome::SkippedMalformed);
    assert_eq!(store.exists_calls.load(Ordering::Relaxed), 0);
    assert_eq!(store.insert_calls.load(Ordering::Relaxed), 0);
}

#[tokio::test]
async fn names_with_digits_are_rejected() {
    let store = MemoryStore::default();
    let report = run_live(&store, "name,surname,email\nBob123,Jones,bob@x.com\n").await;

    assert_eq!(
        report.rows[0].outcome,
        RowOutcome::SkippedInvalid(RejectReason::InvalidName)
    );
    assert!(store.stored().is_empty());
}

#[tokio::test]
async fn bad_email_syntax_is_rejected() {
    let store = MemoryStore::default();
    let report = run_live(
        &store,
        "name,surname,email\nBob,Jones,not-an-email\nAnn,Lee,ann@nodot\n",
    )
    .await;

    assert_eq!(report.counts.invalid, 2);
    for row in &report.rows {
        assert_eq!(
            row.outcome,
            RowOutcome::SkippedInvalid(RejectReason::InvalidEmail)
        );
    }
}

#[tokio::test]
async fn dry_run_never_calls_insert() {
    let store = MemoryStore::default();
    let report = run_with_options(
        &store,
        "name,surname,email\n\
         John,Smith,john@example.com\n\
         Jane,Doe,jane@example.com\n",
        PipelineOptions { dry_run: true },
    )
    .await;

    // Rows that would succeed are still reported as inserted.
    assert_eq!(report.counts.inserted, 2);
    assert_eq!(store.insert_calls.load(Ordering::Relaxed), 0);
    assert!(store.stored().is_empty());
}

#[tokio::test]
async fn email_comparison_is_case_insensitive_within_a_file() {
    let store = MemoryStore::default();
    let contents = "name,surname,email\n\
                    Ann,Lee,a@b.com\n\
                    Bea,May,A@B.COM\n";

    let report = run_live(&store, contents).await;
    assert_eq!(report.counts.inserted, 1);
    assert_eq!(report.rows[1].outcome, RowOutcome::SkippedDuplicate);

    // The same holds on a dry run, where nothing reaches storage.
    let dry_store = MemoryStore::default();
    let dry = run_with_options(&dry_store, contents, PipelineOptions { dry_run: true }).await;
    assert_eq!(dry.counts.inserted, 1);
    assert_eq!(dry.rows[1].outcome, RowOutcome::SkippedDuplicate);
}

/// Store that hides an existing row from the duplicate check, standing in
/// for a concurrent writer that wins the race before our insert.
struct RacingStore {
    inner: MemoryStore,
}

#[async_trait]
impl UserStore for RacingStore {
    async fn email_exists(&self, _email: &str) -> Result<bool, StoreError> {
        Ok(false)
    }

    async fn insert(&self, record: &NormalizedRecord) -> Result<InsertOutcome, StoreError> {
        self.inner.insert(record).await
    }
}

#[tokio::test]
async fn uniqueness_race_at_insert_is_reported_as_duplicate() {
    let store = RacingStore {
        inner: MemoryStore::default(),
    };
    store.inner.seed(record("John", "Smith", "john@example.com"));

    let report = run_live(&store, "name,surname,email\nJohn,Smith,john@example.com\n").await;

    assert_eq!(report.rows[0].outcome, RowOutcome::SkippedDuplicate);
    assert_eq!(report.counts.duplicate, 1);
}

/// Store whose insert fails for one specific email with a row-local error.
struct FlakyStore {
    inner: MemoryStore,
    failing_email: String,
}

#[async_trait]
impl UserStore for FlakyStore {
    async fn email_exists(&self, email: &str) -> Result<bool, StoreError> {
        self.inner.email_exists(email).await
    }

    async fn insert(&self, record: &NormalizedRecord) -> Result<InsertOutcome, StoreError> {
        if record.email == self.failing_email {
            return Err(StoreError::Insert {
                email: record.email.clone(),
                source: sqlx::Error::RowNotFound,
            });
        }
        self.inner.insert(record).await
    }
}

#[tokio::test]
async fn row_local_storage_failure_does_not_stop_the_run() {
    let store = FlakyStore {
        inner: MemoryStore::default(),
        failing_email: "bob@x.com".to_string(),
    };
    let report = run_live(
        &store,
        "name,surname,email\nBob,Jones,bob@x.com\nAnn,Lee,ann@y.com\n",
    )
    .await;

    assert!(matches!(report.rows[0].outcome, RowOutcome::Failed(_)));
    assert_eq!(report.counts.failed, 1);
    assert_eq!(report.counts.inserted, 1);
    assert_eq!(store.inner.stored(), vec![record("Ann", "Lee", "ann@y.com")]);
}

/// Store whose connection drops after a fixed number of duplicate checks.
struct DroppingStore {
    inner: MemoryStore,
    fail_after: usize,
}

#[async_trait]
impl UserStore for DroppingStore {
    async fn email_exists(&self, email: &str) -> Result<bool, StoreError> {
        if self.inner.exists_calls.load(Ordering::Relaxed) >= self.fail_after {
            return Err(StoreError::Exists {
                email: email.to_string(),
                source: sqlx::Error::PoolClosed,
            });
        }
        self.inner.email_exists(email).await
    }

    async fn insert(&self, record: &NormalizedRecord) -> Result<InsertOutcome, StoreError> {
        self.inner.insert(record).await
    }
}

#[tokio::test]
async fn connection_loss_aborts_and_reports_rows_processed() {
    let store = DroppingStore {
        inner: MemoryStore::default(),
        fail_after: 2,
    };
    let file = source_file(
        "name,surname,email\n\
         John,Smith,john@example.com\n\
         Jane,Doe,jane@example.com\n\
         Ann,Lee,ann@y.com\n",
    );
    let source = RowSource::open(file.path()).unwrap();

    let error = pipeline::run(source, &store, PipelineOptions::default())
        .await
        .unwrap_err();

    match error {
        RunError::ConnectionLost { processed, .. } => assert_eq!(processed, 2),
        other => panic!("expected ConnectionLost, got {other:?}"),
    }
    // Rows persisted before the failure stay persisted.
    assert_eq!(store.inner.stored().len(), 2);
}
