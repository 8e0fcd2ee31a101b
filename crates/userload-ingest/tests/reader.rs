//! Integration tests for the source reader.

use std::io::Write;

use tempfile::NamedTempFile;

use userload_ingest::{IngestError, RowSource};

fn source_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn header_row_is_always_skipped() {
    let file = source_file("name,surname,email\nJohn,Smith,john@example.com\n");
    let source = RowSource::open(file.path()).unwrap();
    let rows: Vec<_> = source.map(Result::unwrap).collect();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].line, 2);
    assert_eq!(rows[0].fields, vec!["John", "Smith", "john@example.com"]);
}

#[test]
fn header_is_skipped_even_when_it_looks_like_data() {
    let file = source_file("Jane,Doe,jane@example.com\nJohn,Smith,john@example.com\n");
    let source = RowSource::open(file.path()).unwrap();
    let rows: Vec<_> = source.map(Result::unwrap).collect();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].fields[0], "John");
}

#[test]
fn blank_rows_are_dropped() {
    let file = source_file("name,surname,email\n,,\nJohn,Smith,john@example.com\n   ,  ,\n");
    let source = RowSource::open(file.path()).unwrap();
    let rows: Vec<_> = source.map(Result::unwrap).collect();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].line, 3);
}

#[test]
fn short_rows_are_yielded_for_the_parser_to_reject() {
    let file = source_file("name,surname,email\nBob,Jones\n");
    let source = RowSource::open(file.path()).unwrap();
    let rows: Vec<_> = source.map(Result::unwrap).collect();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].fields, vec!["Bob", "Jones"]);
}

#[test]
fn fields_are_yielded_untrimmed() {
    let file = source_file("name,surname,email\n john ,SMITH,John.Smith@EXAMPLE.com\n");
    let source = RowSource::open(file.path()).unwrap();
    let rows: Vec<_> = source.map(Result::unwrap).collect();

    assert_eq!(rows[0].fields[0], " john ");
}

#[test]
fn empty_file_yields_no_rows() {
    let file = source_file("");
    let source = RowSource::open(file.path()).unwrap();
    assert_eq!(source.count(), 0);
}

#[test]
fn header_only_file_yields_no_rows() {
    let file = source_file("name,surname,email\n");
    let source = RowSource::open(file.path()).unwrap();
    assert_eq!(source.count(), 0);
}

#[test]
fn missing_file_is_source_unavailable() {
    let err = RowSource::open(std::path::Path::new("/no/such/users.csv")).unwrap_err();
    assert!(matches!(err, IngestError::SourceUnavailable { .. }));
}
