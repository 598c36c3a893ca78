//! Tests for resilient JSONL loading.
//!
//! Covers warning classification, line numbering across blank and damaged
//! lines, and file-based loading.

use faultline_jsonl::{read_jsonl_resilient, read_resilient, Error, Warning};
use rstest::rstest;
use serde::Deserialize;
use std::io::{Cursor, Write};
use tempfile::NamedTempFile;

#[derive(Debug, Clone, Deserialize, PartialEq)]
struct SimpleRecord {
    id: u32,
    name: String,
}

async fn load(data: &str) -> (Vec<SimpleRecord>, Vec<Warning>) {
    read_resilient(Cursor::new(data.as_bytes().to_vec()))
        .await
        .expect("in-memory read should not fail")
}

#[tokio::test]
async fn all_valid_records_load_without_warnings() {
    let (records, warnings) =
        load("{\"id\":1,\"name\":\"a\"}\n{\"id\":2,\"name\":\"b\"}\n").await;

    assert_eq!(records.len(), 2);
    assert!(warnings.is_empty());
}

#[tokio::test]
async fn malformed_line_is_skipped_and_loading_continues() {
    let data = "{\"id\":1,\"name\":\"a\"}\n{\"id\":2,\"name\":\n{\"id\":3,\"name\":\"c\"}\n";
    let (records, warnings) = load(data).await;

    assert_eq!(
        records.iter().map(|r| r.id).collect::<Vec<_>>(),
        vec![1, 3]
    );
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].line_number(), 2);
    assert_eq!(warnings[0].kind(), "malformed_json");
}

#[tokio::test]
async fn undecodable_bytes_are_skipped_and_loading_continues() {
    let data = b"{\"id\":1,\"name\":\"a\"}\n\xff\xfe\n{\"id\":2,\"name\":\"b\"}\n".to_vec();

    let (records, warnings): (Vec<SimpleRecord>, _) =
        read_resilient(Cursor::new(data)).await.unwrap();

    assert_eq!(
        records.iter().map(|r| r.id).collect::<Vec<_>>(),
        vec![1, 2]
    );
    assert!(matches!(
        warnings.as_slice(),
        [Warning::MalformedJson { line_number: 2, .. }]
    ));
}

#[rstest]
#[case::missing_field("{\"id\":1}")]
#[case::wrong_type("{\"id\":\"one\",\"name\":\"a\"}")]
#[case::not_an_object("[1, 2, 3]")]
#[tokio::test]
async fn shape_mismatch_is_reported_as_skipped_line(#[case] line: &str) {
    let (records, warnings) = load(line).await;

    assert!(records.is_empty());
    assert!(matches!(
        warnings.as_slice(),
        [Warning::SkippedLine { line_number: 1, .. }]
    ));
}

#[tokio::test]
async fn line_numbers_count_blank_lines() {
    let data = "\n\n{\"id\":1,\"name\":\"a\"}\n\n{oops}\n";
    let (_, warnings) = load(data).await;

    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].line_number(), 5);
}

#[tokio::test]
async fn reads_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{{\"id\":10,\"name\":\"ten\"}}").unwrap();
    writeln!(file, "garbage").unwrap();
    file.flush().unwrap();

    let (records, warnings) = read_jsonl_resilient::<SimpleRecord, _>(file.path())
        .await
        .unwrap();

    assert_eq!(
        records,
        vec![SimpleRecord {
            id: 10,
            name: "ten".to_string()
        }]
    );
    assert_eq!(warnings.len(), 1);
}

#[tokio::test]
async fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result =
        read_jsonl_resilient::<SimpleRecord, _>(dir.path().join("absent.jsonl")).await;

    assert!(matches!(result, Err(Error::Io(_))));
}
