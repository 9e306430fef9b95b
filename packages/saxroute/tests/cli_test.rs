//! Tests for the `saxroute` binary.

use std::io::Write;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::NamedTempFile;

fn fixture(name: &str) -> String {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
        .display()
        .to_string()
}

fn saxroute() -> Command {
    Command::cargo_bin("saxroute").unwrap_or_else(|e| panic!("binary not built: {e}"))
}

#[test]
fn test_check_well_formed() {
    saxroute()
        .args(["check", &fixture("note.xml")])
        .assert()
        .success()
        .stdout(predicate::str::contains("Well-formed"))
        .stdout(predicate::str::contains("Elements: 5"));
}

#[test]
fn test_check_lists_namespaces() {
    saxroute()
        .args(["check", &fixture("catalog.xml")])
        .assert()
        .success()
        .stdout(predicate::str::contains("urn:example:catalog"));
}

#[test]
fn test_check_malformed() {
    saxroute()
        .args(["check", &fixture("truncated.xml")])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: Failed to parse"))
        .stderr(predicate::str::contains("unclosed element <body>"));
}

#[test]
fn test_check_missing_file() {
    saxroute()
        .args(["check", "/nonexistent/file.xml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("IO error"));
}

#[test]
fn test_stats_yaml() {
    saxroute()
        .args(["stats", &fixture("note.xml")])
        .assert()
        .success()
        .stdout(predicate::str::contains("elements: 5"))
        .stdout(predicate::str::contains("max_depth: 2"))
        .stdout(predicate::str::contains("root: note"));
}

#[test]
fn test_stats_json_small_chunks() {
    saxroute()
        .args(["stats", &fixture("catalog.xml"), "--format", "json", "--chunk-size", "7"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"elements\": 10"))
        .stdout(predicate::str::contains("\"dc:title\": 2"));
}

#[test]
fn test_stats_empty_file() {
    let mut file = NamedTempFile::new().unwrap_or_else(|e| panic!("tempfile: {e}"));
    writeln!(file).unwrap_or_else(|e| panic!("write: {e}"));

    saxroute()
        .args(["stats", &file.path().display().to_string()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("document is empty"));
}

#[test]
fn test_invalid_chunk_size() {
    saxroute()
        .args(["--chunk-size", "0", "check", &fixture("note.xml")])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid chunk size"));
}
