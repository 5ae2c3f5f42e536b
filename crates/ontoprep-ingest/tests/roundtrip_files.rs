//! File-backed reading and writing.

use std::fs;

use ontoprep_ingest::{COMMA, IngestError, SEMICOLON, read_table, read_text, write_table};
use tempfile::TempDir;

#[test]
fn converts_semicolon_file_to_comma_file() {
    let dir = TempDir::new().expect("temp dir");
    let input = dir.path().join("Class-Hierarchy-V1.csv");
    fs::write(
        &input,
        "\u{feff}CLASS;sub-class 1\nEating disorders;Anorexia, restrictive\n",
    )
    .expect("write input");

    let table = read_table(&input, SEMICOLON).expect("read");
    let output = dir.path().join("converted.csv");
    write_table(&output, &table, COMMA).expect("write");

    let written = fs::read_to_string(&output).expect("read output");
    assert_eq!(
        written,
        "CLASS,sub-class 1\nEating disorders,\"Anorexia, restrictive\"\n"
    );
    assert_eq!(read_table(&output, COMMA).expect("reread"), table);
}

#[test]
fn missing_file_reports_path() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("absent.csv");
    let err = read_table(&path, SEMICOLON).expect_err("should fail");
    assert!(matches!(err, IngestError::FileNotFound { .. }));
    assert!(err.to_string().contains("absent.csv"));
}

#[test]
fn write_into_missing_directory_fails() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("no-such-dir").join("out.csv");
    let table = ontoprep_model::Table::from_cells([vec!["a"]]);
    let err = write_table(&path, &table, COMMA).expect_err("should fail");
    assert!(matches!(err, IngestError::FileWrite { .. }));
}

#[test]
fn read_text_drops_bom() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("graph.ttl");
    fs::write(&path, "\u{feff}@prefix iadas: <http://ia-das.org/onto#> .\n").expect("write");
    let text = read_text(&path).expect("read");
    assert!(text.starts_with("@prefix"));
}
