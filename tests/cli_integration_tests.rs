//! CLI Integration Tests
//!
//! Tests the CLI binary directly using assert_cmd to exercise main.rs code paths.

// Skip all CLI tests during coverage builds
#![cfg(not(coverage))]
#![allow(deprecated)] // Command::cargo_bin deprecation - no stable replacement yet

use assert_cmd::Command;
use csvsheet::types::CellValue;
use csvsheet::DocumentReader;
use predicates::prelude::*;
use std::fs;
use std::io::Read;
use std::path::Path;
use tempfile::TempDir;

fn csvsheet() -> Command {
    let mut cmd = Command::cargo_bin("csvsheet").unwrap();
    cmd.env_remove("CSVSHEET_SHEET_NAME");
    cmd
}

fn write_csv(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

fn read_workbook(path: &Path) -> csvsheet::Table {
    DocumentReader::new(fs::read(path).unwrap()).read().unwrap()
}

// ═══════════════════════════════════════════════════════════════════════════
// HELP AND VERSION TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_cli_help() {
    csvsheet()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("csvsheet"))
        .stdout(predicate::str::contains("COMMANDS"));
}

#[test]
fn test_cli_version() {
    csvsheet()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_convert_help() {
    csvsheet()
        .args(["convert", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--output"))
        .stdout(predicate::str::contains("--sheet-name"));
}

#[test]
fn test_no_subcommand_fails() {
    csvsheet().assert().failure();
}

// ═══════════════════════════════════════════════════════════════════════════
// CONVERT
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_convert_writes_next_to_input() {
    let dir = TempDir::new().unwrap();
    let input = write_csv(&dir, "people.csv", "name,age\nAlice,30\nBob,\n");

    csvsheet()
        .arg("convert")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("Conversion Complete"));

    let output = dir.path().join("people.xlsx");
    assert!(output.exists());

    let table = read_workbook(&output);
    assert_eq!(table.column_names(), vec!["name", "age"]);
    assert_eq!(table.rows[0][1], CellValue::Integer(30));
    assert_eq!(table.rows[1][1], CellValue::Empty);
}

#[test]
fn test_convert_explicit_output() {
    let dir = TempDir::new().unwrap();
    let input = write_csv(&dir, "dados.csv", "a;b\n1;2\n");
    let output = dir.path().join("saida.xlsx");

    csvsheet()
        .arg("convert")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .arg("--verbose")
        .assert()
        .success()
        .stdout(predicate::str::contains("semicolon"))
        .stdout(predicate::str::contains("width"));

    assert!(output.exists());
    assert!(!dir.path().join("dados.xlsx").exists());
    assert_eq!(read_workbook(&output).column_names(), vec!["a", "b"]);
}

#[test]
fn test_convert_malformed_fails() {
    let dir = TempDir::new().unwrap();
    let input = write_csv(&dir, "broken.csv", "a,b\n1,2,3\n");

    csvsheet()
        .arg("convert")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("separator"));

    assert!(!dir.path().join("broken.xlsx").exists());
}

#[test]
fn test_convert_missing_file_fails() {
    csvsheet()
        .args(["convert", "/nonexistent/path/data.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to access the file"));
}

#[test]
fn test_convert_invalid_sheet_name_fails() {
    let dir = TempDir::new().unwrap();
    let input = write_csv(&dir, "x.csv", "a\n1\n");

    csvsheet()
        .arg("convert")
        .arg(&input)
        .args(["--sheet-name", "bad[name]"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to process the file"));
}

fn workbook_xml(path: &Path) -> String {
    let mut archive = zip::ZipArchive::new(fs::File::open(path).unwrap()).unwrap();
    let mut part = archive.by_name("xl/workbook.xml").unwrap();
    let mut xml = String::new();
    part.read_to_string(&mut xml).unwrap();
    xml
}

#[test]
fn test_convert_default_sheet_name() {
    let dir = TempDir::new().unwrap();
    let input = write_csv(&dir, "a.csv", "a\n1\n");

    csvsheet().arg("convert").arg(&input).assert().success();

    assert!(workbook_xml(&dir.path().join("a.xlsx")).contains("name=\"Dados\""));
}

#[test]
fn test_convert_sheet_name_from_env() {
    let dir = TempDir::new().unwrap();
    let input = write_csv(&dir, "q1.csv", "mes,total\njan,10\n");

    csvsheet()
        .env("CSVSHEET_SHEET_NAME", "Trimestre")
        .arg("convert")
        .arg(&input)
        .assert()
        .success();

    let xml = workbook_xml(&dir.path().join("q1.xlsx"));
    assert!(xml.contains("name=\"Trimestre\""), "workbook xml: {}", xml);
}

#[test]
fn test_sheet_name_flag_overrides_env() {
    let dir = TempDir::new().unwrap();
    let input = write_csv(&dir, "q2.csv", "a\n1\n");

    csvsheet()
        .env("CSVSHEET_SHEET_NAME", "Trimestre")
        .arg("convert")
        .arg(&input)
        .args(["--sheet-name", "Abril"])
        .assert()
        .success();

    let xml = workbook_xml(&dir.path().join("q2.xlsx"));
    assert!(xml.contains("name=\"Abril\""));
    assert!(!xml.contains("Trimestre"));
}

// ═══════════════════════════════════════════════════════════════════════════
// PREVIEW AND INSPECT
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_preview_shows_table() {
    let dir = TempDir::new().unwrap();
    let input = write_csv(&dir, "prices.csv", "item,price\npen,1.5\nbook,12\n");

    csvsheet()
        .arg("preview")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("item"))
        .stdout(predicate::str::contains("<float>"))
        .stdout(predicate::str::contains("book"))
        .stdout(predicate::str::contains("2 rows, 2 columns"));

    assert!(!dir.path().join("prices.xlsx").exists());
}

#[test]
fn test_preview_row_limit() {
    let dir = TempDir::new().unwrap();
    let input = write_csv(&dir, "n.csv", "n\n1\n2\n3\n4\n5\n");

    csvsheet()
        .arg("preview")
        .arg(&input)
        .args(["-n", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Showing 2 of 5 rows"));
}

#[test]
fn test_inspect_converted_workbook() {
    let dir = TempDir::new().unwrap();
    let input = write_csv(&dir, "cities.csv", "city,pop\nLisbon,545000\n");

    csvsheet().arg("convert").arg(&input).assert().success();

    csvsheet()
        .arg("inspect")
        .arg(dir.path().join("cities.xlsx"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Lisbon"))
        .stdout(predicate::str::contains("545000"));
}

#[test]
fn test_inspect_non_workbook_fails() {
    let dir = TempDir::new().unwrap();
    let input = write_csv(&dir, "plain.csv", "a,b\n1,2\n");

    csvsheet()
        .arg("inspect")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read the workbook"));
}
