//! CLI Integration Tests
//!
//! Tests the `naac` binary directly using assert_cmd.

#![cfg(not(coverage))]
#![allow(deprecated)] // Command::cargo_bin deprecation - no stable replacement yet

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

fn naac() -> Command {
    let mut cmd = Command::cargo_bin("naac").unwrap();
    cmd.env_remove("NAAC_CONFIG")
        .env_remove("NAAC_WORKBOOK")
        .env("NO_COLOR", "1");
    cmd
}

fn init_workbook(dir: &TempDir) -> std::path::PathBuf {
    let workbook = dir.path().join("naac.xlsx");
    naac()
        .arg("init")
        .arg(&workbook)
        .assert()
        .success()
        .stdout(predicate::str::contains("Workbook initialised"));
    workbook
}

fn list_json(workbook: &Path, collection: &str) -> serde_json::Value {
    let output = naac()
        .arg("--workbook")
        .arg(workbook)
        .args(["list", collection, "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    serde_json::from_slice(&output.stdout).unwrap()
}

// ═══════════════════════════════════════════════════════════════════════════
// HELP AND VERSION TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_cli_help() {
    naac()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("naac"))
        .stdout(predicate::str::contains("COMMANDS"));
}

#[test]
fn test_cli_version() {
    naac()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_add_help() {
    naac()
        .args(["add", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--data"));
}

#[test]
fn test_collections_lists_builtins() {
    naac()
        .arg("collections")
        .assert()
        .success()
        .stdout(predicate::str::contains("awards"))
        .stdout(predicate::str::contains("research-grants"));
}

// ═══════════════════════════════════════════════════════════════════════════
// WORKBOOK FLOW TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_init_add_list() {
    let dir = TempDir::new().unwrap();
    let workbook = init_workbook(&dir);

    for (year, title) in [("2020", "Best Paper"), ("2021", "New Award")] {
        naac()
            .arg("--workbook")
            .arg(&workbook)
            .args(["add", "awards", "--data"])
            .arg(format!(
                r#"{{"year":"{}","title":"{}","awardeeName":"A. Smith"}}"#,
                year, title
            ))
            .assert()
            .success()
            .stdout(predicate::str::contains("Data successfully added at the top"));
    }

    let records = list_json(&workbook, "awards");
    assert_eq!(records[0]["title"], "New Award");
    assert_eq!(records[1]["title"], "Best Paper");
    assert_eq!(records[1]["category"], "");
}

#[test]
fn test_init_existing_without_force() {
    let dir = TempDir::new().unwrap();
    let workbook = init_workbook(&dir);

    naac().arg("init").arg(&workbook).assert().failure();
    naac()
        .arg("init")
        .arg(&workbook)
        .arg("--force")
        .assert()
        .success();
}

#[test]
fn test_workbook_from_env() {
    let dir = TempDir::new().unwrap();
    let workbook = init_workbook(&dir);

    naac()
        .env("NAAC_WORKBOOK", &workbook)
        .args(["list", "patents"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0 records"));
}

#[test]
fn test_export_writes_json() {
    let dir = TempDir::new().unwrap();
    let workbook = init_workbook(&dir);
    let output = dir.path().join("awards.json");

    naac()
        .arg("--workbook")
        .arg(&workbook)
        .args(["add", "awards", "-d", r#"{"year":"2021","title":"T","awardeeName":"N"}"#])
        .assert()
        .success();
    naac()
        .arg("--workbook")
        .arg(&workbook)
        .args(["export", "awards"])
        .arg(&output)
        .assert()
        .success();

    let exported: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(exported.as_array().unwrap().len(), 1);
}

// ═══════════════════════════════════════════════════════════════════════════
// ERROR TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_unknown_collection_fails() {
    let dir = TempDir::new().unwrap();
    let workbook = init_workbook(&dir);

    naac()
        .arg("--workbook")
        .arg(&workbook)
        .args(["list", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nope"));
}

#[test]
fn test_missing_required_field_fails() {
    let dir = TempDir::new().unwrap();
    let workbook = init_workbook(&dir);

    naac()
        .arg("--workbook")
        .arg(&workbook)
        .args(["add", "awards", "--data", r#"{"year":"2021"}"#])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing required field"));

    assert_eq!(list_json(&workbook, "awards"), serde_json::json!([]));
}

#[test]
fn test_missing_workbook_fails() {
    let dir = TempDir::new().unwrap();
    naac()
        .arg("--workbook")
        .arg(dir.path().join("absent.xlsx"))
        .args(["list", "awards"])
        .assert()
        .failure();
}
