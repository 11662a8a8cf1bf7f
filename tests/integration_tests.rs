//! Integration tests for the mathdb CLI
//!
//! These tests run the binary end-to-end on a copy of the sample data.

mod common;

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

use common::sample_data;

/// Helper to get a mathdb command that ignores the caller's environment
fn mathdb() -> Command {
    let mut cmd = Command::cargo_bin("mathdb").unwrap();
    for var in ["MATHDB_DATA_DIR", "MATHDB_OUTPUT_DIR", "MATHDB_HOST", "MATHDB_PORT", "MATHDB_DEPLOY_URL", "RUST_LOG"] {
        cmd.env_remove(var);
    }
    cmd
}

// ============================================================================
// Build
// ============================================================================

#[test]
fn test_build_writes_site_next_to_data() {
    let (tmp, data) = sample_data();

    mathdb()
        .arg("build")
        .arg(&data)
        .assert()
        .success()
        .stdout(predicate::str::contains("✓ equations (4 records)"))
        .stdout(predicate::str::contains("✓ mathematicians (4 records)"))
        .stdout(predicate::str::contains("graph authors"))
        .stdout(predicate::str::contains("bibliography"));

    let docs = tmp.path().join("docs");
    for page in [
        "index.html",
        "styles.css",
        "bibliography.html",
        "graphs/authors.html",
        "equations/index.html",
        "equations/euler_identity.html",
        "equations/fermat_last_theorem.html",
        "mathematicians/index.html",
        "mathematicians/euler.html",
    ] {
        assert!(docs.join(page).exists(), "missing {}", page);
    }
}

#[test]
fn test_build_links_are_relative() {
    let (tmp, data) = sample_data();
    mathdb().arg("build").arg(&data).assert().success();
    let docs = tmp.path().join("docs");

    let index = fs::read_to_string(docs.join("index.html")).unwrap();
    assert!(index.contains("href=\"equations/index.html\""));

    // The author column links to the mathematician's page
    let identity = fs::read_to_string(docs.join("equations/euler_identity.html")).unwrap();
    assert!(identity.contains("href=\"../mathematicians/euler.html\""));
    assert!(identity.contains("Leonhard Euler"));
    assert!(!identity.contains("edit_"));

    // ...and the derived column lists it back
    let euler = fs::read_to_string(docs.join("mathematicians/euler.html")).unwrap();
    assert!(euler.contains("href=\"../equations/euler_identity.html\""));
    assert!(euler.contains("Leonhard Euler (1707–1783)"));

    // An author with no record is plain text
    let fermat = fs::read_to_string(docs.join("equations/fermat_last_theorem.html")).unwrap();
    assert!(fermat.contains("Pierre de Fermat"));
    assert!(!fermat.contains("unresolved-reference"));
}

#[test]
fn test_build_custom_output_dir() {
    let (tmp, data) = sample_data();
    let out = tmp.path().join("public");

    mathdb()
        .arg("build")
        .arg(&data)
        .arg("--output_dir")
        .arg(&out)
        .assert()
        .success();

    assert!(out.join("index.html").exists());
    assert!(!tmp.path().join("docs").exists());
}

#[test]
fn test_build_deploy_uses_configured_url() {
    let (tmp, data) = sample_data();

    mathdb()
        .env("MATHDB_DEPLOY_URL", "https://math.example.org/db")
        .arg("build")
        .arg(&data)
        .arg("--deploy")
        .assert()
        .success();

    let index = fs::read_to_string(tmp.path().join("docs/index.html")).unwrap();
    assert!(index.contains("href=\"https://math.example.org/db/equations/index.html\""));
}

#[test]
fn test_build_missing_data_dir_fails() {
    let tmp = TempDir::new().unwrap();

    mathdb()
        .arg("build")
        .arg(tmp.path().join("nope"))
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_build_without_tables_fails() {
    let tmp = TempDir::new().unwrap();
    let data = tmp.path().join("data");
    fs::create_dir_all(data.join("notes")).unwrap();

    mathdb()
        .arg("build")
        .arg(&data)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("no tables were built"));
}

#[test]
fn test_build_skips_table_without_schema() {
    let (tmp, data) = sample_data();
    fs::create_dir(data.join("notes")).unwrap();
    fs::write(data.join("notes/001.json"), r#"{"id": 1}"#).unwrap();

    mathdb()
        .arg("build")
        .arg(&data)
        .assert()
        .success()
        .stdout(predicate::str::contains("notes skipped: no schema"));

    assert!(!tmp.path().join("docs/notes").exists());
}

// ============================================================================
// Check
// ============================================================================

#[test]
fn test_check_sample_data_is_clean() {
    let (_tmp, data) = sample_data();

    mathdb()
        .arg("check")
        .arg(&data)
        .assert()
        .success()
        .stdout(predicate::str::contains("0 errors, 0 warnings"));
}

#[test]
fn test_check_reports_malformed_json() {
    let (_tmp, data) = sample_data();
    fs::write(data.join("equations/009_broken.json"), "{\"id\": 9,\n  \"name\": }\n").unwrap();

    mathdb()
        .arg("check")
        .arg(&data)
        .assert()
        .failure()
        .stdout(predicate::str::contains("009_broken.json"))
        .stdout(predicate::str::contains("1 error,"));
}

#[test]
fn test_check_reports_unknown_column_type() {
    let (_tmp, data) = sample_data();
    fs::write(
        data.join("mathematicians/schema.json"),
        r#"{"columns": [{"name": "name", "type": "string"}, {"name": "portrait", "type": "image"}]}"#,
    )
    .unwrap();

    mathdb()
        .arg("check")
        .arg(&data)
        .assert()
        .failure()
        .stdout(predicate::str::contains("unknown type 'image'"));
}

#[test]
fn test_check_unresolved_reference_is_a_warning() {
    let (_tmp, data) = sample_data();
    fs::write(
        data.join("equations/005_riemann.json"),
        r##"{"id": 5, "short_name": "riemann", "name": "Riemann hypothesis", "description": "See #riemann_zeta."}"##,
    )
    .unwrap();

    mathdb()
        .arg("check")
        .arg(&data)
        .assert()
        .success()
        .stdout(predicate::str::contains("equations/riemann - unresolved reference #riemann_zeta"))
        .stdout(predicate::str::contains("1 warning"));

    mathdb().arg("check").arg(&data).arg("--strict").assert().failure();
}

// ============================================================================
// List, completions, help
// ============================================================================

#[test]
fn test_list_tables() {
    let (_tmp, data) = sample_data();

    mathdb()
        .arg("list")
        .arg(&data)
        .assert()
        .success()
        .stdout(predicate::str::contains("| Table"))
        .stdout(predicate::str::contains("| equations"))
        .stdout(predicate::str::contains("| mathematicians"));
}

#[test]
fn test_completions_bash() {
    mathdb()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("mathdb"));
}

#[test]
fn test_help_lists_commands() {
    mathdb()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("build"))
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("check"));
}

#[test]
fn test_unknown_command_fails() {
    mathdb().arg("frobnicate").assert().failure();
}
