//! Integration tests for the sql-review binary.

use std::io::Write;

use assert_cmd::{Command, cargo::cargo_bin_cmd};
use predicates::prelude::*;
use tempfile::{Builder, NamedTempFile, TempDir};

const POLICY: &str = r#"
rules:
  - type: column.maximum-varchar-length
    dialect: mysql
    level: warning
    payload:
      number: 255
  - type: statement.select.no-select-all
    dialect: mysql
    level: error
"#;

/// Command isolated from the user's config files and environment.
fn cmd(home: &TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("sql-review");
    cmd.env("HOME", home.path())
        .current_dir(home.path())
        .env_remove("SQL_REVIEW_DIALECT")
        .env_remove("SQL_REVIEW_POLICY")
        .env_remove("SQL_REVIEW_TIMEOUT_MS");
    cmd
}

fn file(suffix: &str, content: &str) -> NamedTempFile {
    let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
    write!(file, "{}", content).unwrap();
    file
}

fn check_args<'a>(sql: &'a NamedTempFile, policy: &'a NamedTempFile) -> Vec<&'a str> {
    vec![
        "check",
        "-f",
        sql.path().to_str().unwrap(),
        "-d",
        "mysql",
        "-p",
        policy.path().to_str().unwrap(),
        "--no-color",
    ]
}

#[test]
fn test_check_clean_sql_accepts() {
    let home = TempDir::new().unwrap();
    let sql = file(".sql", "CREATE TABLE t (a VARCHAR(20));\nSELECT a FROM t;\n");
    let policy = file(".yaml", POLICY);

    cmd(&home)
        .args(check_args(&sql, &policy))
        .assert()
        .code(0)
        .stdout(predicate::str::contains("Status: SUCCESS"));
}

#[test]
fn test_check_warning_accepts() {
    let home = TempDir::new().unwrap();
    let sql = file(".sql", "CREATE TABLE t (a VARCHAR(300));\n");
    let policy = file(".yaml", POLICY);

    cmd(&home)
        .args(check_args(&sql, &policy))
        .assert()
        .code(0)
        .stdout(predicate::str::contains("[WARN]"));
}

#[test]
fn test_check_error_rejects() {
    let home = TempDir::new().unwrap();
    let sql = file(".sql", "SELECT * FROM t;\n");
    let policy = file(".yaml", POLICY);

    cmd(&home)
        .args(check_args(&sql, &policy))
        .assert()
        .code(1)
        .stdout(predicate::str::contains("uses SELECT all"));
}

#[test]
fn test_check_parse_failure() {
    let home = TempDir::new().unwrap();
    let sql = file(".sql", "CREATE TABLE (id INT);\n");
    let policy = file(".yaml", POLICY);

    cmd(&home)
        .args(check_args(&sql, &policy))
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn test_check_unknown_rule_reports_rule_error() {
    let home = TempDir::new().unwrap();
    let sql = file(".sql", "SELECT 1;\n");
    let policy = file(
        ".yaml",
        "rules:\n  - type: naming.table\n    dialect: mysql\n    level: error\n"
    );

    cmd(&home)
        .args(check_args(&sql, &policy))
        .assert()
        .code(2)
        .stdout(predicate::str::contains("Rules not evaluated"));
}

#[test]
fn test_check_json_from_stdin() {
    let home = TempDir::new().unwrap();
    let policy = file(".yaml", POLICY);

    cmd(&home)
        .args([
            "check",
            "-f",
            "-",
            "-d",
            "mysql",
            "-p",
            policy.path().to_str().unwrap(),
            "-o",
            "json"
        ])
        .write_stdin("SELECT * FROM users")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("\"status\": \"ERROR\""));
}

#[test]
fn test_check_with_catalog() {
    let home = TempDir::new().unwrap();
    let sql = file(".sql", "CREATE TABLE users (id INT);\n");
    let catalog = file(".sql", "CREATE TABLE users (id INT, email TEXT);\n");
    let policy = file(
        ".yaml",
        "rules:\n  - type: table.no-redefinition\n    dialect: mysql\n    level: error\n"
    );

    cmd(&home)
        .args(check_args(&sql, &policy))
        .args(["-c", catalog.path().to_str().unwrap()])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn test_check_with_mixed_case_json_catalog() {
    let home = TempDir::new().unwrap();
    let sql = file(".sql", "CREATE TABLE Users (id INT);\n");
    let catalog = file(
        ".json",
        r#"{"tables": {"Users": {"name": "Users", "columns": []}}}"#
    );
    let policy = file(
        ".yaml",
        "rules:\n  - type: table.no-redefinition\n    dialect: mysql\n    level: error\n"
    );

    cmd(&home)
        .args(check_args(&sql, &policy))
        .args(["-c", catalog.path().to_str().unwrap()])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Table `Users` already exists"));
}

#[test]
fn test_check_dialect_from_local_config() {
    let home = TempDir::new().unwrap();
    let policy = file(".yaml", POLICY);
    std::fs::write(
        home.path().join(".sql-review.toml"),
        format!(
            "[review]\ndialect = \"mysql\"\npolicy = {:?}\n",
            policy.path().to_str().unwrap()
        )
    )
    .unwrap();
    let sql = file(".sql", "SELECT * FROM t;\n");

    cmd(&home)
        .args(["check", "-f", sql.path().to_str().unwrap(), "--no-color"])
        .assert()
        .code(1);
}

#[test]
fn test_check_without_dialect_fails() {
    let home = TempDir::new().unwrap();
    let sql = file(".sql", "SELECT 1;\n");
    let policy = file(".yaml", POLICY);

    cmd(&home)
        .args(["check", "-f", sql.path().to_str().unwrap(), "-p", policy.path().to_str().unwrap()])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn test_check_missing_file() {
    let home = TempDir::new().unwrap();
    let policy = file(".yaml", POLICY);

    cmd(&home)
        .args([
            "check",
            "-f",
            "/nonexistent/migration.sql",
            "-d",
            "mysql",
            "-p",
            policy.path().to_str().unwrap()
        ])
        .assert()
        .code(2);
}

#[test]
fn test_rules_command() {
    let home = TempDir::new().unwrap();

    cmd(&home)
        .args(["rules", "--dialect", "mysql"])
        .assert()
        .success()
        .stdout(predicate::str::contains("table.no-redefinition"))
        .stdout(predicate::str::contains("naming.table").not());
}

#[test]
fn test_help() {
    let home = TempDir::new().unwrap();
    cmd(&home).arg("--help").assert().success();
}

#[test]
fn test_version() {
    let home = TempDir::new().unwrap();
    cmd(&home).arg("--version").assert().success();
}
