use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

// Nothing listens on port 1, so every fetch fails fast.
const DEAD_ENDPOINT: &str = "http://127.0.0.1:1";


fn fraudboard(config: &Path) -> Command {
    let mut cmd = Command::cargo_bin("fraudboard").unwrap();
    cmd.env_remove("RUST_LOG")
        .env_remove("FRAUDBOARD_ENDPOINT")
        .arg("--config")
        .arg(config);
    cmd
}


fn empty_config(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "").unwrap();
    path
}


#[test]
fn test_help_lists_commands() {
    Command::cargo_bin("fraudboard")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("watch"))
        .stdout(predicate::str::contains("print"))
        .stdout(predicate::str::contains("export"));
}


#[test]
fn test_no_subcommand_prints_help() {
    Command::cargo_bin("fraudboard")
        .unwrap()
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"));
}


#[test]
fn test_missing_config_file_fails() {
    let temp_dir = TempDir::new().unwrap();

    fraudboard(&temp_dir.path().join("missing.toml"))
        .arg("print")
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("Error:"))
        .stderr(predicate::str::contains("Failed to read config file"));
}


#[test]
fn test_invalid_config_file_fails() {
    let temp_dir = TempDir::new().unwrap();
    let config = temp_dir.path().join("config.toml");
    std::fs::write(&config, "endpoint = [").unwrap();

    fraudboard(&config)
        .arg("print")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid config file"));
}


#[test]
fn test_print_survives_fetch_failure() {
    let temp_dir = TempDir::new().unwrap();

    fraudboard(&empty_config(&temp_dir))
        .args(["--endpoint", DEAD_ENDPOINT, "print", "--period", "7"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Fraudboard · period 7"))
        .stderr(predicate::str::contains("Error loading dashboard data"));
}


#[test]
fn test_endpoint_from_environment() {
    let temp_dir = TempDir::new().unwrap();

    fraudboard(&empty_config(&temp_dir))
        .env("FRAUDBOARD_ENDPOINT", DEAD_ENDPOINT)
        .arg("print")
        .assert()
        .success()
        .stderr(predicate::str::contains("Error loading dashboard data"));
}


#[test]
fn test_invalid_endpoint_fails() {
    let temp_dir = TempDir::new().unwrap();

    fraudboard(&empty_config(&temp_dir))
        .args(["--endpoint", "not a url", "print"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}


#[test]
fn test_export_without_charts_fails() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("charts");

    fraudboard(&empty_config(&temp_dir))
        .args(["--endpoint", DEAD_ENDPOINT, "export", "--svg", "--output"])
        .arg(&output)
        .assert()
        .failure()
        .stderr(predicate::str::contains("No charts were rendered"));

    assert!(!output.exists());
}
