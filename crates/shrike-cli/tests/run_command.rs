use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;

#[allow(deprecated)]
fn get_shrike_bin() -> PathBuf {
    assert_cmd::cargo::cargo_bin("shrike")
}

#[test]
fn test_help_lists_flag_surface() {
    let mut cmd = Command::new(get_shrike_bin());
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Smoke-test a page in headless Chrome"))
        .stdout(predicate::str::contains("--screenshot-dir"))
        .stdout(predicate::str::contains("--desktop-viewport"))
        .stdout(predicate::str::contains("--mobile-viewport"))
        .stdout(predicate::str::contains("--wait"))
        .stdout(predicate::str::contains("--timeout"))
        .stdout(predicate::str::contains("--chrome-path"))
        .stdout(predicate::str::contains("--format"));
}

#[test]
fn test_default_target_url_in_help() {
    let mut cmd = Command::new(get_shrike_bin());
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("http://localhost:3000"));
}

#[test]
fn test_invalid_viewport_is_rejected_at_parse() {
    let mut cmd = Command::new(get_shrike_bin());
    cmd.arg("--desktop-viewport").arg("wide");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("WIDTHxHEIGHT"));
}

#[test]
fn test_invalid_wait_policy_is_rejected_at_parse() {
    let mut cmd = Command::new(get_shrike_bin());
    cmd.arg("--wait").arg("eventually");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("networkidle"));
}

#[test]
fn test_invalid_target_url_fails_before_browser_work() {
    let temp = tempfile::tempdir().unwrap();

    let mut cmd = Command::new(get_shrike_bin());
    cmd.arg("not a url")
        .arg("--screenshot-dir")
        .arg(temp.path())
        .arg("--chrome-path")
        .arg("/nonexistent/chrome");

    // URL validation runs first, so the bogus chrome path is never reached
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Invalid target URL"));
}

#[test]
fn test_missing_chrome_binary_fails_with_hint() {
    let temp = tempfile::tempdir().unwrap();

    let mut cmd = Command::new(get_shrike_bin());
    cmd.arg("http://127.0.0.1:1")
        .arg("--screenshot-dir")
        .arg(temp.path())
        .arg("--chrome-path")
        .arg("/nonexistent/chrome");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_format_flag_accepts_json() {
    // Parsing succeeds; the run itself fails on the bogus chrome path
    let temp = tempfile::tempdir().unwrap();

    let mut cmd = Command::new(get_shrike_bin());
    cmd.arg("http://127.0.0.1:1")
        .arg("--format")
        .arg("json")
        .arg("--screenshot-dir")
        .arg(temp.path())
        .arg("--chrome-path")
        .arg("/nonexistent/chrome");

    cmd.assert().failure();
}
