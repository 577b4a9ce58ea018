//! CLI integration tests using assert_cmd.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn vakya() -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("vakya").unwrap();
    cmd.env_remove("VAKYA_AUTH_URL")
        .env_remove("VAKYA_SENTENCE_URL")
        .env_remove("RUST_LOG");
    cmd
}

/// Writes a config whose services are unreachable and whose token file
/// lives inside `dir`.
fn write_config(dir: &Path) -> PathBuf {
    let config = format!(
        r#"
auth_url = "http://127.0.0.1:1/api"
sentence_url = "http://127.0.0.1:1"
verb_quiz_url = "http://127.0.0.1:1"
timeout_secs = 2
token_path = "{}"
"#,
        dir.join("credentials.json").display()
    );
    let path = dir.join("vakya.toml");
    std::fs::write(&path, config).unwrap();
    path
}

fn log_in(dir: &Path) {
    std::fs::write(
        dir.join("credentials.json"),
        r#"{"token":"test-token","user":{"email":"arjuna@example.com"},"saved_at":"2024-05-01T10:00:00Z"}"#,
    )
    .unwrap();
}

#[test]
fn init_creates_config() {
    let dir = TempDir::new().unwrap();

    vakya()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created vakya.toml"));

    let content = std::fs::read_to_string(dir.path().join("vakya.toml")).unwrap();
    assert!(content.contains("sentence_url"));
}

#[test]
fn init_skips_existing() {
    let dir = TempDir::new().unwrap();

    vakya().current_dir(dir.path()).arg("init").assert().success();

    vakya()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn status_when_logged_out() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path());

    vakya()
        .arg("status")
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("logged out"));
}

#[test]
fn status_when_logged_in() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path());
    log_in(dir.path());

    vakya()
        .arg("status")
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("logged in"))
        .stdout(predicate::str::contains("arjuna@example.com"));
}

#[test]
fn play_requires_login() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path());

    vakya()
        .arg("play")
        .arg("--offline")
        .arg("--config")
        .arg(&config)
        .write_stdin("quit\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not logged in"));
}

#[test]
fn profile_requires_login() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path());

    vakya()
        .arg("profile")
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("not logged in"));
}

#[test]
fn offline_round_is_solved() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path());
    log_in(dir.path());

    vakya()
        .arg("play")
        .arg("--offline")
        .arg("--seed")
        .arg("42")
        .arg("--config")
        .arg(&config)
        .write_stdin("place रामः subject\nplace गच्छति verb\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Sentence: रामः गच्छति"))
        .stdout(predicate::str::contains("Correct! Well done!"));
}

#[test]
fn unreachable_sentence_service_falls_back() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path());
    log_in(dir.path());

    vakya()
        .arg("play")
        .arg("--config")
        .arg(&config)
        .write_stdin("hints\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("built-in sentence"))
        .stdout(predicate::str::contains("Object: No object in this sentence"));
}

#[test]
fn logout_clears_token() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path());
    log_in(dir.path());

    vakya()
        .arg("logout")
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged out."));
    assert!(!dir.path().join("credentials.json").exists());

    vakya()
        .arg("logout")
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Not logged in."));
}

#[test]
fn login_validates_before_sending() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path());

    vakya()
        .args(["login", "--email", "", "--password", "secret"])
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Please fill in all fields"));
}

#[test]
fn register_rejects_mismatched_passwords() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path());

    vakya()
        .args([
            "register",
            "--name",
            "Arjuna",
            "--email",
            "arjuna@example.com",
            "--password",
            "one",
            "--confirm-password",
            "two",
        ])
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Passwords do not match"));
}

#[test]
fn login_against_unreachable_server() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path());

    vakya()
        .args(["login", "--email", "a@b.c", "--password", "secret"])
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cannot connect to server"));
    assert!(!dir.path().join("credentials.json").exists());
}

#[test]
fn missing_config_file_is_an_error() {
    vakya()
        .args(["status", "--config", "no_such_vakya.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("config file not found"));
}

#[test]
fn help_output() {
    vakya()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Sanskrit sentence-analysis drill"));
}
