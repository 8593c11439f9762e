// registry-check/tests/cli_integration.rs

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::{NamedTempFile, TempDir};

/// Helper to create a test config file
fn create_test_config(content: &str) -> NamedTempFile {
    let file = NamedTempFile::new().expect("Failed to create temp file");
    fs::write(file.path(), content).expect("Failed to write to temp file");
    file
}

/// Command with no config discovery or RC_* overrides leaking in from the host
fn isolated_cmd(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("registry-check").unwrap();
    cmd.current_dir(home.path())
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join(".config"))
        .env_remove("RC_CONFIG")
        .env_remove("RC_ADDRESS")
        .env_remove("RC_PORT")
        .env_remove("RC_CLIENT_ID")
        .env_remove("RC_TRID_LABEL")
        .env_remove("RC_ZONES")
        .env_remove("RUST_LOG");
    cmd
}

const TEST_CONFIG: &str = r#"
[check]
zones = ["app", "dev"]

[engine.registered]
"taken.app" = "In use"

[engine.premium]
"rich.dev" = "premium"
"#;

#[test]
fn test_help_lists_subcommands() {
    let mut cmd = Command::cargo_bin("registry-check").unwrap();
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("check"))
        .stdout(predicate::str::contains("query"))
        .stdout(predicate::str::contains("--config"));
}

#[test]
fn test_check_available_with_defaults() {
    let home = TempDir::new().unwrap();
    isolated_cmd(&home)
        .args(["check", "example.how"])
        .assert()
        .success()
        .stdout("{\"status\":\"success\",\"available\":true,\"tier\":\"standard\"}\n");
}

#[test]
fn test_check_uses_config_file() {
    let home = TempDir::new().unwrap();
    let config = create_test_config(TEST_CONFIG);
    let config_path = config.path().to_str().unwrap();

    isolated_cmd(&home)
        .args(["check", "taken.app", "--config", config_path])
        .assert()
        .success()
        .stdout("{\"status\":\"success\",\"available\":false,\"reason\":\"In use\"}\n");

    isolated_cmd(&home)
        .args(["check", "RICH.dev", "--config", config_path])
        .assert()
        .success()
        .stdout("{\"status\":\"success\",\"available\":true,\"tier\":\"premium\"}\n");

    // "how" is not managed by this config
    isolated_cmd(&home)
        .args(["check", "example.how", "--config", config_path])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Must supply a valid domain name on an authoritative TLD",
        ));
}

#[test]
fn test_local_config_is_discovered() {
    let home = TempDir::new().unwrap();
    fs::write(home.path().join("registry-check.toml"), TEST_CONFIG).unwrap();

    isolated_cmd(&home)
        .args(["check", "taken.app"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"reason\":\"In use\""));
}

#[test]
fn test_env_and_cli_zone_overrides() {
    let home = TempDir::new().unwrap();

    isolated_cmd(&home)
        .env("RC_ZONES", "example")
        .args(["check", "shop.example"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"available\":true"));

    // CLI flag beats the environment
    isolated_cmd(&home)
        .env("RC_ZONES", "example")
        .args(["check", "shop.example", "--zones", "app"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"status\":\"error\""));
}

#[test]
fn test_unimplemented_engine_reason() {
    let home = TempDir::new().unwrap();
    let config = create_test_config("[engine]\nunimplemented = true\n");

    isolated_cmd(&home)
        .args(["check", "example.app", "--config"])
        .arg(config.path())
        .assert()
        .success()
        .stdout("{\"status\":\"error\",\"reason\":\"Command is not implemented\"}\n");
}

#[test]
fn test_invalid_input_is_not_echoed() {
    let home = TempDir::new().unwrap();
    isolated_cmd(&home)
        .args(["check", "<b>hello</b>.app"])
        .assert()
        .success()
        .stdout(predicate::str::contains("hello").not());
}

#[test]
fn test_bad_config_file_fails() {
    let home = TempDir::new().unwrap();
    let config = create_test_config("[server]\nport = 0\n");

    isolated_cmd(&home)
        .args(["check", "example.app", "--config"])
        .arg(config.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load config file"));

    isolated_cmd(&home)
        .args(["check", "example.app", "--config", "/nonexistent/registry-check.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn test_query_argument_validation() {
    let mut cmd = Command::cargo_bin("registry-check").unwrap();
    cmd.args(["query", "example.app", "--concurrency", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Concurrency must be between"));

    let mut cmd = Command::cargo_bin("registry-check").unwrap();
    cmd.args(["query"]).assert().failure();
}
