//! Tests that run the compiled `gitbackup` binary.
//!
//! None of these reach a document store or container: they cover argument
//! handling, configuration errors and exit codes.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const ENV_VARS: &[&str] = &[
    "OVERLEAF_MONGO_URL",
    "OVERLEAF_CONTAINER_NAME",
    "GITBACKUP_OVERLEAF_PATH",
    "GITBACKUP_HOST_PATH",
    "GITBACKUP_CONFIG",
    "RUST_LOG",
];

/// A `gitbackup` command with a clean environment.
fn gitbackup() -> Command {
    let mut cmd = Command::cargo_bin("gitbackup").expect("Failed to find gitbackup binary");
    for var in ENV_VARS {
        cmd.env_remove(var);
    }
    cmd
}

#[test]
fn help_lists_subcommands() {
    gitbackup()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("project"))
        .stdout(predicate::str::contains("projects"))
        .stdout(predicate::str::contains("history"));
}

#[test]
fn missing_subcommand_is_a_usage_error() {
    gitbackup().assert().failure().code(2);
}

#[test]
fn listing_without_store_uri_exits_with_config_code() {
    gitbackup()
        .args(["projects", "alice@example.com"])
        .assert()
        .code(78)
        .stderr(predicate::str::contains("OVERLEAF_MONGO_URL"));
}

#[test]
fn export_without_container_exits_with_config_code() {
    gitbackup()
        .args([
            "project",
            "alice@example.com",
            "64b7f0c2e4b0a1a2b3c4d5e6",
            "--mongo-url",
            "mongodb://127.0.0.1:1/sharelatex",
        ])
        .assert()
        .code(78)
        .stderr(predicate::str::contains("OVERLEAF_CONTAINER_NAME"));
}

#[test]
fn malformed_store_uri_exits_with_config_code() {
    gitbackup()
        .args(["projects", "alice@example.com", "--mongo-url", "mongodb://host-only"])
        .assert()
        .code(78)
        .stderr(predicate::str::contains("database"));
}

#[test]
fn store_uri_is_read_from_environment() {
    gitbackup()
        .env("OVERLEAF_MONGO_URL", "not a uri")
        .args(["projects", "alice@example.com"])
        .assert()
        .code(78)
        .stderr(predicate::str::contains("OVERLEAF_MONGO_URL").not());
}

#[test]
fn json_errors_are_structured() {
    let output = gitbackup()
        .args(["projects", "alice@example.com", "--json"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(78));
    let body: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(body["error"], "configuration");
    assert_eq!(body["retryable"], false);
    assert_eq!(body["exit_code"], 78);
}

#[test]
fn config_file_supplies_settings() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("gitbackup.toml");
    std::fs::write(&file, "mongo_url = \"mongodb://127.0.0.1:1/sharelatex\"\n").unwrap();

    // The store address is now valid, so the missing container is what fails.
    gitbackup()
        .args(["project", "alice@example.com", "64b7f0c2e4b0a1a2b3c4d5e6", "--config"])
        .arg(&file)
        .assert()
        .code(78)
        .stderr(predicate::str::contains("container name"));
}

#[test]
fn unknown_config_key_is_rejected() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("gitbackup.toml");
    std::fs::write(&file, "mongo_uri = \"mongodb://mongo/sharelatex\"\n").unwrap();

    gitbackup()
        .args(["projects", "alice@example.com", "--config"])
        .arg(&file)
        .assert()
        .code(78);
}

#[test]
fn history_of_missing_workspace_is_not_found() {
    let temp = TempDir::new().unwrap();

    gitbackup()
        .args(["history", "alice@example.com", "P1", "--host-path"])
        .arg(temp.path())
        .assert()
        .code(67);
}

#[test]
fn history_of_empty_workspace_prints_nothing_to_show() {
    let temp = TempDir::new().unwrap();
    let ws = temp.path().join("alice@example.com").join("projects.git");
    std::fs::create_dir_all(&ws).unwrap();
    gitbackup_test_utils::git::real_git_repo(&ws);

    gitbackup()
        .args(["history", "alice@example.com", "--host-path"])
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No snapshots yet."));
}

#[test]
fn escaping_identity_is_a_validation_error() {
    let temp = TempDir::new().unwrap();

    gitbackup()
        .args(["history", "..", "--host-path"])
        .arg(temp.path())
        .assert()
        .code(65);
}
