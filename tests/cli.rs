//! End-to-end checks of argument parsing and startup failure modes.

use assert_cmd::Command;
use predicates::prelude::*;

fn bc4() -> Command {
    Command::cargo_bin("bc4").unwrap()
}

#[test]
fn help_lists_command_groups() {
    bc4()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("auth"))
        .stdout(predicate::str::contains("project"))
        .stdout(predicate::str::contains("todo"))
        .stdout(predicate::str::contains("campfire"));
}

#[test]
fn version_prints_package_version() {
    bc4()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn missing_client_credentials_is_actionable() {
    bc4()
        .args(["auth", "status"])
        .env_remove("BASECAMP_CLIENT_ID")
        .env_remove("BASECAMP_CLIENT_SECRET")
        .assert()
        .failure()
        .stderr(predicate::str::contains("BASECAMP_CLIENT_ID"));
}

#[test]
fn unknown_command_fails() {
    bc4().arg("frobnicate").assert().failure();
}
