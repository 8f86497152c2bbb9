// ABOUTME: Integration tests for the vnollx-deploy binary surface.
// ABOUTME: Validates help/version output without driving a real deploy.

use assert_cmd::Command;
use predicates::prelude::*;

fn deploy_cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("vnollx-deploy"))
}

#[test]
fn help_shows_about_and_flags() {
    deploy_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("redeploy"))
        .stdout(predicate::str::contains("--verbose"));
}

#[test]
fn version_flag_prints_the_package_version() {
    deploy_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn unknown_flags_are_rejected() {
    deploy_cmd()
        .arg("--bogus")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unexpected argument"));
}
