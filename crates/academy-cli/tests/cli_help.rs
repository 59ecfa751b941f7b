use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

#[test]
fn test_help_shows_all_commands() {
    cargo_bin_cmd!("academy")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("login"))
        .stdout(predicate::str::contains("logout"))
        .stdout(predicate::str::contains("dashboard"))
        .stdout(predicate::str::contains("users"))
        .stdout(predicate::str::contains("students"));
}

#[test]
fn test_users_help_shows_subcommands() {
    cargo_bin_cmd!("academy")
        .args(["users", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("show"))
        .stdout(predicate::str::contains("toggle"))
        .stdout(predicate::str::contains("add"));
}

#[test]
fn test_profile_help_shows_complete() {
    cargo_bin_cmd!("academy")
        .args(["profile", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("complete"));
}

#[test]
fn test_version_flag() {
    cargo_bin_cmd!("academy")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("1.0"));
}
