use assert_cmd::Command;
use predicates::prelude::*;

fn simlog() -> Command {
    Command::cargo_bin("simlog").unwrap()
}

#[test]
fn help_lists_commands() {
    simlog()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("show"))
        .stdout(predicate::str::contains("hyperparams"));
}

#[test]
fn version_prints_package_version() {
    simlog()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn hyperparams_rejects_both_stream_selectors() {
    simlog()
        .args(["hyperparams", "--stream-name", "a", "--stream-prefix", "b"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn hyperparams_requires_a_stream_selector() {
    simlog().arg("hyperparams").assert().code(1);
}

#[test]
fn list_rejects_unknown_job_type() {
    simlog()
        .args(["list", "--job-type", "unknown"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid value"));
}
