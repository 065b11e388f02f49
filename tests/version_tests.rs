use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_version_command() {
    Command::cargo_bin("buildwatch")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));

    Command::cargo_bin("buildwatch")
        .unwrap()
        .arg("-V")
        .assert()
        .success()
        .stdout(predicate::str::contains("buildwatch"));
}
