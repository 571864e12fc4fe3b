//! These tests are for testing some valid config files.

use assert_cmd::prelude::*;

use crate::util::cpuload_command;

#[test]
fn test_empty() {
    cpuload_command(&["-C", "./tests/valid_configs/empty_config.toml", "--identity"])
        .assert()
        .success();
}

#[test]
fn test_numeric_interval() {
    cpuload_command(&["-C", "./tests/valid_configs/numeric_interval.toml", "--identity"])
        .assert()
        .success();
}

#[cfg(any(
    target_os = "linux",
    target_os = "macos",
    target_os = "windows",
    target_os = "freebsd"
))]
#[test]
fn test_fast_sampling() {
    use predicates::prelude::*;

    cpuload_command(&["-C", "./tests/valid_configs/fast_sampling.toml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("CPU load:").count(4));
}
