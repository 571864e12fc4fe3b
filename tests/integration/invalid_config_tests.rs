//! These tests are for testing some invalid config-file-specific options.

use assert_cmd::prelude::*;
use predicates::prelude::*;

use crate::util::cpuload_command;

#[test]
fn test_toml_mismatch_type() {
    cpuload_command(&["-C", "./tests/invalid_configs/toml_mismatch_type.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid type"));
}

#[test]
fn test_broken_toml() {
    cpuload_command(&["-C", "./tests/invalid_configs/broken.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration file error"));
}

#[test]
fn test_zero_interval() {
    cpuload_command(&["-C", "./tests/invalid_configs/zero_interval.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("'interval' must be greater than 0"));
}

#[test]
fn test_invalid_interval() {
    cpuload_command(&["-C", "./tests/invalid_configs/invalid_interval.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "'interval' was set with an invalid value",
        ));
}

#[test]
fn test_zero_samples() {
    cpuload_command(&["-C", "./tests/invalid_configs/zero_samples.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("'samples' must be greater than 0"));
}

#[test]
fn test_arg_overrides_invalid_interval() {
    cpuload_command(&[
        "-C",
        "./tests/invalid_configs/invalid_interval.toml",
        "--identity",
        "-i",
        "1s",
    ])
    .assert()
    .success();
}
