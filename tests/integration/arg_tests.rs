//! These tests are mostly here just to ensure that invalid results will be
//! caught when passing arguments.

use assert_cmd::prelude::*;
use predicates::prelude::*;

use crate::util::{cpuload_command, no_cfg_cpuload_command};

#[test]
fn test_zero_interval() {
    no_cfg_cpuload_command()
        .arg("-i")
        .arg("0")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "'--interval' must be greater than 0",
        ));
}

#[test]
fn test_invalid_interval() {
    no_cfg_cpuload_command()
        .arg("--interval")
        .arg("whenever")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "'--interval' was set with an invalid value",
        ));
}

#[test]
fn test_zero_samples() {
    no_cfg_cpuload_command()
        .arg("-n")
        .arg("0")
        .assert()
        .failure()
        .stderr(predicate::str::contains("'--samples' must be greater than 0"));
}

#[test]
fn test_non_numeric_samples() {
    no_cfg_cpuload_command()
        .arg("-n")
        .arg("lots")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value 'lots'"));
}

#[test]
fn test_identity_and_system_conflict() {
    no_cfg_cpuload_command()
        .arg("--identity")
        .arg("--system")
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn test_missing_config_file() {
    cpuload_command(&["-C", "./tests/valid_configs/does_not_exist.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("could not be read"));
}

#[test]
fn test_help() {
    cpuload_command(&["--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--interval"));
}

#[test]
fn test_version() {
    cpuload_command(&["--version"])
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_identity_report() {
    no_cfg_cpuload_command()
        .arg("--identity")
        .assert()
        .success()
        .stdout(predicate::str::contains("Processor:"))
        .stdout(predicate::str::contains("CPU load:").not());
}

#[test]
fn test_system_report() {
    no_cfg_cpuload_command()
        .arg("--system")
        .assert()
        .success()
        .stdout(predicate::str::contains("System CPU load:"))
        .stdout(predicate::str::contains("Load average:"));
}

#[cfg(any(
    target_os = "linux",
    target_os = "macos",
    target_os = "windows",
    target_os = "freebsd"
))]
mod measurement {
    use super::*;

    #[test]
    fn test_single_blocking_sample() {
        no_cfg_cpuload_command()
            .arg("--interval")
            .arg("50")
            .assert()
            .success()
            .stdout(predicate::str::contains("Identifier:"))
            .stdout(predicate::str::contains("CPU load:").count(1));
    }

    #[test]
    fn test_multiple_samples() {
        no_cfg_cpuload_command()
            .arg("-i")
            .arg("20ms")
            .arg("-n")
            .arg("3")
            .assert()
            .success()
            .stdout(predicate::str::contains("CPU load:").count(3));
    }
}
