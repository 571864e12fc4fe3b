//! How cpuload handles arguments and config files.
//!
//! Command-line arguments take precedence over the config file, which takes
//! precedence over the defaults.

pub mod args;
pub mod config;
pub mod error;

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use self::{
    args::Args,
    config::{Config, StringOrNum},
    error::{OptionError, OptionResult},
};
use crate::collection::cpu::DEFAULT_INTERVAL;

pub const DEFAULT_CONFIG_FILE_LOCATION: &str = "cpuload/cpuload.toml";

pub const DEFAULT_SAMPLES: u64 = 1;

/// What the binary should print.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Report {
    /// Identity, then CPU load readings.
    All,
    Identity,
    System,
}

/// Resolved settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CpuloadOptions {
    pub interval: Duration,
    pub samples: u64,
    pub report: Report,
}

/// Returns the config path to use, if any. An explicitly given path is always
/// returned; the default location only if a file exists there.
pub fn get_config_path(override_config_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(conf_loc) = override_config_path {
        return Some(conf_loc.to_path_buf());
    }

    dirs::config_dir()
        .map(|path| path.join(DEFAULT_CONFIG_FILE_LOCATION))
        .filter(|path| path.exists())
}

/// Reads and parses the config file at `config_path`, or returns the default
/// config if there is none.
pub fn get_or_read_config(config_path: Option<&Path>) -> OptionResult<Config> {
    let Some(path) = config_path else {
        return Ok(Config::default());
    };

    let contents =
        fs::read_to_string(path).map_err(|err| OptionError::unreadable_config(path, err))?;

    log::debug!("using config file at {}", path.display());

    Ok(toml_edit::de::from_str(&contents)?)
}

/// Merges the arguments and config into the final settings.
pub fn init(args: &Args, config: &Config) -> OptionResult<CpuloadOptions> {
    let report = if args.identity {
        Report::Identity
    } else if args.system {
        Report::System
    } else {
        Report::All
    };

    Ok(CpuloadOptions {
        interval: get_interval(args, config)?,
        samples: get_samples(args, config)?,
        report,
    })
}

/// Parses a duration given as a number of milliseconds or a human duration
/// like `1s` or `250ms`.
fn parse_duration(value: &str) -> Option<Duration> {
    let value = value.trim();

    if let Ok(ms) = value.parse::<u64>() {
        Some(Duration::from_millis(ms))
    } else {
        humantime::parse_duration(value).ok()
    }
}

fn get_interval(args: &Args, config: &Config) -> OptionResult<Duration> {
    let interval = if let Some(interval) = &args.interval {
        parse_duration(interval).ok_or_else(|| OptionError::invalid_arg_value("interval"))?
    } else {
        match &config.cpu.interval {
            Some(StringOrNum::Num(ms)) => Duration::from_millis(*ms),
            Some(StringOrNum::String(interval)) => parse_duration(interval)
                .ok_or_else(|| OptionError::invalid_config_value("interval"))?,
            None => DEFAULT_INTERVAL,
        }
    };

    if interval.is_zero() {
        return Err(if args.interval.is_some() {
            OptionError::arg("'--interval' must be greater than 0.")
        } else {
            OptionError::config("'interval' must be greater than 0.")
        });
    }

    Ok(interval)
}

fn get_samples(args: &Args, config: &Config) -> OptionResult<u64> {
    match (args.samples, config.cpu.samples) {
        (Some(0), _) => Err(OptionError::arg("'--samples' must be greater than 0.")),
        (Some(samples), _) => Ok(samples),
        (None, Some(0)) => Err(OptionError::config("'samples' must be greater than 0.")),
        (None, Some(samples)) => Ok(samples),
        (None, None) => Ok(DEFAULT_SAMPLES),
    }
}
