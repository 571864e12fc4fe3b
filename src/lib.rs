//! cpuload reports what a host's processor is and how busy it is.
//!
//! CPU load is derived from the cumulative per-state tick counters every
//! kernel keeps. The platform's counters are first normalized into a
//! [`TickVector`](collection::cpu::TickVector) ordered `user, nice, system,
//! idle` (plus any extras), and then two such vectors are differenced:
//!
//! ```
//! use cpuload::collection::cpu::{cpu_load_between, TickVector};
//!
//! let before = TickVector::from([100, 0, 50, 850]);
//! let after = TickVector::from([120, 0, 60, 920]);
//!
//! assert_eq!(cpu_load_between(&before, &after), 30.0);
//! ```

#![warn(rust_2018_idioms)]

pub mod collection;
pub mod options;
pub mod utils {
    pub mod cancellation_token;
    pub mod logging;
}

use std::{path::Path, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;

use collection::{
    cpu::{cpu_load_between, CpuLoad, TickSource},
    error::{CollectionError, CollectionResult},
    identity::{IdentitySource, UNKNOWN_FREQUENCY},
    load::{SystemLoad, LOAD_AVERAGE_UNAVAILABLE},
    CentralProcessor,
};
use options::{args::Args, CpuloadOptions, Report};
use utils::cancellation_token::CancellationToken;

/// Formats an identity field, falling back to `unknown` if it could not be
/// read.
fn or_unknown<T: std::fmt::Display>(field: &str, value: CollectionResult<T>) -> String {
    match value {
        Ok(value) => value.to_string(),
        Err(err) => {
            log::warn!("could not read the processor {field}: {err}");
            "unknown".to_string()
        }
    }
}

fn print_identity<T: TickSource, I: IdentitySource>(processor: &CentralProcessor<T, I>) {
    let identity = processor.identity();

    println!("Processor: {}", or_unknown("name", identity.name()));
    println!("Vendor: {}", or_unknown("vendor", identity.vendor()));
    println!("Identifier: {}", or_unknown("identifier", identity.identifier()));

    let frequency = match identity.vendor_freq() {
        Ok(UNKNOWN_FREQUENCY) => "unknown".to_string(),
        other => or_unknown("frequency", other.map(|hz| format!("{hz} Hz"))),
    };
    println!("Frequency: {frequency}");

    let cpu64 = identity
        .is_cpu64bit()
        .map(|cpu64| if cpu64 { "yes" } else { "no" });
    println!("64-bit: {}", or_unknown("64-bit capability", cpu64));
}

fn print_system_load<T: TickSource, I: IdentitySource>(processor: &CentralProcessor<T, I>) {
    println!("System CPU load: {:.3}", processor.system_cpu_load());

    let load_average = processor.system_load_average();
    if load_average == LOAD_AVERAGE_UNAVAILABLE {
        println!("Load average: unavailable");
    } else {
        println!("Load average: {load_average:.2}");
    }
}

/// Prints `samples` CPU load readings.
///
/// A single reading uses the blocking measurement. Several readings reuse each
/// sample as the next reading's baseline, so `n` readings take `n + 1` samples
/// rather than `2n`.
fn print_cpu_load<T: TickSource>(
    cpu_load: &CpuLoad<T>, samples: u64, token: &CancellationToken,
) -> CollectionResult<()> {
    if samples == 1 {
        println!("CPU load: {:.1}%", cpu_load.load_with_cancellation(token)?);
        return Ok(());
    }

    let mut previous = cpu_load.sample()?;
    for _ in 0..samples {
        if token.sleep_with_cancellation(cpu_load.interval()) {
            return Err(CollectionError::Cancelled);
        }

        let current = cpu_load.sample()?;
        println!("CPU load: {:.1}%", cpu_load_between(&previous, &current));
        previous = current;
    }

    Ok(())
}

#[cfg(feature = "logging")]
fn init_logging(debug_log: Option<&str>) -> Result<()> {
    if let Some(path) = debug_log {
        utils::logging::init_logger(log::LevelFilter::Debug, Path::new(path))
            .context("Unable to set up the debug log.")?;
    }

    Ok(())
}

#[cfg(not(feature = "logging"))]
fn init_logging(debug_log: Option<&str>) -> Result<()> {
    if debug_log.is_some() {
        eprintln!("cpuload was built without the 'logging' feature; ignoring '--debug_log'.");
    }

    Ok(())
}

/// Runs cpuload with the given settings until done or cancelled.
pub fn run(options: &CpuloadOptions, token: &CancellationToken) -> Result<()> {
    // Created once and handed to everything that reports system load.
    let system_load = Arc::new(SystemLoad::new());
    let processor = CentralProcessor::new(options.interval, system_load)
        .context("This platform's CPU tick counters are not supported.")?;

    match options.report {
        Report::Identity => print_identity(&processor),
        Report::System => {
            // The first reading needs something to compare against.
            if token.sleep_with_cancellation(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL) {
                return Err(CollectionError::Cancelled.into());
            }
            print_system_load(&processor);
        }
        Report::All => {
            print_identity(&processor);
            print_cpu_load(processor.cpu_load(), options.samples, token)
                .context("Unable to measure the CPU load.")?;
        }
    }

    Ok(())
}

/// The entry point for the cpuload binary.
pub fn start_cpuload() -> Result<()> {
    let args = Args::parse();

    init_logging(args.debug_log.as_deref())?;

    let config_path = options::get_config_path(args.config_location.as_deref().map(Path::new));
    let config = options::get_or_read_config(config_path.as_deref())
        .context("Unable to properly parse the config file.")?;
    let settings = options::init(&args, &config).context("Found an issue with the options.")?;

    log::debug!("options: {settings:?}");

    let token = Arc::new(CancellationToken::new());
    {
        let token = token.clone();
        ctrlc::set_handler(move || token.cancel())
            .context("Unable to set up the Ctrl-C handler.")?;
    }

    run(&settings, &token)
}
