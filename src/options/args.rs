// Argument parsing via clap.
//
// Note that you probably want to keep this as a single file so the build script doesn't
// trip all over itself. It is also `include!`d there, hence no inner doc comments.

use clap::*;
use indoc::indoc;

const TEMPLATE: &str = indoc! {
    "{name} {version}

    {about}

    {usage-heading} {usage}

    {all-args}"
};

const USAGE: &str = "cpuload [OPTIONS]";

/// The arguments for cpuload.
#[derive(Parser, Debug, Default)]
#[command(
    name = crate_name!(),
    version = crate_version!(),
    about = crate_description!(),
    color = ColorChoice::Auto,
    help_template = TEMPLATE,
    override_usage = USAGE,
)]
pub struct Args {
    #[arg(
        short = 'C',
        long = "config",
        value_name = "PATH",
        help = "Sets the location of the config file.",
        long_help = "Sets the location of the config file. If the file does not exist, cpuload \
                    will fail rather than fall back to the defaults."
    )]
    pub config_location: Option<String>,

    #[arg(
        short = 'i',
        long,
        value_name = "TIME",
        help = "Sets the CPU load sampling interval.",
        long_help = "Sets the time between the two tick samples a CPU load is computed from. \
                    Takes a number in milliseconds or a human duration like '500ms' or '2s'. \
                    Defaults to 1s."
    )]
    pub interval: Option<String>,

    #[arg(
        short = 'n',
        long,
        value_name = "COUNT",
        help = "Sets how many CPU load readings to print.",
        long_help = "Sets how many consecutive CPU load readings to print. A single reading \
                    takes two fresh samples; more than one reuses each sample as the baseline \
                    for the next reading. Defaults to 1."
    )]
    pub samples: Option<u64>,

    #[arg(
        long,
        help = "Only prints the processor's identity.",
        conflicts_with = "system"
    )]
    pub identity: bool,

    #[arg(
        long,
        help = "Only prints the operating system's own load figures.",
        long_help = "Only prints the operating system's own load figures: the fraction of \
                    recent CPU time spent busy and the one-minute load average."
    )]
    pub system: bool,

    #[arg(
        long = "debug_log",
        value_name = "FILE",
        help = "Writes debug logs to a file. Requires the 'logging' feature."
    )]
    pub debug_log: Option<String>,
}

/// Returns a [`Command`] based on cpuload's args.
pub fn build_cmd() -> Command {
    Args::command()
}
