//! Linux tick counters through `/proc/stat`.

use std::{fs, path::PathBuf};

use super::{sampler::TickSource, ticks::NativeTicks};
use crate::collection::error::{CollectionError, CollectionResult};

/// Columns of the aggregate `cpu` line, in the kernel's order. `guest` and
/// `guest_nice` follow but are already counted in `user` and `nice`.
const PROC_STAT_STATES: [&str; 8] = [
    "user", "nice", "system", "idle", "iowait", "irq", "softirq", "steal",
];

/// Reads the aggregate `cpu` line of `/proc/stat`.
#[derive(Debug, Clone)]
pub struct ProcStatSource {
    path: PathBuf,
}

impl Default for ProcStatSource {
    fn default() -> Self {
        Self {
            path: PathBuf::from("/proc/stat"),
        }
    }
}

impl ProcStatSource {
    /// Reads from a file other than `/proc/stat`, e.g. a bind-mounted host
    /// procfs inside a container.
    pub fn with_path<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }
}

impl TickSource for ProcStatSource {
    fn native_states(&self) -> &[&'static str] {
        &PROC_STAT_STATES
    }

    fn read_ticks(&self) -> CollectionResult<NativeTicks> {
        let contents = fs::read_to_string(&self.path).map_err(|err| {
            CollectionError::tick_source(format!("failed to read {}: {err}", self.path.display()))
        })?;

        parse_proc_stat(&contents)
    }
}

/// Parses the aggregate line. Kernels older than 2.6.11 do not report
/// `steal` (or older still, `iowait`/`irq`/`softirq`); missing trailing columns
/// are read as zero.
fn parse_proc_stat(contents: &str) -> CollectionResult<NativeTicks> {
    let line = contents
        .lines()
        .find(|line| line.starts_with("cpu "))
        .ok_or_else(|| CollectionError::tick_source("no aggregate cpu line in /proc/stat"))?;

    let values = line
        .split_ascii_whitespace()
        .skip(1)
        .take(PROC_STAT_STATES.len())
        .map(|value| {
            value.parse::<u64>().map_err(|err| {
                CollectionError::tick_source(format!("bad /proc/stat counter '{value}': {err}"))
            })
        })
        .collect::<CollectionResult<Vec<_>>>()?;

    if values.len() < 4 {
        return Err(CollectionError::tick_source(format!(
            "the aggregate cpu line only has {} counters",
            values.len()
        )));
    }

    Ok(PROC_STAT_STATES
        .iter()
        .enumerate()
        .map(|(index, &state)| (state, values.get(index).copied().unwrap_or(0)))
        .collect())
}

#[cfg(test)]
mod test {
    use std::io::Write;

    use super::*;
    use crate::collection::cpu::Sampler;

    const PROC_STAT: &str = "cpu  10132153 290696 3084719 46828483 16683 0 25195 0 175628 0
cpu0 1393280 32966 572056 13343292 6130 0 17875 0 23933 0
intr 114930548 113199788 3 0 5 263 0 4 [... lots more numbers ...]
ctxt 1990473
btime 1062191376
processes 2915
procs_running 1
procs_blocked 0
";

    #[test]
    fn parses_aggregate_line() {
        let ticks = parse_proc_stat(PROC_STAT).unwrap();

        assert_eq!(ticks["user"], 10132153);
        assert_eq!(ticks["nice"], 290696);
        assert_eq!(ticks["system"], 3084719);
        assert_eq!(ticks["idle"], 46828483);
        assert_eq!(ticks["iowait"], 16683);
        assert_eq!(ticks["softirq"], 25195);
        assert!(!ticks.contains_key("guest"));
    }

    #[test]
    fn old_kernels_pad_with_zero() {
        let ticks = parse_proc_stat("cpu 1 2 3 4\n").unwrap();

        assert_eq!(ticks.len(), PROC_STAT_STATES.len());
        assert_eq!(ticks["idle"], 4);
        assert_eq!(ticks["steal"], 0);
    }

    #[test]
    fn missing_aggregate_line() {
        let err = parse_proc_stat("cpu0 1 2 3 4\n").unwrap_err();
        assert!(matches!(err, CollectionError::TickSourceUnavailable(_)));
    }

    #[test]
    fn short_aggregate_line() {
        let err = parse_proc_stat("cpu 1 2 3\n").unwrap_err();
        assert!(matches!(err, CollectionError::TickSourceUnavailable(_)));
    }

    #[test]
    fn garbage_counter() {
        let err = parse_proc_stat("cpu 1 2 x 4\n").unwrap_err();
        assert!(matches!(err, CollectionError::TickSourceUnavailable(_)));
    }

    #[test]
    fn samples_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(PROC_STAT.as_bytes()).unwrap();

        let sampler = Sampler::new(ProcStatSource::with_path(file.path())).unwrap();
        let sample = sampler.sample().unwrap();

        assert_eq!(
            &*sample,
            &[10132153, 290696, 3084719, 46828483, 16683, 0, 25195, 0]
        );
    }

    #[test]
    fn unreadable_file() {
        let sampler = Sampler::new(ProcStatSource::with_path("/nonexistent/proc/stat")).unwrap();

        assert!(matches!(
            sampler.sample(),
            Err(CollectionError::TickSourceUnavailable(_))
        ));
    }
}
