//! Operating-system load figures through sysinfo.
//!
//! These are passed through as-is; the tick-based computation lives in
//! [`crate::collection::cpu`].

use std::sync::{Mutex, PoisonError};

use sysinfo::{CpuRefreshKind, RefreshKind, System};

pub type LoadAvgHarvest = [f32; 3];

/// Reported by [`SystemLoad::system_load_average`] where there is no load
/// average.
pub const LOAD_AVERAGE_UNAVAILABLE: f64 = -1.0;

/// System-wide load figures.
///
/// Construct this once at startup and share it (e.g. through an `Arc`); the
/// first CPU usage reading is primed during construction so that later
/// readings have something to compare against.
#[derive(Debug)]
pub struct SystemLoad {
    system: Mutex<System>,
}

impl Default for SystemLoad {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemLoad {
    pub fn new() -> Self {
        let mut system =
            System::new_with_specifics(RefreshKind::nothing().with_cpu(CpuRefreshKind::nothing()));
        system.refresh_cpu_usage();

        Self {
            system: Mutex::new(system),
        }
    }

    /// The fraction of CPU time, in `[0, 1]`, the whole system spent busy since
    /// the previous call (or since construction).
    pub fn system_cpu_load(&self) -> f64 {
        let mut system = self.system.lock().unwrap_or_else(PoisonError::into_inner);
        system.refresh_cpu_usage();

        (f64::from(system.global_cpu_usage()) / 100.0).clamp(0.0, 1.0)
    }

    /// The one-minute load average, or [`LOAD_AVERAGE_UNAVAILABLE`] on
    /// platforms without one.
    pub fn system_load_average(&self) -> f64 {
        if cfg!(target_os = "windows") {
            LOAD_AVERAGE_UNAVAILABLE
        } else {
            System::load_average().one
        }
    }

    /// The one, five, and fifteen minute load averages.
    pub fn load_averages(&self) -> LoadAvgHarvest {
        // The API for sysinfo apparently wants you to call it like this, rather than
        // using a &System.
        let sysinfo::LoadAvg { one, five, fifteen } = System::load_average();

        [one as f32, five as f32, fifteen as f32]
    }
}
