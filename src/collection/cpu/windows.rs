//! Windows tick counters through `GetSystemTimes`.

use windows::Win32::{Foundation::FILETIME, System::Threading::GetSystemTimes};

use super::{sampler::TickSource, ticks::NativeTicks};
use crate::collection::error::{CollectionError, CollectionResult};

/// Windows has no niceness, so `nice` is always reported as zero.
const SYSTEM_TIMES_STATES: [&str; 4] = ["user", "nice", "kernel", "idle"];

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemTimesSource;

impl TickSource for SystemTimesSource {
    fn native_states(&self) -> &[&'static str] {
        &SYSTEM_TIMES_STATES
    }

    fn read_ticks(&self) -> CollectionResult<NativeTicks> {
        let mut idle = FILETIME::default();
        let mut kernel = FILETIME::default();
        let mut user = FILETIME::default();

        // SAFETY: All three pointers are to live, writable FILETIMEs.
        let result = unsafe {
            GetSystemTimes(
                Some(&mut idle as *mut _),
                Some(&mut kernel as *mut _),
                Some(&mut user as *mut _),
            )
        };
        result.map_err(|err| CollectionError::tick_source(format!("GetSystemTimes failed: {err}")))?;

        Ok(split_system_times(
            filetime_to_u64(idle),
            filetime_to_u64(kernel),
            filetime_to_u64(user),
        ))
    }
}

/// Kernel time as reported includes idle time.
fn split_system_times(idle: u64, kernel: u64, user: u64) -> NativeTicks {
    [
        ("user", user),
        ("nice", 0),
        ("kernel", kernel.saturating_sub(idle)),
        ("idle", idle),
    ]
    .into_iter()
    .collect()
}

fn filetime_to_u64(ft: FILETIME) -> u64 {
    u64::from(ft.dwLowDateTime) | (u64::from(ft.dwHighDateTime) << 32)
}
