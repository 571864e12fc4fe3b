//! FreeBSD tick counters through the `kern.cp_time` sysctl.

use std::{ffi::CStr, mem, ptr};

use libc::{c_long, c_void};

use super::{sampler::TickSource, ticks::NativeTicks};
use crate::collection::error::{CollectionError, CollectionResult};

const KERN_CP_TIME: &CStr = c"kern.cp_time";

/// `CP_USER`, `CP_NICE`, `CP_SYS`, `CP_INTR`, `CP_IDLE` from `sys/resource.h`.
const CP_TIME_STATES: [&str; 5] = ["user", "nice", "sys", "intr", "idle"];

#[derive(Debug, Default, Clone, Copy)]
pub struct CpTimeSource;

impl TickSource for CpTimeSource {
    fn native_states(&self) -> &[&'static str] {
        &CP_TIME_STATES
    }

    fn read_ticks(&self) -> CollectionResult<NativeTicks> {
        let mut cp_time = [0 as c_long; CP_TIME_STATES.len()];
        let mut len = mem::size_of_val(&cp_time);

        // SAFETY: `cp_time` is `len` bytes long; the kernel writes at most that much
        // and reports the written size back through `len`.
        let result = unsafe {
            libc::sysctlbyname(
                KERN_CP_TIME.as_ptr(),
                cp_time.as_mut_ptr().cast::<c_void>(),
                &mut len,
                ptr::null(),
                0,
            )
        };

        if result != 0 {
            return Err(std::io::Error::last_os_error().into());
        }

        if len != mem::size_of_val(&cp_time) {
            return Err(CollectionError::tick_source(format!(
                "kern.cp_time returned {len} bytes"
            )));
        }

        Ok(CP_TIME_STATES
            .iter()
            .zip(cp_time)
            .map(|(&state, ticks)| (state, ticks.max(0) as u64))
            .collect())
    }
}
