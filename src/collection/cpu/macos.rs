//! macOS tick counters through `host_statistics(HOST_CPU_LOAD_INFO)`.
//!
//! Partial bindings based on Apple's `mach/host_info.h` and `mach/machine.h`.

use std::mem;

use libc::{c_int, c_uint};
use mach2::{
    kern_return::{kern_return_t, KERN_SUCCESS},
    mach_port::mach_port_deallocate,
    message::mach_msg_type_number_t,
    port::mach_port_t,
    traps::mach_task_self,
};

use super::{sampler::TickSource, ticks::NativeTicks};
use crate::collection::error::{CollectionError, CollectionResult};

const HOST_CPU_LOAD_INFO: c_int = 3;

const CPU_STATE_USER: usize = 0;
const CPU_STATE_SYSTEM: usize = 1;
const CPU_STATE_IDLE: usize = 2;
const CPU_STATE_NICE: usize = 3;
const CPU_STATE_MAX: usize = 4;

/// Native order of `cpu_ticks`.
const MACH_STATES: [&str; CPU_STATE_MAX] = {
    let mut states = [""; CPU_STATE_MAX];
    states[CPU_STATE_USER] = "user";
    states[CPU_STATE_SYSTEM] = "system";
    states[CPU_STATE_IDLE] = "idle";
    states[CPU_STATE_NICE] = "nice";
    states
};

#[allow(non_camel_case_types)]
#[repr(C)]
#[derive(Default)]
struct host_cpu_load_info {
    cpu_ticks: [c_uint; CPU_STATE_MAX],
}

const HOST_CPU_LOAD_INFO_COUNT: mach_msg_type_number_t =
    (mem::size_of::<host_cpu_load_info>() / mem::size_of::<c_int>()) as mach_msg_type_number_t;

extern "C" {
    fn mach_host_self() -> mach_port_t;

    fn host_statistics(
        host_priv: mach_port_t, flavor: c_int, host_info_out: *mut c_int,
        host_info_out_cnt: *mut mach_msg_type_number_t,
    ) -> kern_return_t;
}

/// Reads the whole-host tick counters from the Mach host port.
#[derive(Debug, Default, Clone, Copy)]
pub struct MachHostSource;

impl TickSource for MachHostSource {
    fn native_states(&self) -> &[&'static str] {
        &MACH_STATES
    }

    fn read_ticks(&self) -> CollectionResult<NativeTicks> {
        let mut info = host_cpu_load_info::default();
        let mut count = HOST_CPU_LOAD_INFO_COUNT;

        // SAFETY: `info` is a correctly sized `host_cpu_load_info` and `count`
        // holds its size in `integer_t`s, which is what the kernel expects.
        let result = unsafe {
            let host = mach_host_self();
            let result = host_statistics(
                host,
                HOST_CPU_LOAD_INFO,
                (&mut info as *mut host_cpu_load_info).cast::<c_int>(),
                &mut count,
            );
            let released = mach_port_deallocate(mach_task_self(), host);
            if released != KERN_SUCCESS {
                log::debug!("mach_port_deallocate failed with kern_return_t {released}");
            }

            result
        };

        if result != KERN_SUCCESS {
            return Err(CollectionError::tick_source(format!(
                "host_statistics failed with kern_return_t {result}"
            )));
        }

        Ok(MACH_STATES
            .iter()
            .zip(info.cpu_ticks)
            .map(|(&state, ticks)| (state, u64::from(ticks)))
            .collect())
    }
}
