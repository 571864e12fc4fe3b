//! Data collection for CPU usage from cumulative tick counters.
//!
//! Linux, macOS, FreeBSD, and Windows each have a native [`TickSource`];
//! everything else gets one that always fails to read.

pub mod sampler;
pub mod ticks;
pub mod usage;

pub use sampler::{Sampler, TickSource};
pub use ticks::{normalize, CpuState, NativeTicks, TickLayout, TickVector, IDLE_INDEX};
pub use usage::{cpu_load_between, CpuLoad, SampleWindow, DEFAULT_INTERVAL};

cfg_if::cfg_if! {
    if #[cfg(target_os = "linux")] {
        pub mod linux;
        pub use self::linux::ProcStatSource as PlatformTickSource;
    } else if #[cfg(target_os = "macos")] {
        pub mod macos;
        pub use self::macos::MachHostSource as PlatformTickSource;
    } else if #[cfg(target_os = "freebsd")] {
        pub mod freebsd;
        pub use self::freebsd::CpTimeSource as PlatformTickSource;
    } else if #[cfg(target_os = "windows")] {
        pub mod windows;
        pub use self::windows::SystemTimesSource as PlatformTickSource;
    } else {
        pub mod fallback;
        pub use self::fallback::UnavailableSource as PlatformTickSource;
    }
}
