//! Processor identity: vendor, brand string, family/model/stepping, and
//! friends.
//!
//! None of these change while the process is running, so each field is
//! queried at most once and then cached.

use std::{
    fmt,
    sync::{LazyLock, OnceLock},
};

use regex::Regex;

use crate::collection::error::CollectionResult;

cfg_if::cfg_if! {
    if #[cfg(target_os = "linux")] {
        pub mod linux;
        pub use self::linux::CpuInfoSource as PlatformIdentitySource;
    } else if #[cfg(target_os = "macos")] {
        pub mod macos;
        pub use self::macos::SysctlSource as PlatformIdentitySource;
    } else if #[cfg(any(target_arch = "x86", target_arch = "x86_64"))] {
        pub mod cpuid;
        pub use self::cpuid::CpuidSource as PlatformIdentitySource;
    } else {
        pub mod sysinfo;
        pub use self::sysinfo::SysinfoSource as PlatformIdentitySource;
    }
}

/// Reported by [`ProcessorIdentity::vendor_freq`] when the frequency is not known.
pub const UNKNOWN_FREQUENCY: i64 = -1;

const GENUINE_INTEL: &str = "GenuineIntel";

/// The raw platform queries behind a [`ProcessorIdentity`].
pub trait IdentitySource {
    /// The vendor identifier, e.g. `GenuineIntel`.
    fn query_vendor_id(&self) -> CollectionResult<String>;

    /// The brand string, e.g. `Intel(R) Core(TM)2 Duo CPU T7300 @ 2.00GHz`.
    fn query_brand_string(&self) -> CollectionResult<String>;

    fn query_family(&self) -> CollectionResult<String>;

    fn query_model(&self) -> CollectionResult<String>;

    fn query_stepping(&self) -> CollectionResult<String>;

    fn query_64bit_capable(&self) -> CollectionResult<bool>;
}

/// Returns the cached value in `cell`, computing it with `init` if there is none.
///
/// Two threads racing here may both run `init`; only the first result is kept.
/// A failed `init` caches nothing.
fn memoize<T>(cell: &OnceLock<T>, init: impl FnOnce() -> CollectionResult<T>) -> CollectionResult<&T> {
    if let Some(value) = cell.get() {
        return Ok(value);
    }

    let value = init()?;
    Ok(cell.get_or_init(|| value))
}

/// Lazily queried processor identity.
///
/// The setters override the cached value of their own field only; for example,
/// changing the vendor after [`Self::identifier`] has been computed does not
/// change the identifier.
#[derive(Debug, Default)]
pub struct ProcessorIdentity<S> {
    source: S,
    vendor: OnceLock<String>,
    name: OnceLock<String>,
    family: OnceLock<String>,
    model: OnceLock<String>,
    stepping: OnceLock<String>,
    cpu64: OnceLock<bool>,
    vendor_freq: OnceLock<i64>,
    identifier: OnceLock<String>,
}

impl<S: IdentitySource> ProcessorIdentity<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            vendor: OnceLock::new(),
            name: OnceLock::new(),
            family: OnceLock::new(),
            model: OnceLock::new(),
            stepping: OnceLock::new(),
            cpu64: OnceLock::new(),
            vendor_freq: OnceLock::new(),
            identifier: OnceLock::new(),
        }
    }

    /// Processor vendor, e.g. `GenuineIntel`.
    pub fn vendor(&self) -> CollectionResult<&str> {
        memoize(&self.vendor, || self.source.query_vendor_id()).map(String::as_str)
    }

    /// Processor name, e.g. `Intel(R) Core(TM)2 Duo CPU T7300 @ 2.00GHz`.
    pub fn name(&self) -> CollectionResult<&str> {
        memoize(&self.name, || self.source.query_brand_string()).map(String::as_str)
    }

    pub fn family(&self) -> CollectionResult<&str> {
        memoize(&self.family, || self.source.query_family()).map(String::as_str)
    }

    pub fn model(&self) -> CollectionResult<&str> {
        memoize(&self.model, || self.source.query_model()).map(String::as_str)
    }

    pub fn stepping(&self) -> CollectionResult<&str> {
        memoize(&self.stepping, || self.source.query_stepping()).map(String::as_str)
    }

    pub fn is_cpu64bit(&self) -> CollectionResult<bool> {
        memoize(&self.cpu64, || self.source.query_64bit_capable()).copied()
    }

    /// The vendor frequency in Hz, taken from the `@ <freq>` suffix of the
    /// name. For `Intel(R) Core(TM)2 Duo CPU T7300 @ 2.00GHz` this is
    /// `2000000000`.
    ///
    /// Returns [`UNKNOWN_FREQUENCY`] if there is no such suffix.
    pub fn vendor_freq(&self) -> CollectionResult<i64> {
        memoize(&self.vendor_freq, || {
            let name = self.name()?;

            Ok(name
                .split_once("@ ")
                .map(|(_, freq)| parse_hertz(freq))
                .unwrap_or(UNKNOWN_FREQUENCY))
        })
        .copied()
    }

    /// Identifier, e.g. `Intel64 Family 6 Model 15 Stepping 10`.
    pub fn identifier(&self) -> CollectionResult<&str> {
        memoize(&self.identifier, || {
            let vendor = self.vendor()?;
            let prefix = if vendor == GENUINE_INTEL {
                if self.is_cpu64bit()? {
                    "Intel64"
                } else {
                    "x86"
                }
            } else {
                vendor
            };

            Ok(format!(
                "{prefix} Family {} Model {} Stepping {}",
                self.family()?,
                self.model()?,
                self.stepping()?
            ))
        })
        .map(String::as_str)
    }

    pub fn set_vendor<T: Into<String>>(&mut self, vendor: T) {
        self.vendor = OnceLock::from(vendor.into());
    }

    pub fn set_name<T: Into<String>>(&mut self, name: T) {
        self.name = OnceLock::from(name.into());
    }

    pub fn set_family<T: Into<String>>(&mut self, family: T) {
        self.family = OnceLock::from(family.into());
    }

    pub fn set_model<T: Into<String>>(&mut self, model: T) {
        self.model = OnceLock::from(model.into());
    }

    pub fn set_stepping<T: Into<String>>(&mut self, stepping: T) {
        self.stepping = OnceLock::from(stepping.into());
    }

    pub fn set_cpu64(&mut self, cpu64: bool) {
        self.cpu64 = OnceLock::from(cpu64);
    }

    pub fn set_vendor_freq(&mut self, freq: i64) {
        self.vendor_freq = OnceLock::from(freq);
    }

    pub fn set_identifier<T: Into<String>>(&mut self, identifier: T) {
        self.identifier = OnceLock::from(identifier.into());
    }
}

impl<S: IdentitySource> fmt::Display for ProcessorIdentity<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Ok(name) => f.write_str(name),
            Err(_) => f.write_str("unknown processor"),
        }
    }
}

static HERTZ: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+(.\d+)?) ?([kMGT]?Hz)").expect("the hertz pattern should be valid")
});

/// Parses a frequency such as `2.00GHz` or `800 MHz` into Hz. Returns
/// [`UNKNOWN_FREQUENCY`] if `hertz` does not contain a frequency.
pub fn parse_hertz(hertz: &str) -> i64 {
    let Some(captures) = HERTZ.captures(hertz.trim()) else {
        return UNKNOWN_FREQUENCY;
    };

    let multiplier = match &captures[3] {
        "Hz" => 1.0,
        "kHz" => 1e3,
        "MHz" => 1e6,
        "GHz" => 1e9,
        "THz" => 1e12,
        _ => return UNKNOWN_FREQUENCY,
    };

    match captures[1].parse::<f64>() {
        Ok(value) => (value * multiplier) as i64,
        Err(_) => UNKNOWN_FREQUENCY,
    }
}
