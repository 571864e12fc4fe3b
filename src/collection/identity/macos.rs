//! Processor identity through `sysctl`.
//!
//! Intel Macs expose everything under `machdep.cpu`; Apple silicon only has
//! `machdep.cpu.brand_string`, so the `hw.cpu*` values stand in for the rest.

use sysctl::{Ctl, Sysctl};

use super::IdentitySource;
use crate::collection::error::{CollectionError, CollectionResult};

#[derive(Debug, Default, Clone, Copy)]
pub struct SysctlSource;

/// Reads the first of `names` that exists.
fn read_first(names: &[&str]) -> CollectionResult<String> {
    let mut last_err = None;

    for name in names {
        match Ctl::new(name).and_then(|ctl| ctl.value_string()) {
            Ok(value) => return Ok(value.trim().to_string()),
            Err(err) => last_err = Some(format!("{name}: {err}")),
        }
    }

    Err(CollectionError::identity(
        last_err.unwrap_or_else(|| "no sysctl names given".to_string()),
    ))
}

impl IdentitySource for SysctlSource {
    fn query_vendor_id(&self) -> CollectionResult<String> {
        read_first(&["machdep.cpu.vendor"]).or_else(|err| {
            if cfg!(target_arch = "aarch64") {
                Ok("Apple".to_string())
            } else {
                Err(err)
            }
        })
    }

    fn query_brand_string(&self) -> CollectionResult<String> {
        read_first(&["machdep.cpu.brand_string"])
    }

    fn query_family(&self) -> CollectionResult<String> {
        read_first(&["machdep.cpu.family", "hw.cpufamily"])
    }

    fn query_model(&self) -> CollectionResult<String> {
        read_first(&["machdep.cpu.model", "hw.cputype"])
    }

    fn query_stepping(&self) -> CollectionResult<String> {
        read_first(&["machdep.cpu.stepping", "hw.cpusubtype"])
    }

    fn query_64bit_capable(&self) -> CollectionResult<bool> {
        let value = read_first(&["hw.cpu64bit_capable"])?;

        Ok(value != "0")
    }
}
