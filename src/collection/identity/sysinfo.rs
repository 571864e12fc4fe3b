//! Processor identity through sysinfo, for platforms with no native source.
//! Only the vendor and brand are available this way.

use sysinfo::{CpuRefreshKind, RefreshKind, System};

use super::IdentitySource;
use crate::collection::error::{CollectionError, CollectionResult};

#[derive(Debug, Default, Clone, Copy)]
pub struct SysinfoSource;

impl SysinfoSource {
    fn first_cpu<T>(&self, f: impl FnOnce(&sysinfo::Cpu) -> T) -> CollectionResult<T> {
        let sys = System::new_with_specifics(
            RefreshKind::nothing().with_cpu(CpuRefreshKind::nothing()),
        );

        sys.cpus()
            .first()
            .map(f)
            .ok_or_else(|| CollectionError::identity("sysinfo reported no processors"))
    }
}

impl IdentitySource for SysinfoSource {
    fn query_vendor_id(&self) -> CollectionResult<String> {
        self.first_cpu(|cpu| cpu.vendor_id().to_string())
    }

    fn query_brand_string(&self) -> CollectionResult<String> {
        self.first_cpu(|cpu| cpu.brand().to_string())
    }

    fn query_family(&self) -> CollectionResult<String> {
        Err(CollectionError::Unsupported)
    }

    fn query_model(&self) -> CollectionResult<String> {
        Err(CollectionError::Unsupported)
    }

    fn query_stepping(&self) -> CollectionResult<String> {
        Err(CollectionError::Unsupported)
    }

    fn query_64bit_capable(&self) -> CollectionResult<bool> {
        Ok(cfg!(target_pointer_width = "64"))
    }
}
