use super::{sampler::TickSource, ticks::NativeTicks};
use crate::collection::error::{CollectionError, CollectionResult};

/// A placeholder for platforms without a tick source. It declares the canonical
/// states so that construction succeeds, but every read fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableSource;

impl TickSource for UnavailableSource {
    fn native_states(&self) -> &[&'static str] {
        &["user", "nice", "system", "idle"]
    }

    fn read_ticks(&self) -> CollectionResult<NativeTicks> {
        Err(CollectionError::tick_source(
            "tick counters are not supported on this platform",
        ))
    }
}
