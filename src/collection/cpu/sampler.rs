use super::ticks::{NativeTicks, TickLayout, TickVector};
use crate::collection::error::CollectionResult;

/// Something that can report the host's cumulative, whole-system tick counters.
pub trait TickSource {
    /// The native state names this source reports. This must not change over
    /// the lifetime of the source.
    fn native_states(&self) -> &[&'static str];

    /// Reads the current counters.
    fn read_ticks(&self) -> CollectionResult<NativeTicks>;
}

impl<T: TickSource + ?Sized> TickSource for Box<T> {
    fn native_states(&self) -> &[&'static str] {
        (**self).native_states()
    }

    fn read_ticks(&self) -> CollectionResult<NativeTicks> {
        (**self).read_ticks()
    }
}

/// Takes canonical samples from a [`TickSource`].
#[derive(Debug)]
pub struct Sampler<S> {
    source: S,
    layout: TickLayout,
}

impl<S: TickSource> Sampler<S> {
    /// Validates the source's state set. An incompatible platform fails here,
    /// before any sample is taken.
    pub fn new(source: S) -> CollectionResult<Self> {
        let layout = TickLayout::from_native_states(source.native_states())?;

        Ok(Self { source, layout })
    }

    /// Takes one sample. A failed read is returned as-is.
    pub fn sample(&self) -> CollectionResult<TickVector> {
        let native = self.source.read_ticks()?;
        let ticks = self.layout.normalize(&native)?;

        log::trace!("tick sample: {:?}", &*ticks);

        Ok(ticks)
    }

    pub fn layout(&self) -> &TickLayout {
        &self.layout
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}
