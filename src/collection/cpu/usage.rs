//! Turning pairs of tick samples into a CPU load percentage.
//!
//! There are two ways in:
//! - [`cpu_load_between`] for callers that keep their own previous sample and
//!   decide when to take the next one.
//! - [`CpuLoad::load`], which takes both samples itself and blocks for the
//!   sampling interval in between.

use std::{thread, time::Duration};

use super::{
    sampler::{Sampler, TickSource},
    ticks::{TickVector, IDLE_INDEX},
};
use crate::{
    collection::error::{CollectionError, CollectionResult},
    utils::cancellation_token::CancellationToken,
};

/// The sampling interval used by [`CpuLoad::load`] if none is configured.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);

/// Two samples of the same tick source, `before` taken strictly earlier than
/// `after`.
#[derive(Clone, Copy, Debug)]
pub struct SampleWindow<'a> {
    pub before: &'a TickVector,
    pub after: &'a TickVector,
}

impl<'a> SampleWindow<'a> {
    pub fn new(before: &'a TickVector, after: &'a TickVector) -> Self {
        Self { before, after }
    }

    /// Per-state deltas, or [`None`] if the samples are not comparable.
    pub fn deltas(&self) -> Option<Vec<i128>> {
        if self.before.len() != self.after.len() || self.before.len() <= IDLE_INDEX {
            return None;
        }

        Some(
            self.after
                .iter()
                .zip(self.before.iter())
                .map(|(&after, &before)| i128::from(after) - i128::from(before))
                .collect(),
        )
    }

    /// The percentage of non-idle time in this window, in `[0, 100]`.
    ///
    /// A window where the counters did not advance, went backwards, or are not
    /// comparable at all yields `0` rather than an error.
    pub fn cpu_load(&self) -> f64 {
        let Some(deltas) = self.deltas() else {
            log::warn!(
                "cannot compare tick samples of length {} and {}",
                self.before.len(),
                self.after.len()
            );
            return 0.0;
        };

        let total: i128 = deltas.iter().sum();
        let idle = deltas[IDLE_INDEX];

        if total > 0 && idle >= 0 && idle <= total {
            100.0 * (total - idle) as f64 / total as f64
        } else {
            log::debug!("degenerate tick window: total {total}, idle {idle}");
            0.0
        }
    }
}

/// The CPU load between two samples; see [`SampleWindow::cpu_load`].
pub fn cpu_load_between(before: &TickVector, after: &TickVector) -> f64 {
    SampleWindow::new(before, after).cpu_load()
}

/// Measures CPU load from a [`TickSource`].
#[derive(Debug)]
pub struct CpuLoad<S> {
    sampler: Sampler<S>,
    interval: Duration,
}

impl<S: TickSource> CpuLoad<S> {
    /// Creates an engine sampling `interval` apart. Fails if the source's state
    /// set cannot be normalized.
    pub fn new(source: S, interval: Duration) -> CollectionResult<Self> {
        Ok(Self {
            sampler: Sampler::new(source)?,
            interval,
        })
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn sampler(&self) -> &Sampler<S> {
        &self.sampler
    }

    /// Takes a single sample, for use with [`cpu_load_between`].
    pub fn sample(&self) -> CollectionResult<TickVector> {
        self.sampler.sample()
    }

    /// Takes two samples [`Self::interval`] apart and returns the load between
    /// them. This always blocks for the full interval.
    pub fn load(&self) -> CollectionResult<f64> {
        let before = self.sampler.sample()?;
        thread::sleep(self.interval);
        let after = self.sampler.sample()?;

        Ok(cpu_load_between(&before, &after))
    }

    /// Like [`Self::load`], but returns [`CollectionError::Cancelled`] as soon
    /// as `token` is cancelled instead of finishing the measurement.
    pub fn load_with_cancellation(&self, token: &CancellationToken) -> CollectionResult<f64> {
        if token.is_cancelled() {
            return Err(CollectionError::Cancelled);
        }

        let before = self.sampler.sample()?;
        if token.sleep_with_cancellation(self.interval) {
            return Err(CollectionError::Cancelled);
        }
        let after = self.sampler.sample()?;

        Ok(cpu_load_between(&before, &after))
    }
}
