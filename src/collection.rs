//! This is the main file to house data collection functions.

pub mod cpu;
pub mod error;
pub mod identity;
pub mod load;

use std::{fmt, sync::Arc, time::Duration};

use cpu::{CpuLoad, PlatformTickSource, TickSource, TickVector};
use error::CollectionResult;
use identity::{IdentitySource, PlatformIdentitySource, ProcessorIdentity};
use load::SystemLoad;

use crate::utils::cancellation_token::CancellationToken;

/// A CPU: who made it, and how busy it is.
///
/// The [`SystemLoad`] is shared rather than owned so that one instance,
/// created at startup, can serve every processor handle in the process.
#[derive(Debug)]
pub struct CentralProcessor<T = PlatformTickSource, I = PlatformIdentitySource> {
    identity: ProcessorIdentity<I>,
    cpu_load: CpuLoad<T>,
    system_load: Arc<SystemLoad>,
}

impl CentralProcessor {
    /// Creates a handle on this host's processor using the platform's native
    /// sources. Fails if the platform's tick states cannot be normalized.
    pub fn new(interval: Duration, system_load: Arc<SystemLoad>) -> CollectionResult<Self> {
        Self::with_sources(
            PlatformTickSource::default(),
            PlatformIdentitySource::default(),
            interval,
            system_load,
        )
    }
}

impl<T: TickSource, I: IdentitySource> CentralProcessor<T, I> {
    pub fn with_sources(
        ticks: T, identity: I, interval: Duration, system_load: Arc<SystemLoad>,
    ) -> CollectionResult<Self> {
        Ok(Self {
            identity: ProcessorIdentity::new(identity),
            cpu_load: CpuLoad::new(ticks, interval)?,
            system_load,
        })
    }

    pub fn identity(&self) -> &ProcessorIdentity<I> {
        &self.identity
    }

    /// Mutable access, for overriding identity fields.
    pub fn identity_mut(&mut self) -> &mut ProcessorIdentity<I> {
        &mut self.identity
    }

    pub fn cpu_load(&self) -> &CpuLoad<T> {
        &self.cpu_load
    }

    /// The CPU load over the next sampling interval, as a percentage. Blocks
    /// for the whole interval.
    ///
    /// Callers that poll should prefer [`Self::cpu_load_ticks`] with
    /// [`cpu::cpu_load_between`], which needs no sleep.
    pub fn load(&self) -> CollectionResult<f64> {
        self.cpu_load.load()
    }

    /// Like [`Self::load`], but gives up with
    /// [`error::CollectionError::Cancelled`] once `token` is cancelled.
    pub fn load_with_cancellation(&self, token: &CancellationToken) -> CollectionResult<f64> {
        self.cpu_load.load_with_cancellation(token)
    }

    /// The current cumulative tick counters, in canonical order.
    pub fn cpu_load_ticks(&self) -> CollectionResult<TickVector> {
        self.cpu_load.sample()
    }

    pub fn system_cpu_load(&self) -> f64 {
        self.system_load.system_cpu_load()
    }

    pub fn system_load_average(&self) -> f64 {
        self.system_load.system_load_average()
    }
}

impl<T, I: IdentitySource> fmt::Display for CentralProcessor<T, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.identity, f)
    }
}

#[cfg(test)]
mod test {
    use std::sync::atomic::{AtomicU64, Ordering};

    use super::*;
    use crate::collection::{
        cpu::{cpu_load_between, NativeTicks},
        error::CollectionError,
    };

    /// Every read advances user time by 1 and idle time by 3.
    #[derive(Default)]
    struct SteadySource {
        reads: AtomicU64,
    }

    impl TickSource for SteadySource {
        fn native_states(&self) -> &[&'static str] {
            &["idle", "system", "nice", "user"]
        }

        fn read_ticks(&self) -> CollectionResult<NativeTicks> {
            let reads = self.reads.fetch_add(1, Ordering::SeqCst);

            Ok([
                ("idle", reads * 3),
                ("system", 0),
                ("nice", 0),
                ("user", reads),
            ]
            .into_iter()
            .collect())
        }
    }

    struct AmdSource;

    impl IdentitySource for AmdSource {
        fn query_vendor_id(&self) -> CollectionResult<String> {
            Ok("AuthenticAMD".into())
        }

        fn query_brand_string(&self) -> CollectionResult<String> {
            Ok("AMD Athlon(tm) 64 X2 Dual Core Processor 4200+".into())
        }

        fn query_family(&self) -> CollectionResult<String> {
            Ok("15".into())
        }

        fn query_model(&self) -> CollectionResult<String> {
            Ok("75".into())
        }

        fn query_stepping(&self) -> CollectionResult<String> {
            Ok("2".into())
        }

        fn query_64bit_capable(&self) -> CollectionResult<bool> {
            Ok(true)
        }
    }

    fn processor() -> CentralProcessor<SteadySource, AmdSource> {
        CentralProcessor::with_sources(
            SteadySource::default(),
            AmdSource,
            Duration::from_millis(1),
            Arc::new(SystemLoad::new()),
        )
        .unwrap()
    }

    #[test]
    fn blocking_load() {
        assert_eq!(processor().load().unwrap(), 25.0);
    }

    #[test]
    fn tick_differencing() {
        let processor = processor();
        let before = processor.cpu_load_ticks().unwrap();
        let after = processor.cpu_load_ticks().unwrap();

        assert_eq!(&*after, &[1, 0, 0, 3]);
        assert_eq!(cpu_load_between(&before, &after), 25.0);
    }

    #[test]
    fn cancelled_load() {
        let token = CancellationToken::new();
        token.cancel();

        assert!(matches!(
            processor().load_with_cancellation(&token),
            Err(CollectionError::Cancelled)
        ));
    }

    #[test]
    fn identity_passthrough() {
        let mut processor = processor();

        assert_eq!(
            processor.identity().identifier().unwrap(),
            "AuthenticAMD Family 15 Model 75 Stepping 2"
        );
        assert_eq!(
            processor.to_string(),
            "AMD Athlon(tm) 64 X2 Dual Core Processor 4200+"
        );

        processor.identity_mut().set_name("Renamed");
        assert_eq!(processor.to_string(), "Renamed");
    }

    #[test]
    fn system_load_passthrough() {
        let fraction = processor().system_cpu_load();
        assert!((0.0..=1.0).contains(&fraction));
    }

    #[test]
    fn platform_processor_builds() {
        let processor = CentralProcessor::new(Duration::from_millis(10), Arc::new(SystemLoad::new()));
        assert!(processor.is_ok());
    }
}
