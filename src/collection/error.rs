use thiserror::Error;

use super::cpu::CpuState;

/// An error to do with data collection.
#[derive(Debug, Error)]
pub enum CollectionError {
    /// The platform failed to report its tick counters. This is never retried.
    #[error("the tick source is unavailable: {0}")]
    TickSourceUnavailable(String),

    /// The platform's tick categories cannot be mapped onto the canonical ones.
    #[error("the platform does not report a '{missing}' tick state")]
    UnsupportedPlatformState { missing: CpuState },

    /// The caller gave up on a blocking measurement before it finished.
    #[error("the measurement was cancelled")]
    Cancelled,

    /// A processor identity query failed.
    #[error("processor identity is unavailable: {0}")]
    IdentityUnavailable(String),

    /// The collection is unsupported.
    #[error("cpuload does not support this type of data collection for this platform.")]
    Unsupported,
}

impl CollectionError {
    pub(crate) fn tick_source<R: Into<String>>(reason: R) -> Self {
        CollectionError::TickSourceUnavailable(reason.into())
    }

    pub(crate) fn identity<R: Into<String>>(reason: R) -> Self {
        CollectionError::IdentityUnavailable(reason.into())
    }
}

/// A [`Result`] with the error type being a [`CollectionError`].
pub type CollectionResult<T> = Result<T, CollectionError>;

impl From<std::io::Error> for CollectionError {
    fn from(err: std::io::Error) -> Self {
        CollectionError::TickSourceUnavailable(err.to_string())
    }
}
