use std::{
    sync::{Condvar, Mutex, PoisonError},
    time::Duration,
};

/// A cancellation token, used to abandon a blocking CPU load measurement
/// from another thread.
pub struct CancellationToken {
    // The "check" for the cancellation token. Setting this to true will mark the cancellation token as "cancelled".
    mutex: Mutex<bool>,
    cvar: Condvar,
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self {
            mutex: Mutex::new(false),
            cvar: Condvar::new(),
        }
    }
}

impl std::fmt::Debug for CancellationToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CancellationToken")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the [`CancellationToken`] as cancelled.
    ///
    /// This is idempotent, and once cancelled, will stay cancelled. Sending it
    /// again will not do anything.
    pub fn cancel(&self) {
        let mut guard = self.mutex.lock().unwrap_or_else(PoisonError::into_inner);

        if !*guard {
            *guard = true;
            self.cvar.notify_all();
        }
    }

    /// Returns whether the token has been cancelled. This blocks only for as
    /// long as another thread holds the lock.
    pub fn is_cancelled(&self) -> bool {
        *self.mutex.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Allows a thread to sleep while still being interruptible with by the token.
    ///
    /// Spurious wakeups do not cut the sleep short; this only returns before
    /// `duration` has elapsed if the token was cancelled.
    ///
    /// Returns the condition state after either sleeping or being woken up.
    pub fn sleep_with_cancellation(&self, duration: Duration) -> bool {
        let guard = self.mutex.lock().unwrap_or_else(PoisonError::into_inner);

        let (result, _) = self
            .cvar
            .wait_timeout_while(guard, duration, |cancelled| !*cancelled)
            .unwrap_or_else(PoisonError::into_inner);

        *result
    }
}
