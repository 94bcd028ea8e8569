//! Stop Signal - cancellation token for the caller thread
//!
//! The caller blocked in `Controller::run_until_stopped` waits on this
//! signal between polls. Anything able to clone it (a SIGINT handler, a
//! supervisor thread, a test) can trigger the clean shutdown.

use parking_lot::{Condvar, Mutex};
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone, Default)]
pub struct StopSignal {
    inner: Arc<SignalState>,
}

#[derive(Default)]
struct SignalState {
    triggered: Mutex<bool>,
    condvar: Condvar,
}

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Trigger the signal and wake every waiter. Triggering is permanent.
    pub fn trigger(&self) {
        let mut triggered = self.inner.triggered.lock();
        *triggered = true;
        self.inner.condvar.notify_all();
    }

    pub fn is_triggered(&self) -> bool {
        *self.inner.triggered.lock()
    }

    /// Block for at most `timeout`, returning early once triggered
    ///
    /// Returns whether the signal is triggered.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let mut triggered = self.inner.triggered.lock();
        if !*triggered {
            self.inner.condvar.wait_for(&mut triggered, timeout);
        }
        *triggered
    }
}

impl std::fmt::Debug for StopSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StopSignal")
            .field("triggered", &self.is_triggered())
            .finish()
    }
}
