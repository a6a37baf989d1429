//! Pausing between retries, with a fake implementation for testing.

use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

//------------ Sleep ---------------------------------------------------------

/// A trait for blocking the current thread for some time.
pub trait Sleep {
    /// Blocks for `duration`.
    fn sleep(&self, duration: Duration);
}

impl<T: Sleep + ?Sized> Sleep for &T {
    fn sleep(&self, duration: Duration) {
        (**self).sleep(duration)
    }
}

//------------ SystemSleep ---------------------------------------------------

/// Implementation of the [Sleep] trait using [`std::thread::sleep`].
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemSleep;

impl Sleep for SystemSleep {
    fn sleep(&self, duration: Duration) {
        thread::sleep(duration)
    }
}

//------------ FakeSleep -----------------------------------------------------

/// Implementation of the [Sleep] trait that returns immediately.
///
/// Every requested pause is recorded instead. Clones share the record, so
/// a clone can be handed to a resolver while the original is used to
/// inspect what happened.
#[derive(Clone, Debug, Default)]
pub struct FakeSleep {
    /// The pauses requested so far.
    pauses: Arc<Mutex<Vec<Duration>>>,
}

impl FakeSleep {
    /// Creates a new fake with no recorded pauses.
    pub fn new() -> Self {
        Default::default()
    }

    /// Returns all pauses requested so far.
    pub fn pauses(&self) -> Vec<Duration> {
        match self.pauses.lock() {
            Ok(pauses) => pauses.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Returns the sum of all pauses requested so far.
    pub fn total(&self) -> Duration {
        self.pauses().into_iter().sum()
    }
}

impl Sleep for FakeSleep {
    fn sleep(&self, duration: Duration) {
        match self.pauses.lock() {
            Ok(mut pauses) => pauses.push(duration),
            Err(poisoned) => poisoned.into_inner().push(duration),
        }
    }
}

//============ Testing =======================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn fake_sleep_records_pauses() {
        let sleep = FakeSleep::new();
        let shared = sleep.clone();
        shared.sleep(Duration::from_secs(4));
        shared.sleep(Duration::from_secs(4));
        assert_eq!(sleep.pauses().len(), 2);
        assert_eq!(sleep.total(), Duration::from_secs(8));
    }
}
