//! Time source for page ages.

use std::cell::Cell;
use std::time::{SystemTime, UNIX_EPOCH};

/// Supplies the current time in Unix seconds.
pub trait Clock {
    fn now_secs(&self) -> u64;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_secs(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<u64>,
}

impl ManualClock {
    /// Create a clock reading `now`.
    pub fn at(now: u64) -> Self {
        Self { now: Cell::new(now) }
    }

    /// Move the clock forward.
    pub fn advance(&self, secs: u64) {
        self.now.set(self.now.get() + secs);
    }
}

impl Clock for ManualClock {
    fn now_secs(&self) -> u64 {
        self.now.get()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_secs(&self) -> u64 {
        (**self).now_secs()
    }
}
