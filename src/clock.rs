//! Monotonic "now" used by the engines so tests can control time.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;

/// Source of the current time. Injected into every engine operation so
/// that time-sensitive rules (signup deadlines, game finish, drop
/// deadlines) can be tested deterministically.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// The real clock, backed by [`Utc::now`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only advances when told to. Used by tests that need to
/// pin "now" relative to a game's start/signup/drop deadlines.
pub struct FakeClock {
    now: Mutex<DateTime<Utc>>,
}

impl FakeClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn set(&self, value: DateTime<Utc>) {
        *self.now.lock() = value;
    }

    pub fn advance(&self, duration: chrono::Duration) {
        let mut guard = self.now.lock();
        *guard += duration;
    }
}

impl Clock for FakeClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}
