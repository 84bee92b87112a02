use std::sync::atomic::AtomicI64;
use std::sync::atomic::Ordering;
use std::time::Instant;

use crate::usecases::ports::Clock;

pub struct FixedClock {
    start: Instant,
    unix_ms: AtomicI64,
}

impl FixedClock {
    pub fn new(unix_ms: i64) -> Self {
        Self {
            start: Instant::now(),
            unix_ms: AtomicI64::new(unix_ms),
        }
    }

    pub fn advance_ms(&self, ms: i64) {
        self.unix_ms.fetch_add(ms, Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Instant {
        self.start
    }

    fn unix_ms(&self) -> i64 {
        self.unix_ms.load(Ordering::SeqCst)
    }
}
