use std::time::{Duration, Instant};

pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;

    /// Wall-clock milliseconds since the Unix epoch.
    fn unix_ms(&self) -> i64;

    fn elapsed(&self, start: Instant) -> Duration {
        self.now().duration_since(start)
    }

    fn elapsed_ms(&self, start: Instant) -> u64 {
        self.elapsed(start).as_millis() as u64
    }
}
