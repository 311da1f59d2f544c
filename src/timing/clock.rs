use crate::timing::Timestamp;
use std::time::Instant;

/// Source of millisecond timestamps.
///
/// Implementations must be cheap to call; the sender captures one timestamp
/// per tick and the receiver one per arriving payload.
pub trait Clock: Send + Sync {
    /// Current time in whole milliseconds since the clock's epoch
    fn now_ms(&self) -> Timestamp;
}

/// Monotonic clock anchored at construction, rounded to the nearest millisecond.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    epoch: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }

    /// Rounds an elapsed microsecond count to the nearest millisecond
    fn round_to_ms(elapsed_us: u128) -> Timestamp {
        ((elapsed_us + 500) / 1000) as Timestamp
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now_ms(&self) -> Timestamp {
        Self::round_to_ms(self.epoch.elapsed().as_micros())
    }
}


#[cfg(test)]
pub use tests::MockClock;
