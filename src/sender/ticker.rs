use std::thread;
use std::time::{Duration, Instant};
use tracing::trace;

/// Fixed-period scheduler for the send loop.
///
/// `wait` blocks until the next deadline. The caller does all of a tick's work
/// before calling `wait` again, so ticks never overlap. When a tick is late the
/// schedule is re-anchored on the current instant instead of firing a burst of
/// catch-up ticks.
#[derive(Debug)]
pub struct Ticker {
    period: Duration,
    next_deadline: Option<Instant>,
    late_ticks: usize,
}

impl Ticker {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            next_deadline: None,
            late_ticks: 0,
        }
    }

    /// Ticks that fired at least one full period behind schedule
    pub fn late_ticks(&self) -> usize {
        self.late_ticks
    }

    /// Block until the next tick and return its scheduled instant.
    ///
    /// The first call fires immediately.
    pub fn wait(&mut self) -> Instant {
        let now = Instant::now();
        let deadline = self.next_deadline.unwrap_or(now);

        let fired = if deadline > now {
            thread::sleep(deadline - now);
            deadline
        } else {
            let lag = now - deadline;
            if lag >= self.period && !self.period.is_zero() {
                self.late_ticks += 1;
                trace!(lag_us = lag.as_micros() as u64, "Tick fired late");
            }
            now
        };

        self.next_deadline = Some(fired + self.period);
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_tick_is_immediate() {
        let mut ticker = Ticker::new(Duration::from_millis(200));
        let start = Instant::now();
        ticker.wait();
        assert!(start.elapsed() < Duration::from_millis(100));
    }

    #[test]
    fn test_ticks_are_spaced_by_period() {
        let period = Duration::from_millis(10);
        let mut ticker = Ticker::new(period);
        let start = Instant::now();

        let fired: Vec<Instant> = (0..5).map(|_| ticker.wait()).collect();

        assert!(start.elapsed() >= period * 4);
        for pair in fired.windows(2) {
            assert!(pair[1] - pair[0] >= period);
        }
        assert_eq!(ticker.late_ticks(), 0);
    }

    #[test]
    fn test_late_tick_does_not_burst() {
        let period = Duration::from_millis(10);
        let mut ticker = Ticker::new(period);
        ticker.wait();

        thread::sleep(Duration::from_millis(35));
        ticker.wait();
        assert_eq!(ticker.late_ticks(), 1);

        // The schedule restarted from the late tick, so the next one waits
        let start = Instant::now();
        ticker.wait();
        assert!(start.elapsed() >= Duration::from_millis(8));
    }
}
