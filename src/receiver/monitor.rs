//! Receiver monitoring and status line display

use colored::*;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Time without payloads before the status line shows IDLE (milliseconds)
const IDLE_THRESHOLD_MS: u64 = 150;

/// Blink interval for the activity indicator (milliseconds)
const BLINK_INTERVAL_MS: u64 = 200;

#[derive(Debug, Default)]
struct Counters {
    connections_accepted: AtomicU64,
    active_connections: AtomicU64,
    payloads_received: AtomicU64,
    sessions_dumped: AtomicU64,
    errors: AtomicU64,
}

/// Tracks receiver activity across all connection threads.
///
/// Connection handlers only touch atomic counters; a background thread owns
/// the terminal status line.
pub struct ReceiverMonitor {
    counters: Arc<Counters>,
    start_time: Instant,
    update_interval: Duration,
}

impl ReceiverMonitor {
    pub fn new(update_interval_ms: u64) -> Self {
        Self {
            counters: Arc::new(Counters::default()),
            start_time: Instant::now(),
            update_interval: Duration::from_millis(update_interval_ms),
        }
    }

    /// Handle for connection threads to update the counters
    pub fn counters(&self) -> ReceiverCounters {
        ReceiverCounters {
            inner: Arc::clone(&self.counters),
        }
    }

    /// Start the background status line thread
    pub fn start_display(&self) {
        let counters = Arc::clone(&self.counters);
        let update_interval = self.update_interval;
        let start_time = self.start_time;

        thread::spawn(move || {
            let mut last_received = 0u64;
            let mut last_payload_time = Instant::now();
            let mut blink_state = false;
            let mut last_blink_time = Instant::now();

            loop {
                thread::sleep(update_interval);

                let snapshot = ReceiverStats::load(&counters, start_time.elapsed());
                let now = Instant::now();

                let recent = snapshot.payloads_received.saturating_sub(last_received);
                if recent > 0 {
                    last_payload_time = now;
                }
                let is_idle = recent == 0
                    && now.duration_since(last_payload_time)
                        >= Duration::from_millis(IDLE_THRESHOLD_MS);

                if is_idle {
                    blink_state = false;
                } else if now.duration_since(last_blink_time)
                    >= Duration::from_millis(BLINK_INTERVAL_MS)
                {
                    blink_state = !blink_state;
                    last_blink_time = now;
                }

                Self::display_status_line(&Self::render_indicator(is_idle, blink_state), is_idle, &snapshot);
                last_received = snapshot.payloads_received;
            }
        });
    }

    fn render_indicator(is_idle: bool, blink_state: bool) -> String {
        if is_idle {
            "░".normal().to_string()
        } else if blink_state {
            "█".red().bold().to_string()
        } else {
            "░".red().to_string()
        }
    }

    fn display_status_line(indicator: &str, is_idle: bool, stats: &ReceiverStats) {
        let status = if is_idle { "IDLE" } else { "ACTIVE" };
        print!(
            "\r{} [{}] Up: {}s | Connections: {} | Payloads: {} | Dumps: {} | Errors: {}",
            indicator,
            status,
            stats.elapsed.as_secs(),
            stats.active_connections,
            stats.payloads_received,
            stats.sessions_dumped,
            stats.errors
        );
        std::io::Write::flush(&mut std::io::stdout()).ok();
    }

    /// Snapshot of the counters
    pub fn stats(&self) -> ReceiverStats {
        ReceiverStats::load(&self.counters, self.start_time.elapsed())
    }
}

/// Cloneable counter handle for connection threads.
///
/// All updates use `Relaxed` ordering; the counters are independent tallies.
#[derive(Clone)]
pub struct ReceiverCounters {
    inner: Arc<Counters>,
}

impl ReceiverCounters {
    #[inline]
    pub fn connection_opened(&self) {
        self.inner.connections_accepted.fetch_add(1, Ordering::Relaxed);
        self.inner.active_connections.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn connection_closed(&self) {
        self.inner.active_connections.fetch_sub(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn increment_payloads(&self) {
        self.inner.payloads_received.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn increment_dumps(&self) {
        self.inner.sessions_dumped.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn increment_error(&self) {
        self.inner.errors.fetch_add(1, Ordering::Relaxed);
    }
}

/// Receiver counters at one point in time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiverStats {
    pub connections_accepted: u64,
    pub active_connections: u64,
    pub payloads_received: u64,
    pub sessions_dumped: u64,
    pub errors: u64,
    pub elapsed: Duration,
}

impl ReceiverStats {
    fn load(counters: &Counters, elapsed: Duration) -> Self {
        Self {
            connections_accepted: counters.connections_accepted.load(Ordering::Relaxed),
            active_connections: counters.active_connections.load(Ordering::Relaxed),
            payloads_received: counters.payloads_received.load(Ordering::Relaxed),
            sessions_dumped: counters.sessions_dumped.load(Ordering::Relaxed),
            errors: counters.errors.load(Ordering::Relaxed),
            elapsed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monitor_creation() {
        let monitor = ReceiverMonitor::new(100);
        assert_eq!(monitor.update_interval, Duration::from_millis(100));
        assert_eq!(monitor.stats().connections_accepted, 0);
    }

    #[test]
    fn test_counters() {
        let monitor = ReceiverMonitor::new(100);
        let counters = monitor.counters();

        counters.connection_opened();
        counters.connection_opened();
        counters.connection_closed();
        counters.increment_payloads();
        counters.increment_dumps();
        counters.increment_error();

        let stats = monitor.stats();
        assert_eq!(stats.connections_accepted, 2);
        assert_eq!(stats.active_connections, 1);
        assert_eq!(stats.payloads_received, 1);
        assert_eq!(stats.sessions_dumped, 1);
        assert_eq!(stats.errors, 1);
    }

    #[test]
    fn test_stats_report_uptime() {
        let monitor = ReceiverMonitor::new(100);
        thread::sleep(Duration::from_millis(20));
        assert!(monitor.stats().elapsed >= Duration::from_millis(20));
    }

    #[test]
    fn test_counters_shared_across_threads() {
        let monitor = ReceiverMonitor::new(100);
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let counters = monitor.counters();
                thread::spawn(move || {
                    for _ in 0..1000 {
                        counters.increment_payloads();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(monitor.stats().payloads_received, 4000);
    }
}
