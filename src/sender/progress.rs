use crate::sender::constants::*;
use crate::sender::error::{Result, SenderError};
use crate::timing::TimestampSequence;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::{Duration, Instant};

/// Progress bar with the live send cadence
pub struct ProgressTracker {
    pb: ProgressBar,
    last_update: Instant,
    target_interval_ms: f64,
}

impl ProgressTracker {
    /// Create a visible progress tracker
    pub fn new(total_ticks: usize, tick_interval: Duration) -> Result<Self> {
        let pb = ProgressBar::new(total_ticks as u64);
        pb.set_style(
            ProgressStyle::with_template(
                "{msg}\n{bar:40.cyan/blue} {pos:>7}/{len:7} [{elapsed_precise}]",
            )
            .map_err(|e| SenderError::Progress(format!("Failed to create progress style: {}", e)))?
            .progress_chars("█░"),
        );
        pb.enable_steady_tick(Duration::from_millis(PROGRESS_TICK_INTERVAL_MS));

        Ok(Self::with_bar(pb, tick_interval))
    }

    /// Tracker that draws nothing, for `--quiet` runs and tests
    pub fn hidden(tick_interval: Duration) -> Self {
        Self::with_bar(ProgressBar::hidden(), tick_interval)
    }

    fn with_bar(pb: ProgressBar, tick_interval: Duration) -> Self {
        Self {
            pb,
            last_update: Instant::now(),
            target_interval_ms: tick_interval.as_secs_f64() * 1000.0,
        }
    }

    /// Count one sent tick and refresh the cadence line now and then
    pub fn update(&mut self, send_times: &TimestampSequence) {
        self.pb.inc(1);

        if self.last_update.elapsed().as_millis() > LIVE_STATS_UPDATE_INTERVAL_MS {
            self.update_live_stats(send_times);
            self.last_update = Instant::now();
        }
    }

    fn update_live_stats(&self, send_times: &TimestampSequence) {
        let times = send_times.as_slice();
        if times.len() < 2 {
            return;
        }

        let last_delta = times[times.len() - 1] - times[times.len() - 2];
        let mean_delta = (times[times.len() - 1] - times[0]) as f64 / (times.len() - 1) as f64;
        let rate = if mean_delta > 0.0 {
            1000.0 / mean_delta
        } else {
            0.0
        };

        // Within a millisecond of the target period is on cadence
        let mean_str = format!("{:.2}", mean_delta);
        let mean_color = if (mean_delta - self.target_interval_ms).abs() <= 1.0 {
            mean_str.green()
        } else {
            mean_str.yellow()
        };

        self.pb.set_message(format!(
            "→ {}ms   Mean: {}ms   Rate: {:.1} msg/s",
            last_delta, mean_color, rate
        ));
    }

    /// Final refresh before finishing
    pub fn final_update(&mut self, send_times: &TimestampSequence) {
        self.update_live_stats(send_times);
    }

    pub fn finish(&mut self) {
        self.pb.finish();
    }
}
