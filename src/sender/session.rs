use crate::analysis::histogram::{aggregate, DeltaHistogram};
use crate::analysis::reporter::Reporter;
use crate::protocol::{ControlMessage, Payload};
use crate::sender::config::SenderConfig;
use crate::sender::error::{Result, SenderError};
use crate::sender::progress::ProgressTracker;
use crate::sender::socket::MessageSocket;
use crate::sender::ticker::Ticker;
use crate::timing::{Clock, TimestampSequence};
use colored::*;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// What one sender session sends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionPlan {
    /// Number of payload messages, one per tick
    pub ticks: usize,
    /// Period between ticks
    pub tick_interval: Duration,
    /// Size of each payload in bytes
    pub payload_size: usize,
}

impl From<&SenderConfig> for SessionPlan {
    fn from(config: &SenderConfig) -> Self {
        Self {
            ticks: config.total_ticks(),
            tick_interval: config.tick_interval(),
            payload_size: config.payload_size,
        }
    }
}

/// Outcome of a completed sender session
#[derive(Debug, Clone)]
pub struct SenderReport {
    /// Histogram of the sender's own send-schedule cadence
    pub histogram: DeltaHistogram,
    /// Send-time timestamps, one per payload
    pub send_times: TimestampSequence,
    pub ticks_sent: usize,
    /// Ticks that fired a full period or more behind schedule
    pub late_ticks: usize,
    pub elapsed: Duration,
}

impl SenderReport {
    /// Messages per second actually achieved over the payload phase
    pub fn achieved_rate(&self) -> Option<f64> {
        let elapsed_secs = self.elapsed.as_secs_f64();
        (elapsed_secs > 0.0).then(|| self.ticks_sent as f64 / elapsed_secs)
    }

    /// Print the send-cadence histogram followed by the pacing summary
    pub fn print(&self) -> Result<()> {
        Reporter.print("Send cadence", &self.histogram)?;

        println!("Duration: {:.2}s", self.elapsed.as_secs_f64());
        if let Some(rate) = self.achieved_rate() {
            println!("          └─ {:.1} messages/second achieved", rate);
        }
        if self.late_ticks > 0 {
            println!(
                "{}",
                format!(
                    "⚠ {} tick(s) fell at least one period behind schedule",
                    self.late_ticks
                )
                .yellow()
            );
        }

        info!(
            ticks_sent = self.ticks_sent,
            late_ticks = self.late_ticks,
            "Send cadence reported"
        );
        Ok(())
    }
}

/// Run one measurement session over an established connection.
///
/// Sends `RESET`, then one payload per tick with the send time captured just
/// before each send, then `DUMP`, and finally aggregates the send times. Any
/// failed send aborts the session; nothing is summarized in that case.
pub fn run_session<S: MessageSocket, C: Clock>(
    socket: &mut S,
    clock: &C,
    plan: &SessionPlan,
    progress: &mut ProgressTracker,
) -> Result<SenderReport> {
    info!(
        ticks = plan.ticks,
        tick_interval_us = plan.tick_interval.as_micros() as u64,
        payload_size = plan.payload_size,
        "Starting session"
    );

    send_control(socket, ControlMessage::Reset, 0)?;

    let mut rng = rand::thread_rng();
    let mut send_times = TimestampSequence::with_capacity(plan.ticks);
    let mut ticker = Ticker::new(plan.tick_interval);
    let start_time = Instant::now();

    for tick in 1..=plan.ticks {
        ticker.wait();

        send_times.record(clock.now_ms());
        let payload = Payload::random(plan.payload_size, &mut rng)?;
        socket
            .send_message(payload.encode())
            .map_err(|e| {
                warn!(error = %e, tick = tick, "Failed to send payload, aborting session");
                SenderError::Send {
                    what: "payload",
                    tick,
                    source: Box::new(e),
                }
            })?;
        debug!(tick = tick, bytes = payload.len(), "Payload sent");

        progress.update(&send_times);
    }

    let elapsed = start_time.elapsed();
    send_control(socket, ControlMessage::Dump, plan.ticks)?;

    progress.final_update(&send_times);
    progress.finish();

    let histogram = aggregate(send_times.as_slice());
    info!(
        ticks_sent = send_times.len(),
        late_ticks = ticker.late_ticks(),
        total_deltas = histogram.total_deltas(),
        elapsed_ms = elapsed.as_millis() as u64,
        "Session completed"
    );

    Ok(SenderReport {
        histogram,
        ticks_sent: send_times.len(),
        send_times,
        late_ticks: ticker.late_ticks(),
        elapsed,
    })
}

fn send_control<S: MessageSocket>(
    socket: &mut S,
    control: ControlMessage,
    tick: usize,
) -> Result<()> {
    socket.send_message(control.encode()).map_err(|e| {
        warn!(error = %e, token = control.token(), "Failed to send control message");
        SenderError::Send {
            what: control.token(),
            tick,
            source: Box::new(e),
        }
    })?;
    debug!(token = control.token(), "Control message sent");
    Ok(())
}
