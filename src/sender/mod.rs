//! Sender: streams payloads at a fixed rate and reports its own send cadence

pub mod config;
pub mod constants;
pub mod error;
pub mod progress;
pub mod session;
pub mod socket;
pub mod ticker;

pub use config::SenderConfig;
pub use error::{Result, SenderError};
pub use progress::ProgressTracker;
pub use session::{run_session, SenderReport, SessionPlan};
pub use socket::{MessageSocket, WebSocketClient};
pub use ticker::Ticker;

use crate::timing::{Clock, MonotonicClock};
use tracing::{info, warn};

/// A connected sender ready to run one session
pub struct Sender<S: MessageSocket, C: Clock> {
    socket: S,
    clock: C,
    plan: SessionPlan,
    quiet: bool,
}

impl Sender<WebSocketClient, MonotonicClock> {
    /// Connect to the receiver named in the configuration.
    ///
    /// A connection failure is returned as is; nothing is retried.
    pub fn connect(config: &SenderConfig) -> Result<Self> {
        let socket = WebSocketClient::connect(&config.server)?;
        info!(server = %config.server, "Connected to receiver");
        Ok(Self::new(
            socket,
            MonotonicClock::new(),
            SessionPlan::from(config),
            config.quiet,
        ))
    }
}

impl<S: MessageSocket, C: Clock> Sender<S, C> {
    pub fn new(socket: S, clock: C, plan: SessionPlan, quiet: bool) -> Self {
        Self {
            socket,
            clock,
            plan,
            quiet,
        }
    }

    /// Run the session, then close the connection
    pub fn run(mut self) -> Result<SenderReport> {
        let mut progress = if self.quiet {
            ProgressTracker::hidden(self.plan.tick_interval)
        } else {
            ProgressTracker::new(self.plan.ticks, self.plan.tick_interval)?
        };

        let report = run_session(&mut self.socket, &self.clock, &self.plan, &mut progress)?;

        // The session is already complete, a failed close only gets logged
        if let Err(e) = self.socket.close() {
            warn!(error = %e, "Failed to close connection cleanly");
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sender::socket::MockMessageSocket;
    use crate::timing::clock::MockClock;
    use std::time::Duration;

    #[test]
    fn test_run_closes_socket_after_session() -> Result<()> {
        let mut socket = MockMessageSocket::new();
        socket.expect_send_message().times(4).returning(|_| Ok(()));
        socket
            .expect_close()
            .times(1)
            .returning(|| Err(tungstenite::Error::ConnectionClosed));

        let mut clock = MockClock::new();
        clock.expect_now_ms().returning(|| 0);

        let plan = SessionPlan {
            ticks: 2,
            tick_interval: Duration::from_millis(1),
            payload_size: 8,
        };
        let report = Sender::new(socket, clock, plan, true).run()?;

        assert_eq!(report.ticks_sent, 2);
        assert_eq!(report.histogram.count_of(0), 1);
        Ok(())
    }
}
