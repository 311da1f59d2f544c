use crate::analysis::histogram::{aggregate, DeltaHistogram};
use crate::protocol::{ControlMessage, InboundMessage};
use crate::timing::{Clock, TimestampSequence};
use tracing::debug;

/// Session state of one connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// No RESET seen yet
    Idle,
    /// Accepting arrival timestamps
    Recording(TimestampSequence),
}

/// What handling one inbound message produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Reset,
    Recorded { arrivals: usize },
    Dumped(DeltaHistogram),
}

/// Arrival-time recorder for a single connection.
///
/// Owned by the connection's handler thread; nothing else reads or writes it.
#[derive(Debug)]
pub struct ConnectionSession<C: Clock> {
    state: SessionState,
    clock: C,
}

impl<C: Clock> ConnectionSession<C> {
    pub fn new(clock: C) -> Self {
        Self {
            state: SessionState::Idle,
            clock,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Arrivals recorded in the current session
    pub fn arrivals(&self) -> usize {
        match &self.state {
            SessionState::Idle => 0,
            SessionState::Recording(sequence) => sequence.len(),
        }
    }

    /// Apply one inbound message.
    ///
    /// A payload or DUMP before any RESET acts on an empty sequence.
    pub fn handle(&mut self, message: InboundMessage) -> SessionEvent {
        match message {
            InboundMessage::Control(ControlMessage::Reset) => {
                self.state = SessionState::Recording(TimestampSequence::new());
                debug!("Session reset");
                SessionEvent::Reset
            }
            InboundMessage::Control(ControlMessage::Dump) => {
                let histogram = match &self.state {
                    SessionState::Idle => aggregate(&[]),
                    SessionState::Recording(sequence) => aggregate(sequence.as_slice()),
                };
                self.state = SessionState::Recording(TimestampSequence::new());
                debug!(total_deltas = histogram.total_deltas(), "Session dumped");
                SessionEvent::Dumped(histogram)
            }
            InboundMessage::Payload { .. } => {
                let now = self.clock.now_ms();
                let mut sequence = match std::mem::replace(&mut self.state, SessionState::Idle) {
                    SessionState::Idle => TimestampSequence::new(),
                    SessionState::Recording(sequence) => sequence,
                };
                sequence.record(now);
                let arrivals = sequence.len();
                self.state = SessionState::Recording(sequence);
                SessionEvent::Recorded { arrivals }
            }
        }
    }
}
