use crate::analysis::histogram::DeltaHistogram;
use crate::analysis::reporter::Reporter;
use crate::protocol::InboundMessage;
use crate::receiver::error::{ReceiverError, Result};
use crate::receiver::monitor::ReceiverCounters;
use crate::receiver::session::{ConnectionSession, SessionEvent};
use crate::timing::Clock;
use std::net::{SocketAddr, TcpStream};
use tracing::{debug, error, info, trace};
use tungstenite::error::ProtocolError as WsProtocolError;

/// Destination for the histogram produced by each DUMP
pub trait SummarySink: Send + Sync {
    fn emit(&self, peer: SocketAddr, histogram: &DeltaHistogram);
}

/// Prints every summary to stdout through the reporter
#[derive(Debug, Default)]
pub struct ConsoleSink;

impl SummarySink for ConsoleSink {
    fn emit(&self, peer: SocketAddr, histogram: &DeltaHistogram) {
        info!(
            peer = %peer,
            total_deltas = histogram.total_deltas(),
            distinct_deltas = histogram.buckets().len(),
            "Session summary"
        );
        if let Err(e) = Reporter.print(&format!("Arrivals from {}", peer), histogram) {
            error!(error = %e, peer = %peer, "Failed to print summary");
        }
    }
}

/// Serve one accepted TCP connection until the peer goes away.
///
/// Completes the WebSocket handshake, then feeds every data message into a
/// session owned by this call. Returns `Ok` on a clean or abrupt disconnect
/// and `Err` on handshake or transport failures; either way the session is
/// dropped with the connection.
pub fn handle_connection<C: Clock>(
    stream: TcpStream,
    peer: SocketAddr,
    clock: C,
    counters: &ReceiverCounters,
    sink: &dyn SummarySink,
) -> Result<()> {
    if let Err(e) = stream.set_nodelay(true) {
        debug!(error = %e, peer = %peer, "Failed to disable Nagle's algorithm");
    }

    let mut socket =
        tungstenite::accept(stream).map_err(|e| ReceiverError::Handshake(e.to_string()))?;
    debug!(peer = %peer, "WebSocket handshake completed");

    let mut session = ConnectionSession::new(clock);

    loop {
        let message = match socket.read() {
            Ok(message) => message,
            Err(tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed) => {
                debug!(peer = %peer, "Sender disconnected");
                return Ok(());
            }
            Err(tungstenite::Error::Protocol(WsProtocolError::ResetWithoutClosingHandshake)) => {
                debug!(peer = %peer, "Sender disconnected without closing handshake");
                return Ok(());
            }
            Err(e) => return Err(ReceiverError::Transport(Box::new(e))),
        };

        let Some(inbound) = InboundMessage::decode(&message) else {
            trace!(peer = %peer, "Ignoring transport control frame");
            continue;
        };

        match session.handle(inbound) {
            SessionEvent::Reset => {
                info!(peer = %peer, "Session started");
            }
            SessionEvent::Recorded { arrivals } => {
                counters.increment_payloads();
                trace!(peer = %peer, arrivals = arrivals, "Payload recorded");
            }
            SessionEvent::Dumped(histogram) => {
                counters.increment_dumps();
                sink.emit(peer, &histogram);
            }
        }
    }
}
