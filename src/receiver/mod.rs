//! Receiver: records per-connection arrival times and summarizes them on DUMP

pub mod config;
pub mod connection;
pub mod error;
pub mod monitor;
pub mod session;

pub use config::ReceiverConfig;
pub use connection::{handle_connection, ConsoleSink, SummarySink};
pub use error::{ReceiverError, Result};
pub use monitor::{ReceiverCounters, ReceiverMonitor, ReceiverStats};
pub use session::{ConnectionSession, SessionEvent, SessionState};

use crate::timing::MonotonicClock;
use std::net::{SocketAddr, TcpListener};
use std::sync::Arc;
use std::thread;
use tracing::{debug, error, info, warn};

/// Listening receiver; each accepted connection gets its own thread and session
pub struct Receiver {
    listener: TcpListener,
    monitor: ReceiverMonitor,
    sink: Arc<dyn SummarySink>,
    clock: MonotonicClock,
    quiet: bool,
}

impl Receiver {
    /// Bind the listener. Failure here is fatal for the receiver.
    pub fn bind(config: &ReceiverConfig, sink: Arc<dyn SummarySink>) -> Result<Self> {
        let addr = config.address();
        let listener = TcpListener::bind(&addr).map_err(|source| {
            warn!(error = %source, addr = %addr, "Failed to bind listener");
            ReceiverError::Bind {
                addr: addr.clone(),
                source,
            }
        })?;
        debug!(addr = %addr, "Listener bound");

        Ok(Self {
            listener,
            monitor: ReceiverMonitor::new(config.update_interval),
            sink,
            clock: MonotonicClock::new(),
            quiet: config.quiet,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Current counters
    pub fn stats(&self) -> ReceiverStats {
        self.monitor.stats()
    }

    /// Accept connections until the listener fails.
    ///
    /// A failure on one connection is logged and counted; other connections
    /// and their sessions are unaffected.
    pub fn serve(&self) -> Result<()> {
        if !self.quiet {
            self.monitor.start_display();
        } else {
            info!("Running in quiet mode (status line disabled)");
        }

        let address = self.local_addr()?;
        info!(address = %address, "Receiver listening");
        let counters = self.monitor.counters();

        for stream in self.listener.incoming() {
            match stream {
                Ok(stream) => {
                    let peer = match stream.peer_addr() {
                        Ok(peer) => peer,
                        Err(e) => {
                            counters.increment_error();
                            warn!(error = %e, "Dropping connection without peer address");
                            continue;
                        }
                    };
                    info!(peer = %peer, "New sender connected");

                    let counters = counters.clone();
                    let sink = Arc::clone(&self.sink);
                    let clock = self.clock;

                    thread::spawn(move || {
                        counters.connection_opened();
                        if let Err(e) =
                            handle_connection(stream, peer, clock, &counters, sink.as_ref())
                        {
                            counters.increment_error();
                            error!(error = %e, peer = %peer, "Connection failed");
                        }
                        counters.connection_closed();
                        info!(peer = %peer, "Sender connection closed");
                    });
                }
                Err(e) => {
                    counters.increment_error();
                    error!(error = %e, "Failed to accept connection");
                }
            }
        }

        Ok(())
    }
}
