use crate::sender::error::{Result, SenderError};
use std::net::TcpStream;
use std::time::Duration;
use tracing::{debug, warn};
use tungstenite::stream::MaybeTlsStream;
use tungstenite::{Message, WebSocket};

/// How long to wait for the receiver to acknowledge a close frame
const CLOSE_TIMEOUT: Duration = Duration::from_secs(1);

/// Trait for the sender side of a message-framed connection
pub trait MessageSocket: Send {
    /// Write one message and flush it to the wire
    fn send_message(&mut self, message: Message) -> std::result::Result<(), tungstenite::Error>;

    /// Close the connection politely
    fn close(&mut self) -> std::result::Result<(), tungstenite::Error>;
}

/// WebSocket client over a plain TCP stream
pub struct WebSocketClient {
    socket: WebSocket<MaybeTlsStream<TcpStream>>,
}

impl WebSocketClient {
    /// Connect and complete the WebSocket handshake
    pub fn connect(url: &str) -> Result<Self> {
        debug!(url = url, "Connecting WebSocket");
        let (socket, response) = tungstenite::connect(url).map_err(|e| {
            warn!(error = %e, url = url, "Failed to connect");
            SenderError::Connect {
                url: url.to_string(),
                source: Box::new(e),
            }
        })?;

        if let MaybeTlsStream::Plain(stream) = socket.get_ref() {
            if let Err(e) = stream.set_nodelay(true) {
                warn!(error = %e, "Failed to disable Nagle's algorithm");
            }
        }

        debug!(status = %response.status(), "WebSocket handshake completed");
        Ok(Self { socket })
    }
}

impl MessageSocket for WebSocketClient {
    fn send_message(&mut self, message: Message) -> std::result::Result<(), tungstenite::Error> {
        self.socket.send(message)
    }

    fn close(&mut self) -> std::result::Result<(), tungstenite::Error> {
        if let MaybeTlsStream::Plain(stream) = self.socket.get_ref() {
            stream.set_read_timeout(Some(CLOSE_TIMEOUT))?;
        }
        self.socket.close(None)?;

        // Drain until the receiver echoes the close frame
        loop {
            match self.socket.read() {
                Ok(_) => continue,
                Err(tungstenite::Error::ConnectionClosed) => {
                    debug!("WebSocket closed");
                    return Ok(());
                }
                Err(e) => return Err(e),
            }
        }
    }
}


#[cfg(test)]
pub use tests::MockMessageSocket;
