use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReceiverError {
    #[error("Failed to bind to {addr}: {source}")]
    Bind {
        addr: String,
        source: std::io::Error,
    },

    #[error("WebSocket handshake failed: {0}")]
    Handshake(String),

    #[error("Transport error: {0}")]
    Transport(#[from] Box<tungstenite::Error>),

    #[error("Network I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ReceiverError>;
