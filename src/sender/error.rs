use crate::analysis::statistics::StatisticsError;
use crate::protocol::ProtocolError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SenderError {
    #[error("Failed to connect to {url}: {source}")]
    Connect {
        url: String,
        source: Box<tungstenite::Error>,
    },

    #[error("Failed to send {what} at tick {tick}: {source}")]
    Send {
        what: &'static str,
        tick: usize,
        source: Box<tungstenite::Error>,
    },

    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Progress display error: {0}")]
    Progress(String),

    #[error("Report error: {0}")]
    Report(#[from] StatisticsError),
}

pub type Result<T> = std::result::Result<T, SenderError>;
