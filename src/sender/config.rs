use crate::logging::validate_log_level;
use crate::protocol::MAX_PAYLOAD_SIZE;
use crate::sender::constants::*;
use crate::sender::error::{Result, SenderError};
use clap::Parser;
use std::time::Duration;
use tracing::debug;

#[derive(Parser, Debug, Clone)]
#[command(name = "wslat-sender")]
#[command(about = "Streams fixed-size WebSocket messages at a fixed rate and reports the send cadence")]
pub struct SenderConfig {
    /// Receiver WebSocket URL
    #[arg(long, default_value = "ws://127.0.0.1:8080")]
    pub server: String,

    /// Target send rate in messages per second
    #[arg(long, default_value_t = DEFAULT_RATE)]
    pub rate: u32,

    /// Session duration in seconds
    #[arg(long, default_value_t = DEFAULT_DURATION_SECS)]
    pub duration: u32,

    /// Payload size in bytes
    #[arg(long, default_value_t = DEFAULT_PAYLOAD_SIZE)]
    pub payload_size: usize,

    /// Disable the progress bar
    #[arg(long)]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Log format (text or json)
    #[arg(long, default_value = "text", value_parser = ["text", "json"])]
    pub log_format: String,
}

impl SenderConfig {
    /// Number of payload messages in one session: `rate * duration`
    pub fn total_ticks(&self) -> usize {
        self.rate as usize * self.duration as usize
    }

    /// Period between two ticks
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(1) / self.rate.max(1)
    }

    /// Validates the configuration values
    pub fn validate(&self) -> Result<()> {
        debug!("Validating sender configuration");

        if !self.server.starts_with("ws://") {
            return Err(SenderError::Config(format!(
                "server must be a ws:// URL, got {}",
                self.server
            )));
        }
        if self.rate == 0 || self.rate > MAX_RATE {
            return Err(SenderError::Config(format!(
                "rate must be between 1 and {}",
                MAX_RATE
            )));
        }
        if self.duration == 0 {
            return Err(SenderError::Config("duration must be > 0".into()));
        }
        if self.payload_size > MAX_PAYLOAD_SIZE {
            return Err(SenderError::Config(format!(
                "payload_size must be <= {}",
                MAX_PAYLOAD_SIZE
            )));
        }
        validate_log_level(&self.log_level).map_err(SenderError::Config)?;

        debug!("Sender configuration validated successfully");
        Ok(())
    }

    /// Returns true if JSON format logging is enabled
    pub fn is_json_format(&self) -> bool {
        self.log_format.to_lowercase() == "json"
    }
}
