//! Receiver configuration module
//!
//! Provides CLI argument parsing and validation for the receiver.

use crate::logging::validate_log_level;
use crate::receiver::error::{ReceiverError, Result};
use clap::Parser;
use tracing::debug;

#[derive(Parser, Debug, Clone)]
#[command(name = "wslat-receiver")]
#[command(about = "WebSocket receiver that reports the arrival cadence of each sender's session")]
pub struct ReceiverConfig {
    /// Bind address
    #[arg(long, default_value = "0.0.0.0")]
    pub bind: String,

    /// Bind port
    #[arg(long, default_value_t = 8080)]
    pub port: u16,

    /// Monitor update interval in milliseconds
    #[arg(long, default_value_t = 100)]
    pub update_interval: u64,

    /// Disable the status line (useful for Docker/systemd/non-interactive environments)
    #[arg(long)]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Log format (text or json)
    #[arg(long, default_value = "text", value_parser = ["text", "json"])]
    pub log_format: String,
}

impl ReceiverConfig {
    /// Returns the full bind address as a string (bind:port)
    pub fn address(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }

    /// Validates the configuration values
    pub fn validate(&self) -> Result<()> {
        debug!("Validating receiver configuration");

        if self.update_interval == 0 {
            return Err(ReceiverError::Config("update_interval must be > 0".into()));
        }
        validate_log_level(&self.log_level).map_err(ReceiverError::Config)?;

        debug!("Receiver configuration validated successfully");
        Ok(())
    }

    /// Returns true if JSON format logging is enabled
    pub fn is_json_format(&self) -> bool {
        self.log_format.to_lowercase() == "json"
    }
}
