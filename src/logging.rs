use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log levels accepted by `--log-level`
pub const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Check a `--log-level` value against `VALID_LOG_LEVELS`
pub fn validate_log_level(level: &str) -> Result<(), String> {
    if VALID_LOG_LEVELS.contains(&level.to_lowercase().as_str()) {
        Ok(())
    } else {
        Err(format!(
            "log_level must be one of: {}",
            VALID_LOG_LEVELS.join(", ")
        ))
    }
}

/// Initialize structured logging with an explicit level and format
///
/// The `RUST_LOG` environment variable takes precedence over `level`.
/// Examples:
/// - `RUST_LOG=debug` - Debug level and above
/// - `RUST_LOG=wslat=trace` - Trace level for this crate only
///
/// With `json` set, events are written as one JSON object per line, which is
/// what log collectors expect when the receiver runs under systemd or Docker.
pub fn init_logging_with_config(level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(true)
                    .with_line_number(true)
                    .with_file(true),
            )
            .init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_log_level() {
        assert!(validate_log_level("info").is_ok());
        assert!(validate_log_level("DEBUG").is_ok());
        assert!(validate_log_level("verbose").is_err());
    }
}
