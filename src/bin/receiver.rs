use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing::{error, info};
use wslat::logging::init_logging_with_config;
use wslat::receiver::{ConsoleSink, Receiver, ReceiverConfig, ReceiverError};

fn main() {
    let config = ReceiverConfig::parse();

    init_logging_with_config(&config.log_level, config.is_json_format());

    if let Err(e) = config.validate() {
        error!(error = %e, "Invalid configuration");
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = run(config) {
        error!(error = %e, "Receiver failed");
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(config: ReceiverConfig) -> Result<()> {
    let receiver = Receiver::bind(&config, Arc::new(ConsoleSink)).map_err(|e| match e {
        ReceiverError::Bind { addr, source } if source.kind() == std::io::ErrorKind::AddrInUse => {
            anyhow::anyhow!(
                "Failed to bind to {}: Address already in use. Try a different port or ensure no other process is using it.",
                addr
            )
        }
        other => anyhow::Error::new(other),
    })?;

    info!(
        update_interval_ms = config.update_interval,
        quiet_mode = config.quiet,
        "Waiting for connections..."
    );

    let result = receiver.serve();

    let stats = receiver.stats();
    info!(
        connections = stats.connections_accepted,
        payloads = stats.payloads_received,
        dumps = stats.sessions_dumped,
        errors = stats.errors,
        uptime_secs = stats.elapsed.as_secs(),
        "Receiver stopped"
    );
    result?;
    Ok(())
}
