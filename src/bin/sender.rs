use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use tracing::error;
use wslat::logging::init_logging_with_config;
use wslat::sender::{Sender, SenderConfig};

fn main() {
    let config = SenderConfig::parse();

    init_logging_with_config(&config.log_level, config.is_json_format());

    if let Err(e) = config.validate() {
        error!(error = %e, "Invalid configuration");
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = run(config) {
        error!(error = %e, "Sender failed");
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(config: SenderConfig) -> Result<()> {
    println!("{}", "wslat cadence sender".bold());
    println!("Connecting to: {}", config.server);

    let sender = Sender::connect(&config).context("Connection failed")?;

    println!(
        "Connected! Streaming {} messages of {} bytes at {}hz.\n",
        config.total_ticks(),
        config.payload_size,
        config.rate
    );

    let report = sender.run().context("Session aborted")?;
    report.print()?;
    Ok(())
}
