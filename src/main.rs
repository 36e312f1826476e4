mod config;
mod error;
mod output;
mod report;
mod scanner;

use std::io;
use std::time::Duration;

use anyhow::Result;
use indicatif::ProgressBar;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::output::OutputWriter;
use crate::report::Device;
use crate::scanner::Scanner;

#[tokio::main]
async fn main() -> Result<()> {
    // stdout is reserved for records and the sentinel; all diagnostics
    // go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            warn!("could not load configuration: {}, falling back to defaults", e);
            Config::default()
        }
    };
    let config = match config.validate() {
        Ok(()) => config,
        Err(e) => {
            warn!("invalid configuration: {}, falling back to defaults", e);
            Config::default()
        }
    };

    let devices = discover(&config).await;

    let stdout = io::stdout();
    let mut writer = OutputWriter::new(stdout.lock());
    for device in &devices {
        writer.write_record(device)?;
    }
    writer.finish()?;

    info!("discovery finished, {} device(s) emitted", devices.len());
    Ok(())
}

/// Run the scan and parse its report into device records.
///
/// Scan failures are diagnostics, not fatal: the caller still emits the
/// completion sentinel over an empty record set.
async fn discover(config: &Config) -> Vec<Device> {
    let scanner = Scanner::new(config.clone());

    let spinner = ProgressBar::new_spinner();
    spinner.set_message(format!("scanning {}", config.target_range));
    spinner.enable_steady_tick(Duration::from_millis(120));

    let result = scanner.scan().await;
    spinner.finish_and_clear();

    match result {
        Ok(raw) => report::parse_report(&raw),
        Err(e) => {
            error!("scan failed: {}", e);
            Vec::new()
        }
    }
}
