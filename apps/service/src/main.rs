#![warn(clippy::all, clippy::pedantic)]

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

mod alert;
mod config;
mod error;
mod ip_guard;
mod monitoring;
mod rotation;

use alert::SmtpNotifier;
use config::Config;
use error::AppError;
use monitoring::Scheduler;

/// Uptime monitor: probes HTTP endpoints and emails alerts on failures.
#[derive(Debug, Parser)]
#[command(name = "watchpost", version, about)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the resolved configuration and exit
    #[arg(long)]
    print_config: bool,
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let cli = Cli::parse();

    let config = Config::from_config(cli.config.as_deref())?;
    if cli.print_config {
        println!("{config}");
        return Ok(());
    }
    config.validate()?;

    let _guard = logger::init(&config.log_directory)?;

    // Compress dated logs left over from previous days; while running, the
    // scheduler repeats this whenever the date rolls over.
    rotation::rotate_logs(&config.log_directory, chrono::Local::now().date_naive())?;

    let notifier = Arc::new(SmtpNotifier::new(config.smtp.clone()));

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.probe_timeout_seconds))
        .build()
        .map_err(anyhow::Error::from)?;
    ip_guard::verify_public_ip(
        &client,
        notifier.as_ref(),
        &config.ip_echo_url,
        &config.expected_public_ip,
    )
    .await?;

    let scheduler = Scheduler::new(&config, notifier)?;
    scheduler.run().await?;
    Ok(())
}
