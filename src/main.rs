//! sysglance - live CPU, memory and disk usage in the terminal
//!
//! Samples the host on a fixed cadence and redraws a single full-screen
//! dashboard with per-core bars, a memory bar and a partition table.

mod config;
mod core;
mod integrations;
mod metrics;
mod ui;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::core::app::App;

#[derive(Parser)]
#[command(name = "sysglance")]
#[command(author = "sysglance Contributors")]
#[command(version = "0.1.0")]
#[command(about = "Live CPU, memory and disk usage in your terminal", long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Color theme (candy, tokyo-night, nord)
    #[arg(long, value_name = "NAME")]
    theme: Option<String>,

    /// Delay between refreshes in milliseconds
    #[arg(long, value_name = "MS")]
    interval_ms: Option<u64>,
}

fn setup_logging(verbosity: u8) -> Result<tracing_appender::non_blocking::WorkerGuard> {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    // The dashboard owns the screen, so logs only ever go to a file
    let log_dir = dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("sysglance")
        .join("logs");

    std::fs::create_dir_all(&log_dir)?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, "sysglance.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    Ok(guard)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Keep the guard alive for the duration of the program
    let _logging_guard = setup_logging(cli.verbose)?;

    let mut config = config::Config::resolve(cli.config.as_deref())?;
    if let Some(theme) = cli.theme {
        config.display.theme = theme;
    }
    if let Some(interval_ms) = cli.interval_ms {
        config.refresh.interval_ms = interval_ms;
    }

    let mut app = App::new(&config).await?;
    app.run().await?;

    Ok(())
}
