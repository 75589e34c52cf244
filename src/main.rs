// camunda-cli - Camunda platform credentials and cluster browser

mod api;
mod cli;
mod config;
mod error;
mod models;
mod ui;

use clap::Parser;
use error::Result;
use std::fs::OpenOptions;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first to get verbose flag
    let args = cli::Cli::parse();

    let log_level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    // Check if running in TUI mode (no subcommand)
    let is_tui_mode = args.command.is_none();

    if is_tui_mode {
        // For TUI mode, write logs to a file to avoid breaking the UI
        let log_dir = dirs::cache_dir()
            .unwrap_or_else(|| std::path::PathBuf::from("/tmp"))
            .join("camunda-cli");
        let _ = std::fs::create_dir_all(&log_dir);

        let writer = match OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_dir.join("camunda-cli.log"))
        {
            Ok(file) => BoxMakeWriter::new(file.with_max_level(tracing::Level::TRACE)),
            // Nowhere to log without corrupting the screen
            Err(_) => BoxMakeWriter::new(std::io::sink),
        };

        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::from_default_env().add_directive(log_level.into()),
            )
            .with_writer(writer)
            .with_ansi(false)
            .init();
    } else {
        // For CLI commands, write logs to stderr
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::from_default_env().add_directive(log_level.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }

    cli::execute(args).await
}
