use anyhow::{Context, Result};
use ats_checker::cli::{handle_command, Cli};
use ats_checker::core::ConfigManager;
use clap::Parser;
use std::fs::OpenOptions;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("ats_checker=info,rocket=warn"))
}

fn init_logging() -> Result<()> {
    let registry = tracing_subscriber::registry().with(env_filter());

    match ConfigManager::log_file() {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true) // Clear file on startup
                .open(&path)
                .with_context(|| format!("Failed to open log file: {}", path.display()))?;

            registry
                .with(
                    fmt::layer()
                        .json()
                        .with_writer(file)
                        .with_current_span(false)
                        .with_span_list(false),
                )
                .init();
        }
        None => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init(),
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging()?;

    let cli = Cli::parse();
    let config = ConfigManager::load()?;

    handle_command(cli, config).await
}
