use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bookr::cli::{run_command, Cli};
use bookr::config::Config;
use bookr::notify::ConsoleNotifier;
use bookr::storage::FileStorage;
use bookr::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(&cli.config)?;

    // Initialize logging
    let log_level = cli
        .log_level
        .as_ref()
        .unwrap_or(&config.logging.level)
        .clone();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::debug!("Starting bookr v{}", env!("CARGO_PKG_VERSION"));

    // Ensure the data directory exists before the stores restore from it
    bookr::utils::ensure_dir(&config.storage.data_dir)?;
    let storage = Arc::new(FileStorage::new(config.storage.data_dir.clone()));

    let state = AppState::new(config, storage, Arc::new(ConsoleNotifier));

    run_command(&cli, &state).await
}
