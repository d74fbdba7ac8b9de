//! Uptime Pinger Binary

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uptime_pinger::{Config, Result, UptimeRunner};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormat {
    Json,
    Text,
}

/// Check every configured service once and rewrite the status document
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// JSON list of services to check
    #[arg(long, env = "SERVICES_FILE")]
    services: Option<PathBuf>,

    /// Status document to read and rewrite
    #[arg(long, env = "STATUS_FILE")]
    status: Option<PathBuf>,

    /// Maximum number of probes in flight
    #[arg(long, env = "MAX_CONCURRENCY")]
    concurrency: Option<usize>,

    #[arg(long, value_enum, default_value = "json", env = "LOG_FORMAT")]
    log_format: LogFormat,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    initialize_tracing(cli.log_format);

    info!("Starting uptime pinger v{}", env!("CARGO_PKG_VERSION"));

    let mut config = Config::from_env();
    if let Some(services) = cli.services {
        config.services_file = services;
    }
    if let Some(status) = cli.status {
        config.status_file = status;
    }
    if let Some(concurrency) = cli.concurrency {
        config.max_concurrency = concurrency;
    }

    if let Err(e) = config.validate() {
        error!("Configuration validation failed: {}", e);
        std::process::exit(1);
    }

    let runner = match UptimeRunner::new(config) {
        Ok(runner) => runner,
        Err(e) => {
            error!("Failed to start: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = runner.run_once().await {
        error!("Run failed: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Initialize structured logging
fn initialize_tracing(format: LogFormat) {
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

    let filter_layer = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(&log_level))
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(filter_layer);

    match format {
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_thread_names(false)
                    .with_file(false)
                    .with_line_number(false)
                    .json(),
            )
            .init(),
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer().with_target(false))
            .init(),
    }
}
