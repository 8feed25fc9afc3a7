//! Ragent CLI entry point.

use anyhow::Result;
use clap::Parser;
use ragent::cli::{commands, Cli, Commands};
use ragent::config::Settings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("ragent={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // Load configuration
    let settings = Settings::load_from(cli.config.as_ref())?;

    // Ensure the data directory exists
    std::fs::create_dir_all(settings.data_dir())?;

    match &cli.command {
        Commands::Ingest { paths, concurrency } => {
            commands::run_ingest(paths, *concurrency, settings).await?;
        }

        Commands::IngestUrl { url } => {
            commands::run_ingest_url(url, settings).await?;
        }

        Commands::Delete { document_id } => {
            commands::run_delete(document_id, settings).await?;
        }

        Commands::Search { query, limit } => {
            commands::run_search(query, *limit, settings).await?;
        }

        Commands::Ask {
            message,
            provider,
            model,
            system,
        } => {
            commands::run_ask(message, provider.clone(), model.clone(), system.clone(), settings)
                .await?;
        }

        Commands::List => {
            commands::run_list(settings).await?;
        }

        Commands::Config { action } => {
            commands::run_config(action, cli.config.as_ref(), settings)?;
        }
    }

    Ok(())
}
