mod api;
mod cli;
mod config;
mod models;
mod services;
mod utils;

use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::services::{Analyzer, ApiFootball, ScanSettings, TelegramNotifier};

#[derive(Parser)]
#[command(name = "scoreless-scout")]
#[command(about = "Daily scan for football teams coming off a 0-0")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server and the background scheduler
    Serve {
        /// Overrides PORT
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Run the daily scan once and print a summary
    Run,
    /// Show a team's last finished match
    Team {
        #[arg(short, long)]
        id: u32,
    },
}

fn build_analyzer(config: &Config) -> Result<Analyzer> {
    let source = ApiFootball::new(&config.api_url, config.require_api_key()?)?;
    let notifier = TelegramNotifier::new(
        &config.telegram_url,
        config.telegram_token.clone(),
        config.telegram_chat_id.clone(),
    );
    if !notifier.is_configured() {
        tracing::warn!("TELEGRAM_BOT_TOKEN / TELEGRAM_CHAT_ID not set, alerts will only be logged");
    }
    Ok(Analyzer::new(Arc::new(source), Arc::new(notifier), ScanSettings::from(config)))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;
    tracing::info!(
        "Priority leagues: {:?}, scan: {:?}, schedule: {:?}",
        config.priority_leagues,
        config.scan_policy,
        config.schedule
    );

    let analyzer = build_analyzer(&config)?;

    match cli.command {
        Some(Commands::Serve { port }) => {
            let port = port.unwrap_or(config.port);
            tracing::info!("Starting Scoreless Scout on port {}", port);
            api::serve(&config, Arc::new(analyzer), port).await?;
        }
        Some(Commands::Run) => {
            cli::run_once(&analyzer).await?;
        }
        Some(Commands::Team { id }) => {
            cli::query_team(&analyzer, id).await?;
        }
        None => {
            // Default to serving
            tracing::info!("Starting Scoreless Scout on port {}", config.port);
            api::serve(&config, Arc::new(analyzer), config.port).await?;
        }
    }

    Ok(())
}
