//! DeepSense - terminal chat client
//!
#![doc = "DeepSense - terminal chat client"]
#![doc = "Main entry point for the DeepSense application."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use deepsense::cli::{Cli, Commands};
use deepsense::commands;
use deepsense::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    init_tracing();

    // Parse command line arguments
    let cli = Cli::parse_args();

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    // Validate configuration
    config.validate()?;

    // Execute command
    match cli.command {
        Commands::Chat { .. } => {
            tracing::info!("Starting chat session");
            commands::chat::run_chat(config).await?;
            Ok(())
        }
        Commands::Sessions => {
            tracing::info!("Listing archived sessions");
            commands::sessions::run_sessions(config)?;
            Ok(())
        }
    }
}

fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("deepsense=info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
