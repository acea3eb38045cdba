//! Command-line interface definition for DeepSense
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for the interactive chat session and for
//! inspecting archived session history.

use clap::{Parser, Subcommand};

/// DeepSense - terminal chat client
///
/// Talk to the DeepSense assistant, keep persistent conversation
/// history, and surface token-swap quotes the assistant suggests.
#[derive(Parser, Debug, Clone)]
#[command(name = "deepsense")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Override the session store directory
    #[arg(long, env = "DEEPSENSE_STORE_DIR")]
    pub store_dir: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for DeepSense
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start an interactive chat session
    Chat {
        /// Override the query endpoint base URL from config
        #[arg(short, long)]
        endpoint: Option<String>,

        /// Connect a wallet by public address for this session
        #[arg(short, long)]
        wallet: Option<String>,
    },

    /// List archived chat sessions
    Sessions,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_chat_command() {
        let cli = Cli::try_parse_from(["deepsense", "chat"]).expect("parse failed");
        assert!(matches!(cli.command, Commands::Chat { .. }));
    }

    #[test]
    fn test_cli_parses_chat_overrides() {
        let cli = Cli::try_parse_from([
            "deepsense",
            "chat",
            "--endpoint",
            "http://127.0.0.1:9001",
            "--wallet",
            "9xQeWvG816bUx9EPjHmaT23yvVM2ZWbrrpZb9PusVFin",
        ])
        .expect("parse failed");

        match cli.command {
            Commands::Chat { endpoint, wallet } => {
                assert_eq!(endpoint.as_deref(), Some("http://127.0.0.1:9001"));
                assert!(wallet.is_some());
            }
            _ => panic!("expected chat command"),
        }
    }

    #[test]
    fn test_cli_parses_sessions_command() {
        let cli = Cli::try_parse_from(["deepsense", "sessions"]).expect("parse failed");
        assert!(matches!(cli.command, Commands::Sessions));
    }

    #[test]
    fn test_cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["deepsense"]).is_err());
    }
}
