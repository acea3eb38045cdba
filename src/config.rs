//! Configuration management for DeepSense
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::error::{DeepsenseError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure for DeepSense
///
/// This structure holds all configuration needed for the chat client,
/// including the query endpoint, session storage, wallet, swap widget,
/// and history limits.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Query endpoint configuration
    #[serde(default)]
    pub query: QueryConfig,

    /// Session storage configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// Wallet collaborator configuration
    #[serde(default)]
    pub wallet: WalletConfig,

    /// Swap widget configuration
    #[serde(default)]
    pub swap: SwapConfig,

    /// History growth limits
    #[serde(default)]
    pub limits: LimitsConfig,
}

/// Query endpoint configuration
///
/// Specifies where the remote assistant service lives and how long to
/// wait for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Base URL of the assistant query service
    #[serde(default = "default_query_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_query_timeout")]
    pub timeout_seconds: u64,
}

fn default_query_base_url() -> String {
    "http://localhost:8001".to_string()
}

fn default_query_timeout() -> u64 {
    30
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            base_url: default_query_base_url(),
            timeout_seconds: default_query_timeout(),
        }
    }
}

/// Session storage configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StorageConfig {
    /// Optional path to the session database directory
    ///
    /// When unset, the platform data directory is used. Tests point this
    /// at a temporary directory instead.
    #[serde(default)]
    pub path: Option<String>,
}

impl StorageConfig {
    /// Resolve the directory the session database lives in
    ///
    /// Resolution order: `DEEPSENSE_STORE_DIR` environment variable, the
    /// configured `path`, then the platform data directory.
    pub fn resolve_path(&self) -> Result<PathBuf> {
        if let Ok(dir) = std::env::var("DEEPSENSE_STORE_DIR") {
            return Ok(PathBuf::from(dir));
        }

        if let Some(path) = &self.path {
            return Ok(PathBuf::from(path));
        }

        let proj_dirs = directories::ProjectDirs::from("io", "dpsn", "deepsense").ok_or_else(
            || DeepsenseError::Storage("Could not determine data directory".into()),
        )?;
        Ok(proj_dirs.data_dir().join("sessions.db"))
    }
}

/// Wallet collaborator configuration
///
/// The client never holds keys; it only knows the public address of a
/// connected wallet, used to enrich outgoing queries and to target the
/// swap widget.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WalletConfig {
    /// Public address of the connected wallet, if any
    #[serde(default)]
    pub address: Option<String>,
}

/// Swap widget configuration
///
/// Defaults mirror the hosted widget's integrated setup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwapConfig {
    /// Solana RPC endpoint handed to the widget
    #[serde(default = "default_swap_rpc_endpoint")]
    pub rpc_endpoint: String,

    /// Widget display mode: "modal", "integrated", or "widget"
    #[serde(default = "default_swap_display_mode")]
    pub display_mode: String,

    /// DOM container id the integrated widget mounts into
    #[serde(default = "default_swap_target_id")]
    pub integrated_target_id: String,

    /// Default slippage in basis points when a quote does not carry one
    #[serde(default = "default_swap_slippage_bps")]
    pub default_slippage_bps: u32,
}

fn default_swap_rpc_endpoint() -> String {
    "https://api.mainnet-beta.solana.com".to_string()
}

fn default_swap_display_mode() -> String {
    "integrated".to_string()
}

fn default_swap_target_id() -> String {
    "jupiter-swap-widget".to_string()
}

fn default_swap_slippage_bps() -> u32 {
    50
}

impl Default for SwapConfig {
    fn default() -> Self {
        Self {
            rpc_endpoint: default_swap_rpc_endpoint(),
            display_mode: default_swap_display_mode(),
            integrated_target_id: default_swap_target_id(),
            default_slippage_bps: default_swap_slippage_bps(),
        }
    }
}

/// History growth limits
///
/// Stored history has no natural eviction point, so both the archived
/// session list and each session's message list are capped.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LimitsConfig {
    /// Maximum number of archived session summaries kept
    #[serde(default = "default_max_archived_sessions")]
    pub max_archived_sessions: usize,

    /// Maximum number of messages kept per session
    #[serde(default = "default_max_messages_per_session")]
    pub max_messages_per_session: usize,
}

fn default_max_archived_sessions() -> usize {
    50
}

fn default_max_messages_per_session() -> usize {
    500
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_archived_sessions: default_max_archived_sessions(),
            max_messages_per_session: default_max_messages_per_session(),
        }
    }
}

impl Config {
    /// Load configuration from a file with environment and CLI overrides
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the YAML configuration file
    /// * `cli` - CLI arguments for overrides
    ///
    /// # Returns
    ///
    /// Returns the loaded and merged configuration
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| DeepsenseError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| DeepsenseError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(base_url) = std::env::var("DEEPSENSE_QUERY_URL") {
            self.query.base_url = base_url;
        }

        if let Ok(timeout) = std::env::var("DEEPSENSE_QUERY_TIMEOUT_SECONDS") {
            if let Ok(value) = timeout.parse() {
                self.query.timeout_seconds = value;
            } else {
                tracing::warn!("Invalid DEEPSENSE_QUERY_TIMEOUT_SECONDS: {}", timeout);
            }
        }

        if let Ok(address) = std::env::var("DEEPSENSE_WALLET_ADDRESS") {
            self.wallet.address = Some(address);
        }

        if let Ok(dir) = std::env::var("DEEPSENSE_STORE_DIR") {
            self.storage.path = Some(dir);
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if let Some(dir) = &cli.store_dir {
            self.storage.path = Some(dir.clone());
        }

        if let crate::cli::Commands::Chat {
            endpoint, wallet, ..
        } = &cli.command
        {
            if let Some(endpoint) = endpoint {
                self.query.base_url = endpoint.clone();
            }
            if let Some(wallet) = wallet {
                self.wallet.address = Some(wallet.clone());
            }
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns a `DeepsenseError::Config` describing the first invalid field
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.query.base_url).map_err(|e| {
            DeepsenseError::Config(format!(
                "Invalid query base URL '{}': {}",
                self.query.base_url, e
            ))
        })?;

        if self.query.timeout_seconds == 0 {
            return Err(DeepsenseError::Config(
                "query.timeout_seconds must be greater than zero".into(),
            )
            .into());
        }

        url::Url::parse(&self.swap.rpc_endpoint).map_err(|e| {
            DeepsenseError::Config(format!(
                "Invalid swap RPC endpoint '{}': {}",
                self.swap.rpc_endpoint, e
            ))
        })?;

        let valid_modes = ["modal", "integrated", "widget"];
        if !valid_modes.contains(&self.swap.display_mode.as_str()) {
            return Err(DeepsenseError::Config(format!(
                "Invalid swap display mode '{}', expected one of: {}",
                self.swap.display_mode,
                valid_modes.join(", ")
            ))
            .into());
        }

        if self.swap.default_slippage_bps > 10_000 {
            return Err(DeepsenseError::Config(
                "swap.default_slippage_bps cannot exceed 10000 (100%)".into(),
            )
            .into());
        }

        if self.limits.max_archived_sessions == 0 {
            return Err(DeepsenseError::Config(
                "limits.max_archived_sessions must be greater than zero".into(),
            )
            .into());
        }

        if self.limits.max_messages_per_session < 2 {
            return Err(DeepsenseError::Config(
                "limits.max_messages_per_session must allow at least one exchange".into(),
            )
            .into());
        }

        Ok(())
    }
}
