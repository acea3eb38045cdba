//! DeepSense - terminal chat client library
//!
//! This library provides the core functionality for the DeepSense chat
//! client: session lifecycle management, durable conversation history, and
//! message exchange with the remote assistant service.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `session`: session store, lifecycle controller, and message types
//! - `query`: HTTP client for the assistant endpoint and offline fallbacks
//! - `wallet`: read-only view of an external wallet connection
//! - `swap`: swap-widget capability and quote-derived configuration
//! - `config`: configuration management and validation
//! - `error`: error types and result aliases
//! - `cli`: command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use deepsense::config::{LimitsConfig, QueryConfig};
//! use deepsense::query::QueryClient;
//! use deepsense::session::{ChatController, SessionStore};
//! use deepsense::wallet::NullWallet;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let store = SessionStore::in_memory();
//!     let query = QueryClient::new(&QueryConfig::default())?;
//!     let mut chat = ChatController::new(
//!         store,
//!         query,
//!         Box::new(NullWallet),
//!         LimitsConfig::default(),
//!     )?;
//!
//!     chat.send_message("hello!").await?;
//!     assert_eq!(chat.messages().len(), 2);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod notify;
pub mod query;
pub mod render;
pub mod session;
pub mod swap;
pub mod wallet;

// Re-export commonly used types
pub use config::Config;
pub use error::{DeepsenseError, Result};
pub use notify::{FallbackKind, Notice};
pub use query::{QueryClient, QueryResponse};
pub use session::{ChatController, Message, Role, SessionStore, SessionSummary, UserAction};
