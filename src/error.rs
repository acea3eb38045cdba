//! Error types for DeepSense
//!
//! This module defines all error types used throughout the application,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for DeepSense operations
///
/// This enum encompasses all possible errors that can occur during
/// configuration loading, session persistence, query exchange, and
/// swap-widget initialization.
#[derive(Error, Debug)]
pub enum DeepsenseError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Query endpoint errors (request construction, unexpected payloads)
    #[error("Query error: {0}")]
    Query(String),

    /// Session storage errors (backing store operations)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Swap widget initialization errors
    #[error("Swap widget error: {0}")]
    SwapWidget(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for DeepSense operations
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation.
pub type Result<T> = anyhow::Result<T>;
