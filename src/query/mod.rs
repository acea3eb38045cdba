//! Remote assistant query client
//!
//! This module implements the single outbound interface of the chat client:
//! `POST {base_url}/query` with the user's text, the session id, and optional
//! contextual remarks. Failures are classified so the caller can tell an
//! unreachable network apart from an unhappy endpoint.

pub mod fallback;

pub use fallback::FallbackResponder;

use crate::config::QueryConfig;
use crate::error::Result;
use crate::session::message::UserAction;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Assistant content used when the endpoint answers without any text
pub const EMPTY_RESPONSE_PLACEHOLDER: &str = "Sorry, I received an empty response.";

/// Request body for the query endpoint
#[derive(Debug, Clone, Serialize)]
pub struct QueryRequest {
    /// The user's utterance
    pub query: String,
    /// Session the query belongs to
    pub session_id: String,
    /// Contextual remarks (currently zero or one wallet-address entry)
    pub remarks: Vec<String>,
}

/// Response body from the query endpoint
///
/// Either `response` or `message` carries the assistant text; both may be
/// absent, in which case the caller falls back to a placeholder.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub response: Option<String>,

    #[serde(default)]
    pub message: Option<String>,

    #[serde(default)]
    pub user_actions: Option<Vec<UserAction>>,
}

impl QueryResponse {
    /// Assistant text with the documented fallback chain:
    /// `response`, then `message`, then the fixed placeholder.
    pub fn content(&self) -> String {
        self.response
            .clone()
            .or_else(|| self.message.clone())
            .unwrap_or_else(|| EMPTY_RESPONSE_PLACEHOLDER.to_string())
    }
}

/// Why a query did not produce a usable response
#[derive(Error, Debug)]
pub enum QueryFailure {
    /// The endpoint was reached but answered badly (non-2xx or unreadable
    /// body)
    #[error("query endpoint unavailable (status {status})")]
    Endpoint { status: u16 },

    /// The request never completed
    #[error("query transport failure: {0}")]
    Transport(#[from] reqwest::Error),
}

/// HTTP client for the assistant query service
pub struct QueryClient {
    client: Client,
    base_url: String,
}

impl QueryClient {
    /// Build a client from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed
    pub fn new(config: &QueryConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Send one query and parse the response
    ///
    /// # Arguments
    ///
    /// * `query` - The user's text
    /// * `session_id` - The originating session id
    /// * `remarks` - Contextual remarks to forward
    pub async fn send(
        &self,
        query: &str,
        session_id: &str,
        remarks: Vec<String>,
    ) -> std::result::Result<QueryResponse, QueryFailure> {
        let request = QueryRequest {
            query: query.to_string(),
            session_id: session_id.to_string(),
            remarks,
        };

        let url = format!("{}/query", self.base_url);
        tracing::debug!("Sending query to {} for session {}", url, session_id);

        let response = self.client.post(&url).json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("Query endpoint returned status {}", status);
            return Err(QueryFailure::Endpoint {
                status: status.as_u16(),
            });
        }

        // A 2xx with an unparseable body counts as an endpoint failure,
        // not a transport one.
        match response.json::<QueryResponse>().await {
            Ok(parsed) => Ok(parsed),
            Err(e) => {
                tracing::warn!("Query endpoint returned malformed JSON: {}", e);
                Err(QueryFailure::Endpoint {
                    status: status.as_u16(),
                })
            }
        }
    }
}
