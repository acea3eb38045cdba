//! Chat message types and structured assistant actions
//!
//! Messages are immutable once created and identified by a ULID. Assistant
//! messages may carry structured actions; the only tag interpreted by this
//! client is a token-swap quote, all other tags are preserved untouched.

use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Action tag for a token-swap quote payload
pub const SWAP_ACTION: &str = "swap";

/// Role of a message sender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Authored by the person chatting
    User,
    /// Authored by the remote assistant (or local fallback)
    Assistant,
}

/// A single message in a chat session
///
/// Identity is `id`; two messages with equal ids are the same message.
///
/// # Examples
///
/// ```
/// use deepsense::session::{Message, Role};
///
/// let msg = Message::user("Hello!", 1_700_000_000_000);
/// assert_eq!(msg.role, Role::User);
/// assert!(msg.actions.is_none());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Unique message identifier (ULID)
    pub id: String,

    /// Message body; assistant content may contain markdown
    pub content: String,

    /// Sender role
    pub role: Role,

    /// Creation time in epoch milliseconds
    pub timestamp: i64,

    /// Structured follow-up actions attached by the assistant
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actions: Option<Vec<UserAction>>,
}

impl Message {
    /// Creates a new user message with a fresh id
    pub fn user(content: impl Into<String>, timestamp: i64) -> Self {
        Self {
            id: Ulid::new().to_string(),
            content: content.into(),
            role: Role::User,
            timestamp,
            actions: None,
        }
    }

    /// Creates a new assistant message with a fresh id
    pub fn assistant(content: impl Into<String>, timestamp: i64) -> Self {
        Self {
            id: Ulid::new().to_string(),
            content: content.into(),
            role: Role::Assistant,
            timestamp,
            actions: None,
        }
    }

    /// Creates a new assistant message carrying structured actions
    ///
    /// An empty action list is normalized to `None` so stored JSON stays
    /// identical to a plain assistant message.
    pub fn assistant_with_actions(
        content: impl Into<String>,
        actions: Vec<UserAction>,
        timestamp: i64,
    ) -> Self {
        Self {
            id: Ulid::new().to_string(),
            content: content.into(),
            role: Role::Assistant,
            timestamp,
            actions: if actions.is_empty() {
                None
            } else {
                Some(actions)
            },
        }
    }
}

/// A structured, tagged payload attached to an assistant message
///
/// Unrecognized tags round-trip through storage without interpretation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAction {
    /// Action tag, e.g. `"swap"`
    pub action: String,

    /// Tag-specific payload
    pub json_data: serde_json::Value,
}

impl UserAction {
    /// Parse this action as a swap quote
    ///
    /// Returns `None` when the tag is not [`SWAP_ACTION`] or the payload
    /// does not deserialize as a quote.
    pub fn swap_quote(&self) -> Option<SwapQuote> {
        if self.action != SWAP_ACTION {
            return None;
        }
        serde_json::from_value(self.json_data.clone()).ok()
    }
}

/// Token-swap quote carried by a `"swap"` action
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapQuote {
    /// Input token mint address
    pub input_mint: String,

    /// Output token mint address
    pub output_mint: String,

    /// Raw input amount, if quoted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_amount: Option<String>,

    /// Raw output amount, if quoted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub out_amount: Option<String>,

    /// Slippage tolerance in basis points
    #[serde(default = "default_slippage_bps")]
    pub slippage_bps: u32,

    /// Display metadata for the input token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_token_info: Option<TokenInfo>,

    /// Display metadata for the output token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_token_info: Option<TokenInfo>,
}

fn default_slippage_bps() -> u32 {
    50
}

/// Display metadata for a token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenInfo {
    /// Mint address
    pub id: String,
    /// Full token name
    pub name: String,
    /// Ticker symbol
    pub symbol: String,
    /// Icon URL
    pub icon: String,
    /// Decimal precision
    pub decimals: u8,
}
