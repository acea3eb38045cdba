//! Archived session summaries and title derivation
//!
//! A summary is the lightweight record kept for a session in the sidebar
//! list; the message bodies live separately, keyed by session id.

use serde::{Deserialize, Serialize};

/// Title used when a session's first message has no content
pub const DEFAULT_TITLE: &str = "New Chat";

/// Number of characters of the first message kept in the derived title
const TITLE_PREFIX_LEN: usize = 50;

/// Summary of an archived chat session
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    /// Session identifier (UUID)
    pub id: String,

    /// Title derived from the session's first message
    pub title: String,

    /// Last-touched time in epoch milliseconds
    pub timestamp: i64,

    /// Number of messages in the session at archive time
    pub message_count: usize,
}

/// Derive a session title from its first message content
///
/// The first 50 characters with a trailing `"..."`, or [`DEFAULT_TITLE`]
/// when the content is empty. The suffix is always appended, matching the
/// stored titles existing deployments already carry.
///
/// # Examples
///
/// ```
/// use deepsense::session::derive_title;
///
/// assert_eq!(derive_title("hello"), "hello...");
/// assert_eq!(derive_title(""), "New Chat");
/// ```
pub fn derive_title(content: &str) -> String {
    if content.is_empty() {
        return DEFAULT_TITLE.to_string();
    }
    let mut title: String = content.chars().take(TITLE_PREFIX_LEN).collect();
    title.push_str("...");
    title
}
