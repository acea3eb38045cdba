//! Canned assistant replies for when the query endpoint is unreachable
//!
//! The chat stays usable offline: a failed query gets a locally-synthesized
//! markdown reply, and when the user's text looks like a swap request a
//! canned SOL to USDC quote rides along so the swap surface can still be
//! exercised. Selection is injectable so tests pin the choice.

use crate::session::message::{UserAction, SWAP_ACTION};
use rand::Rng;
use serde_json::json;

/// Number of canned reply templates
pub const CANNED_COUNT: usize = 3;

/// Substrings of a user message that suggest a swap intent
const SWAP_KEYWORDS: [&str; 3] = ["swap", "exchange", "trade"];

/// Render canned reply `index` (modulo [`CANNED_COUNT`]) around the user's
/// text
pub fn render_canned(index: usize, user_message: &str) -> String {
    match index % CANNED_COUNT {
        0 => format!(
            "# Thank you for your message!\n\n\
             I understand you said: \"{user_message}\"\n\n\
             Here's a **markdown response** to demonstrate the formatting:\n\n\
             ## Key Points:\n\
             - This is a *mock response*\n\
             - It supports **bold text**\n\
             - And even `code snippets`\n\n\
             > This is a blockquote to show different formatting options.\n\n\
             Would you like to continue our conversation?"
        ),
        1 => format!(
            "## Great question!\n\n\
             Your message \"{user_message}\" is interesting. Let me provide a detailed response:\n\n\
             ### Analysis:\n\
             1. **First point**: This demonstrates numbered lists\n\
             2. **Second point**: With proper formatting\n\
             3. **Third point**: And clear structure\n\n\
             ```python\n\
             def mock_response(user_input):\n    \
                 return f\"Processing: {{user_input}}\"\n\
             ```\n\n\
             What would you like to explore next?"
        ),
        _ => format!(
            "# Hello there!\n\n\
             Thanks for your message: *\"{user_message}\"*\n\n\
             ## Here's what I can help with:\n\n\
             - Markdown formatting\n\
             - Persistent conversations\n\
             - Token swap quotes\n\n\
             > **Note:** This is a mock response shown while the assistant service is unreachable.\n\n\
             How can I assist you further?"
        ),
    }
}

/// Whether the user's text mentions a swap-like intent
pub fn wants_swap(text: &str) -> bool {
    let lowered = text.to_lowercase();
    SWAP_KEYWORDS.iter().any(|kw| lowered.contains(kw))
}

/// Canned SOL to USDC swap suggestion
pub fn canned_swap_action() -> UserAction {
    UserAction {
        action: SWAP_ACTION.to_string(),
        json_data: json!({
            "inputMint": "So11111111111111111111111111111111111111112",
            "outputMint": "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v",
            "inAmount": "1000000000",
            "slippageBps": 50,
            "inputTokenInfo": {
                "id": "So11111111111111111111111111111111111111112",
                "name": "Solana",
                "symbol": "SOL",
                "icon": "https://raw.githubusercontent.com/solana-labs/token-list/main/assets/mainnet/So11111111111111111111111111111111111111112/logo.png",
                "decimals": 9
            },
            "outputTokenInfo": {
                "id": "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v",
                "name": "USD Coin",
                "symbol": "USDC",
                "icon": "https://raw.githubusercontent.com/solana-labs/token-list/main/assets/mainnet/EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v/logo.png",
                "decimals": 6
            }
        }),
    }
}

/// Synthesizes fallback replies with an injectable selector
///
/// The selector maps the template count to a chosen index; the default picks
/// uniformly at random. Tests install a fixed selector for deterministic
/// output.
pub struct FallbackResponder {
    selector: Box<dyn Fn(usize) -> usize + Send>,
}

impl Default for FallbackResponder {
    fn default() -> Self {
        Self {
            selector: Box::new(|count| rand::rng().random_range(0..count)),
        }
    }
}

impl FallbackResponder {
    /// Create a responder with a fixed selection function
    ///
    /// # Examples
    ///
    /// ```
    /// use deepsense::query::FallbackResponder;
    ///
    /// let responder = FallbackResponder::with_selector(|_| 0);
    /// let (content, actions) = responder.respond("tell me more");
    /// assert!(content.contains("tell me more"));
    /// assert!(actions.is_none());
    /// ```
    pub fn with_selector(selector: impl Fn(usize) -> usize + Send + 'static) -> Self {
        Self {
            selector: Box::new(selector),
        }
    }

    /// Produce a canned reply for the user's text
    ///
    /// Returns the reply content and, when the text suggests a swap intent,
    /// a canned swap-quote action.
    pub fn respond(&self, user_text: &str) -> (String, Option<Vec<UserAction>>) {
        let index = (self.selector)(CANNED_COUNT);
        let content = render_canned(index, user_text);
        let actions = if wants_swap(user_text) {
            Some(vec![canned_swap_action()])
        } else {
            None
        };
        (content, actions)
    }
}
