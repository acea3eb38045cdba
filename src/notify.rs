//! Non-fatal user notifications
//!
//! The exchange layer records notices instead of printing; the presentation
//! layer drains and renders them after each interaction. Nothing here is
//! fatal, every notice accompanies an already-degraded-but-usable state.

use std::fmt;

/// Why a locally-synthesized fallback reply was used
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackKind {
    /// The endpoint answered with a non-success status or unreadable body
    EndpointUnavailable,
    /// The request never completed (connection refused, timeout, DNS)
    ConnectionError,
}

/// A notice surfaced to the user alongside normal output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// A canned reply stood in for the remote assistant
    FallbackUsed(FallbackKind),

    /// A reply arrived after the user had switched sessions; it was saved
    /// to the session that asked for it
    StaleReply { session_id: String },
}

impl Notice {
    /// Short toast-style title
    pub fn title(&self) -> &'static str {
        match self {
            Self::FallbackUsed(FallbackKind::EndpointUnavailable) => "Using Mock Response",
            Self::FallbackUsed(FallbackKind::ConnectionError) => "Connection Error",
            Self::StaleReply { .. } => "Reply Saved",
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FallbackUsed(FallbackKind::EndpointUnavailable) => {
                write!(f, "API endpoint not available, using mock response instead.")
            }
            Self::FallbackUsed(FallbackKind::ConnectionError) => {
                write!(f, "Using mock response. Check your network connection.")
            }
            Self::StaleReply { session_id } => {
                write!(
                    f,
                    "A reply for session {} arrived after you switched away; it was saved there.",
                    session_id
                )
            }
        }
    }
}
