//! Session and message management
//!
//! This module holds the core of the client: the durable session store,
//! the message/summary data model, and the lifecycle controller that
//! drives session transitions and the message exchange.

pub mod controller;
pub mod message;
pub mod store;
pub mod summary;

pub use controller::ChatController;
pub use message::{Message, Role, SwapQuote, TokenInfo, UserAction, SWAP_ACTION};
pub use store::{KvBackend, MemoryBackend, SessionStore, SledBackend};
pub use summary::{derive_title, SessionSummary, DEFAULT_TITLE};
