//! Durable session persistence
//!
//! The store keeps three logical kinds of entries in a key-value backing
//! store: the active session id, the archived-session summary list, and one
//! message list per session id. The backing store is injectable so tests run
//! against an in-memory map while production uses an embedded `sled`
//! database.
//!
//! Every write is a synchronous full overwrite of its key, so replaying a
//! write is harmless and a skipped write never corrupts what is already
//! stored.

use crate::error::{DeepsenseError, Result};
use crate::session::message::Message;
use crate::session::summary::SessionSummary;
use sled::Db;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

const KEY_SESSION_ID: &str = "sessionId";
const KEY_PREVIOUS_SESSIONS: &str = "previousSessions";
const KEY_MESSAGES_PREFIX: &str = "sessionMessages_";

/// Key-value backing store abstraction
///
/// Implementations must make `set` idempotent: writing the same value twice
/// yields the same stored state.
pub trait KvBackend: Send {
    /// Read the value stored under `key`, if any
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write `value` under `key`, replacing any prior value
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove the entry under `key`; missing keys are not an error
    fn remove(&self, key: &str) -> Result<()>;
}

/// In-memory backing store for tests
#[derive(Default)]
pub struct MemoryBackend {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryBackend {
    /// Create an empty in-memory backend
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvBackend for MemoryBackend {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| DeepsenseError::Storage("memory store poisoned".into()))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| DeepsenseError::Storage("memory store poisoned".into()))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| DeepsenseError::Storage("memory store poisoned".into()))?;
        entries.remove(key);
        Ok(())
    }
}

/// Sled-backed persistent store
///
/// Flushes after every mutation so a write that returned has reached disk.
pub struct SledBackend {
    db: Db,
}

impl SledBackend {
    /// Open or create the database at `path`
    ///
    /// # Errors
    ///
    /// Returns `DeepsenseError::Storage` if the database cannot be opened
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| DeepsenseError::Storage(format!("Failed to create data dir: {}", e)))?;
        }
        let db = sled::open(path)
            .map_err(|e| DeepsenseError::Storage(format!("Failed to open database: {}", e)))?;
        Ok(Self { db })
    }
}

impl KvBackend for SledBackend {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .db
            .get(key)
            .map_err(|e| DeepsenseError::Storage(format!("Get failed: {}", e)))?;
        match value {
            Some(bytes) => {
                let text = String::from_utf8(bytes.to_vec())
                    .map_err(|e| DeepsenseError::Storage(format!("Invalid UTF-8: {}", e)))?;
                Ok(Some(text))
            }
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.db
            .insert(key, value.as_bytes())
            .map_err(|e| DeepsenseError::Storage(format!("Insert failed: {}", e)))?;
        self.db
            .flush()
            .map_err(|e| DeepsenseError::Storage(format!("Flush failed: {}", e)))?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.db
            .remove(key)
            .map_err(|e| DeepsenseError::Storage(format!("Remove failed: {}", e)))?;
        self.db
            .flush()
            .map_err(|e| DeepsenseError::Storage(format!("Flush failed: {}", e)))?;
        Ok(())
    }
}

/// Durable store for session state
///
/// Owns persistence of the active session id, per-session message lists,
/// and the archived-session summary list.
pub struct SessionStore {
    backend: Box<dyn KvBackend>,
}

impl SessionStore {
    /// Create a store over an arbitrary backend
    pub fn new(backend: Box<dyn KvBackend>) -> Self {
        Self { backend }
    }

    /// Create a store over a fresh in-memory backend
    ///
    /// # Examples
    ///
    /// ```
    /// use deepsense::session::SessionStore;
    ///
    /// let store = SessionStore::in_memory();
    /// assert!(store.get_active_session_id().is_none());
    /// ```
    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryBackend::new()))
    }

    /// Create a store over a sled database at `path`
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(Box::new(SledBackend::open(path)?)))
    }

    fn messages_key(session_id: &str) -> String {
        format!("{}{}", KEY_MESSAGES_PREFIX, session_id)
    }

    /// Load the message list stored for `session_id`
    ///
    /// Returns an empty list when the entry is absent or does not parse;
    /// parse failures are logged, never raised.
    pub fn load_messages(&self, session_id: &str) -> Vec<Message> {
        let key = Self::messages_key(session_id);
        match self.backend.get(&key) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                tracing::warn!("Discarding unreadable message list for {}: {}", session_id, e);
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!("Failed to read messages for {}: {}", session_id, e);
                Vec::new()
            }
        }
    }

    /// Persist the full message list for `session_id`, replacing any prior
    /// value
    pub fn save_messages(&self, session_id: &str, messages: &[Message]) -> Result<()> {
        let raw = serde_json::to_string(messages)?;
        self.backend.set(&Self::messages_key(session_id), &raw)
    }

    /// Load the archived-session summary list
    ///
    /// Returns an empty list when absent or unreadable.
    pub fn load_session_summaries(&self) -> Vec<SessionSummary> {
        match self.backend.get(KEY_PREVIOUS_SESSIONS) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                tracing::warn!("Discarding unreadable session list: {}", e);
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!("Failed to read session list: {}", e);
                Vec::new()
            }
        }
    }

    /// Persist the archived-session summary list, replacing any prior value
    pub fn save_session_summaries(&self, summaries: &[SessionSummary]) -> Result<()> {
        let raw = serde_json::to_string(summaries)?;
        self.backend.set(KEY_PREVIOUS_SESSIONS, &raw)
    }

    /// Persist the active session id
    pub fn set_active_session_id(&self, id: &str) -> Result<()> {
        self.backend.set(KEY_SESSION_ID, id)
    }

    /// Read the persisted active session id
    pub fn get_active_session_id(&self) -> Option<String> {
        match self.backend.get(KEY_SESSION_ID) {
            Ok(id) => id,
            Err(e) => {
                tracing::warn!("Failed to read active session id: {}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::message::{Message, Role};

    #[test]
    fn test_load_messages_missing_returns_empty() {
        let store = SessionStore::in_memory();
        assert!(store.load_messages("nope").is_empty());
    }

    #[test]
    fn test_save_and_load_messages_roundtrip() {
        let store = SessionStore::in_memory();
        let messages = vec![
            Message::user("hello", 1),
            Message::assistant("hi there", 2),
        ];

        store.save_messages("s1", &messages).expect("save failed");
        let loaded = store.load_messages("s1");

        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].content, "hello");
        assert_eq!(loaded[1].role, Role::Assistant);
    }

    #[test]
    fn test_save_messages_is_full_overwrite() {
        let store = SessionStore::in_memory();
        store
            .save_messages("s1", &[Message::user("one", 1), Message::user("two", 2)])
            .expect("save failed");
        store
            .save_messages("s1", &[Message::user("three", 3)])
            .expect("save failed");

        let loaded = store.load_messages("s1");
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].content, "three");
    }

    #[test]
    fn test_corrupt_messages_entry_treated_as_empty() {
        let backend = MemoryBackend::new();
        backend
            .set("sessionMessages_bad", "{definitely not json")
            .expect("set failed");
        let store = SessionStore::new(Box::new(backend));
        assert!(store.load_messages("bad").is_empty());
    }

    #[test]
    fn test_corrupt_summary_list_treated_as_empty() {
        let backend = MemoryBackend::new();
        backend
            .set(KEY_PREVIOUS_SESSIONS, "[{\"id\": 42}]")
            .expect("set failed");
        let store = SessionStore::new(Box::new(backend));
        assert!(store.load_session_summaries().is_empty());
    }

    #[test]
    fn test_summaries_roundtrip() {
        let store = SessionStore::in_memory();
        let summaries = vec![SessionSummary {
            id: "a".to_string(),
            title: "first...".to_string(),
            timestamp: 10,
            message_count: 4,
        }];

        store
            .save_session_summaries(&summaries)
            .expect("save failed");
        let loaded = store.load_session_summaries();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].message_count, 4);
    }

    #[test]
    fn test_active_session_id_roundtrip() {
        let store = SessionStore::in_memory();
        assert!(store.get_active_session_id().is_none());

        store.set_active_session_id("abc-123").expect("set failed");
        assert_eq!(store.get_active_session_id().as_deref(), Some("abc-123"));
    }

    #[test]
    fn test_writes_are_idempotent() {
        let store = SessionStore::in_memory();
        let messages = vec![Message::user("same", 1)];

        store.save_messages("s1", &messages).expect("save failed");
        let first = store.load_messages("s1");
        store.save_messages("s1", &messages).expect("save failed");
        let second = store.load_messages("s1");

        assert_eq!(first.len(), second.len());
        assert_eq!(first[0].id, second[0].id);
    }

    #[test]
    fn test_message_lists_keyed_per_session() {
        let store = SessionStore::in_memory();
        store
            .save_messages("a", &[Message::user("in a", 1)])
            .expect("save failed");
        store
            .save_messages("b", &[Message::user("in b", 1)])
            .expect("save failed");

        assert_eq!(store.load_messages("a")[0].content, "in a");
        assert_eq!(store.load_messages("b")[0].content, "in b");
    }

    #[test]
    fn test_sled_backend_roundtrip() {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        let store = SessionStore::open(dir.path().join("sessions.db")).expect("open failed");

        store.set_active_session_id("persisted").expect("set failed");
        store
            .save_messages("persisted", &[Message::user("durable", 5)])
            .expect("save failed");

        assert_eq!(
            store.get_active_session_id().as_deref(),
            Some("persisted")
        );
        assert_eq!(store.load_messages("persisted").len(), 1);
    }

    #[test]
    fn test_memory_backend_remove_missing_is_ok() {
        let backend = MemoryBackend::new();
        assert!(backend.remove("never-set").is_ok());
    }
}
