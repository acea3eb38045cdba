//! Session lifecycle state machine and message exchange
//!
//! `ChatController` owns the active session id, the in-memory message list,
//! and the archived-session summaries, and drives every transition: starting
//! a new session, switching to an archived one, archiving on teardown, and
//! exchanging messages with the remote assistant.
//!
//! A fresh session id is minted on every startup; prior active-session
//! continuity is intentionally discarded. A session only enters the summary
//! list once it has at least one message.

use crate::config::LimitsConfig;
use crate::error::Result;
use crate::notify::{FallbackKind, Notice};
use crate::query::{FallbackResponder, QueryClient, QueryFailure};
use crate::session::message::Message;
use crate::session::store::SessionStore;
use crate::session::summary::{derive_title, SessionSummary};
use crate::wallet::WalletAdapter;
use chrono::Utc;

/// Millisecond clock, injectable for deterministic tests
pub type Clock = Box<dyn Fn() -> i64 + Send>;

fn wall_clock() -> Clock {
    Box::new(|| Utc::now().timestamp_millis())
}

/// Drops oldest messages until `messages` fits under `cap`
fn cap_messages(messages: &mut Vec<Message>, cap: usize) {
    if messages.len() > cap {
        let excess = messages.len() - cap;
        messages.drain(..excess);
    }
}

/// Session lifecycle controller and message exchange
pub struct ChatController {
    store: SessionStore,
    query: QueryClient,
    wallet: Box<dyn WalletAdapter>,
    fallback: FallbackResponder,
    clock: Clock,
    limits: LimitsConfig,
    active_id: String,
    messages: Vec<Message>,
    summaries: Vec<SessionSummary>,
    busy: bool,
    notices: Vec<Notice>,
}

impl ChatController {
    /// Create the controller and perform the startup transition
    ///
    /// Mints a fresh session id, persists it, and loads the archived
    /// summaries into memory. The new session is not added to the summary
    /// list until it gains a message.
    ///
    /// # Errors
    ///
    /// Returns an error if the active session id cannot be persisted
    pub fn new(
        store: SessionStore,
        query: QueryClient,
        wallet: Box<dyn WalletAdapter>,
        limits: LimitsConfig,
    ) -> Result<Self> {
        let active_id = uuid::Uuid::new_v4().to_string();
        store.set_active_session_id(&active_id)?;
        let summaries = store.load_session_summaries();
        tracing::debug!(
            "Initialized session {} ({} archived sessions)",
            active_id,
            summaries.len()
        );

        Ok(Self {
            store,
            query,
            wallet,
            fallback: FallbackResponder::default(),
            clock: wall_clock(),
            limits,
            active_id,
            messages: Vec::new(),
            summaries,
            busy: false,
            notices: Vec::new(),
        })
    }

    /// Replace the clock (tests)
    pub fn with_clock(mut self, clock: impl Fn() -> i64 + Send + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Replace the fallback responder (tests)
    pub fn with_fallback(mut self, fallback: FallbackResponder) -> Self {
        self.fallback = fallback;
        self
    }

    /// The active session id
    pub fn active_session_id(&self) -> &str {
        &self.active_id
    }

    /// Messages of the active session, oldest first
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Archived session summaries, newest first
    pub fn summaries(&self) -> &[SessionSummary] {
        &self.summaries
    }

    /// Whether a query is in flight
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Wallet collaborator view
    pub fn wallet(&self) -> &dyn WalletAdapter {
        self.wallet.as_ref()
    }

    /// The underlying session store
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Drain pending notices for display
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Archive the current session (or drop its summary when empty), then
    /// switch to a brand-new empty session
    pub fn start_new_session(&mut self) -> Result<()> {
        self.archive_current()?;

        self.active_id = uuid::Uuid::new_v4().to_string();
        self.messages.clear();
        self.store.set_active_session_id(&self.active_id)?;
        tracing::debug!("Started new session {}", self.active_id);
        Ok(())
    }

    /// Switch to a previously archived session
    ///
    /// Selecting the active session is a no-op. Otherwise the active
    /// session's summary (when present) gets its message count refreshed in
    /// place before the switch, preserving its title and timestamp.
    pub fn select_session(&mut self, target_id: &str) -> Result<()> {
        if target_id == self.active_id {
            return Ok(());
        }

        if !self.messages.is_empty() {
            let count = self.messages.len();
            if let Some(existing) = self.summaries.iter_mut().find(|s| s.id == self.active_id) {
                existing.message_count = count;
                self.store.save_session_summaries(&self.summaries)?;
            }
        }

        self.active_id = target_id.to_string();
        self.messages = self.store.load_messages(target_id);
        self.store.set_active_session_id(target_id)?;
        tracing::debug!(
            "Selected session {} ({} messages)",
            target_id,
            self.messages.len()
        );
        Ok(())
    }

    /// Best-effort teardown hook
    ///
    /// Persists the active message list and runs the archive-or-remove
    /// logic. Safe to skip entirely: every write here is idempotent and the
    /// stored state stays consistent without it.
    pub fn flush(&mut self) -> Result<()> {
        if !self.messages.is_empty() {
            self.store.save_messages(&self.active_id, &self.messages)?;
        }
        self.archive_current()
    }

    /// Archive the active session into the summary list, or drop its
    /// summary when it has no messages
    fn archive_current(&mut self) -> Result<()> {
        if self.messages.is_empty() {
            let before = self.summaries.len();
            self.summaries.retain(|s| s.id != self.active_id);
            if self.summaries.len() != before {
                self.store.save_session_summaries(&self.summaries)?;
            }
            return Ok(());
        }

        let summary = SessionSummary {
            id: self.active_id.clone(),
            title: derive_title(&self.messages[0].content),
            timestamp: (self.clock)(),
            message_count: self.messages.len(),
        };

        if let Some(existing) = self.summaries.iter_mut().find(|s| s.id == self.active_id) {
            *existing = summary;
        } else {
            self.summaries.insert(0, summary);
        }

        self.summaries.retain(|s| s.message_count > 0);
        self.summaries.truncate(self.limits.max_archived_sessions);
        self.store.save_session_summaries(&self.summaries)
    }

    /// Send a user message and append the assistant's reply
    ///
    /// The user message is persisted before the network call begins. On any
    /// query failure a canned reply is synthesized locally and a notice is
    /// recorded. The reply targets the session that sent the query: if the
    /// user switched sessions while the call was in flight, the reply is
    /// persisted to the originating session's stored list and the current
    /// view is left untouched.
    pub async fn send_message(&mut self, content: &str) -> Result<()> {
        let user = Message::user(content, (self.clock)());
        self.messages.push(user);
        cap_messages(&mut self.messages, self.limits.max_messages_per_session);
        self.store.save_messages(&self.active_id, &self.messages)?;
        self.busy = true;

        let origin_id = self.active_id.clone();
        let remarks: Vec<String> = self.wallet.remark().into_iter().collect();

        let result = self.query.send(content, &origin_id, remarks).await;

        let assistant = match result {
            Ok(response) => {
                let actions = response.user_actions.clone().unwrap_or_default();
                Message::assistant_with_actions(response.content(), actions, (self.clock)())
            }
            Err(failure) => {
                let kind = match &failure {
                    QueryFailure::Endpoint { .. } => FallbackKind::EndpointUnavailable,
                    QueryFailure::Transport(_) => FallbackKind::ConnectionError,
                };
                tracing::warn!("Query failed, synthesizing local reply: {}", failure);
                self.notices.push(Notice::FallbackUsed(kind));

                let (text, actions) = self.fallback.respond(content);
                Message::assistant_with_actions(text, actions.unwrap_or_default(), (self.clock)())
            }
        };

        let applied = self.apply_reply(&origin_id, assistant);
        self.busy = false;
        applied
    }

    /// Append an assistant reply to the session that asked for it
    fn apply_reply(&mut self, origin_id: &str, assistant: Message) -> Result<()> {
        let stored_active = self.store.get_active_session_id();
        let still_active =
            self.active_id == origin_id && stored_active.as_deref() == Some(origin_id);

        if still_active {
            self.messages.push(assistant);
            cap_messages(&mut self.messages, self.limits.max_messages_per_session);
            return self.store.save_messages(origin_id, &self.messages);
        }

        // The session switched while the query was in flight. Persist the
        // reply where it belongs and leave the current view alone.
        let mut stored = self.store.load_messages(origin_id);
        stored.push(assistant);
        cap_messages(&mut stored, self.limits.max_messages_per_session);
        self.store.save_messages(origin_id, &stored)?;
        self.notices.push(Notice::StaleReply {
            session_id: origin_id.to_string(),
        });
        tracing::debug!("Applied stale reply to session {}", origin_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::QueryConfig;
    use crate::wallet::NullWallet;

    fn test_controller() -> ChatController {
        test_controller_with_store(SessionStore::in_memory())
    }

    fn test_controller_with_store(store: SessionStore) -> ChatController {
        let query = QueryClient::new(&QueryConfig {
            // Unroutable: lifecycle tests never reach the network.
            base_url: "http://127.0.0.1:1".to_string(),
            timeout_seconds: 1,
        })
        .expect("client build failed");

        ChatController::new(store, query, Box::new(NullWallet), LimitsConfig::default())
            .expect("controller init failed")
            .with_clock(|| 1_000)
            .with_fallback(FallbackResponder::with_selector(|_| 0))
    }

    fn push_user(controller: &mut ChatController, content: &str) {
        // Simulate an exchanged message without the network half.
        let msg = Message::user(content, 1_000);
        controller.messages.push(msg);
        controller
            .store
            .save_messages(&controller.active_id, &controller.messages)
            .expect("save failed");
    }

    #[test]
    fn test_initialize_mints_fresh_session() {
        let controller = test_controller();
        assert!(!controller.active_session_id().is_empty());
        assert!(controller.messages().is_empty());
        assert!(controller.summaries().is_empty());
        assert!(!controller.is_busy());
        assert_eq!(
            controller.store.get_active_session_id().as_deref(),
            Some(controller.active_session_id())
        );
    }

    #[test]
    fn test_start_new_session_archives_current() {
        let mut controller = test_controller();
        let first_id = controller.active_session_id().to_string();
        push_user(&mut controller, "hello world");

        controller.start_new_session().expect("transition failed");

        assert_ne!(controller.active_session_id(), first_id);
        assert!(controller.messages().is_empty());

        let summaries = controller.summaries();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].id, first_id);
        assert_eq!(summaries[0].title, "hello world...");
        assert_eq!(summaries[0].message_count, 1);

        // Persisted list matches.
        let stored = controller.store.load_session_summaries();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].id, first_id);
    }

    #[test]
    fn test_empty_session_never_archived() {
        let mut controller = test_controller();
        controller.start_new_session().expect("transition failed");

        assert!(controller.summaries().is_empty());
        assert!(controller.store.load_session_summaries().is_empty());
    }

    #[test]
    fn test_archive_is_idempotent() {
        let mut controller = test_controller();
        push_user(&mut controller, "only message");

        controller.archive_current().expect("archive failed");
        let first = controller.store.load_session_summaries();

        controller.archive_current().expect("archive failed");
        let second = controller.store.load_session_summaries();

        assert_eq!(first.len(), second.len());
        assert_eq!(first[0].id, second[0].id);
        assert_eq!(first[0].title, second[0].title);
        assert_eq!(first[0].timestamp, second[0].timestamp);
        assert_eq!(first[0].message_count, second[0].message_count);
    }

    #[test]
    fn test_archive_replaces_existing_entry_in_place() {
        let mut controller = test_controller();
        let first_id = controller.active_session_id().to_string();
        push_user(&mut controller, "first session");
        controller.start_new_session().expect("transition failed");

        // Build a second archived session so the list has two entries.
        push_user(&mut controller, "second session");
        controller.start_new_session().expect("transition failed");
        assert_eq!(controller.summaries().len(), 2);
        assert_eq!(controller.summaries()[0].title, "second session...");

        // Re-archive the first session with more messages; it must keep its
        // position rather than jump to the front.
        controller.select_session(&first_id).expect("select failed");
        push_user(&mut controller, "follow-up");
        controller.archive_current().expect("archive failed");

        let summaries = controller.summaries();
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[1].id, first_id);
        assert_eq!(summaries[1].message_count, 2);
    }

    #[test]
    fn test_select_same_session_is_noop() {
        let mut controller = test_controller();
        push_user(&mut controller, "hello");
        let id = controller.active_session_id().to_string();

        controller.select_session(&id).expect("select failed");

        assert_eq!(controller.active_session_id(), id);
        assert_eq!(controller.messages().len(), 1);
        // No summary write happened.
        assert!(controller.store.load_session_summaries().is_empty());
    }

    #[test]
    fn test_select_session_loads_target_messages() {
        let mut controller = test_controller();
        let first_id = controller.active_session_id().to_string();
        push_user(&mut controller, "stored in first");
        controller.start_new_session().expect("transition failed");

        controller.select_session(&first_id).expect("select failed");

        assert_eq!(controller.active_session_id(), first_id);
        assert_eq!(controller.messages().len(), 1);
        assert_eq!(controller.messages()[0].content, "stored in first");
        assert_eq!(
            controller.store.get_active_session_id().as_deref(),
            Some(first_id.as_str())
        );
    }

    #[test]
    fn test_select_session_refreshes_count_preserving_title_and_timestamp() {
        let mut controller = test_controller();
        let first_id = controller.active_session_id().to_string();
        push_user(&mut controller, "original title source");
        controller.start_new_session().expect("transition failed");

        controller.select_session(&first_id).expect("select failed");
        push_user(&mut controller, "grew by one");

        let archived = controller.summaries()[0].clone();

        // Switch away; the summary's count refreshes in place while title
        // and timestamp stay as archived.
        controller.select_session("elsewhere").expect("select failed");
        let refreshed = controller
            .summaries()
            .iter()
            .find(|s| s.id == first_id)
            .expect("summary missing");
        assert_eq!(refreshed.message_count, 2);
        assert_eq!(refreshed.title, archived.title);
        assert_eq!(refreshed.timestamp, archived.timestamp);
    }

    #[test]
    fn test_switching_away_from_unarchived_session_keeps_messages_stored() {
        let mut controller = test_controller();
        let first_id = controller.active_session_id().to_string();
        push_user(&mut controller, "not yet archived");

        // Direct switch without archiving: no summary, but the stored
        // message list remains addressable by id.
        controller.select_session("someone-else").expect("select failed");
        assert!(controller.summaries().is_empty());
        assert_eq!(controller.store.load_messages(&first_id).len(), 1);
    }

    #[test]
    fn test_flush_archives_like_unload() {
        let mut controller = test_controller();
        let id = controller.active_session_id().to_string();
        push_user(&mut controller, "about to close");

        controller.flush().expect("flush failed");

        let stored = controller.store.load_session_summaries();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].id, id);
        assert_eq!(stored[0].message_count, 1);
    }

    #[test]
    fn test_flush_on_empty_session_drops_summary() {
        let mut controller = test_controller();
        let id = controller.active_session_id().to_string();

        // Plant a stale zero-count summary for the active session.
        controller.summaries.push(SessionSummary {
            id: id.clone(),
            title: "stale...".to_string(),
            timestamp: 1,
            message_count: 0,
        });

        controller.flush().expect("flush failed");
        assert!(controller.summaries().is_empty());
        assert!(controller.store.load_session_summaries().is_empty());
    }

    #[test]
    fn test_summary_cap_enforced() {
        let store = SessionStore::in_memory();
        let query = QueryClient::new(&QueryConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            timeout_seconds: 1,
        })
        .expect("client build failed");
        let limits = LimitsConfig {
            max_archived_sessions: 2,
            max_messages_per_session: 500,
        };
        let mut controller = ChatController::new(store, query, Box::new(NullWallet), limits)
            .expect("controller init failed")
            .with_clock(|| 1_000);

        for i in 0..4 {
            push_user(&mut controller, &format!("session {}", i));
            controller.start_new_session().expect("transition failed");
        }

        assert_eq!(controller.summaries().len(), 2);
        // Newest first: the most recently archived sessions survive.
        assert_eq!(controller.summaries()[0].title, "session 3...");
        assert_eq!(controller.summaries()[1].title, "session 2...");
    }

    #[test]
    fn test_message_cap_drops_oldest() {
        let mut messages: Vec<Message> = (0..6)
            .map(|i| Message::user(format!("m{}", i), i))
            .collect();
        cap_messages(&mut messages, 4);
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0].content, "m2");
        assert_eq!(messages[3].content, "m5");
    }

    #[test]
    fn test_take_notices_drains() {
        let mut controller = test_controller();
        controller
            .notices
            .push(Notice::FallbackUsed(FallbackKind::ConnectionError));

        let drained = controller.take_notices();
        assert_eq!(drained.len(), 1);
        assert!(controller.take_notices().is_empty());
    }

    #[tokio::test]
    async fn test_send_message_falls_back_on_transport_failure() {
        let mut controller = test_controller();

        controller
            .send_message("hello out there")
            .await
            .expect("send failed");

        let messages = controller.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, crate::session::Role::User);
        assert_eq!(messages[1].role, crate::session::Role::Assistant);
        assert!(messages[1].content.contains("hello out there"));
        assert!(!controller.is_busy());

        let notices = controller.take_notices();
        assert_eq!(
            notices,
            vec![Notice::FallbackUsed(FallbackKind::ConnectionError)]
        );

        // Both messages persisted.
        let stored = controller
            .store
            .load_messages(controller.active_session_id());
        assert_eq!(stored.len(), 2);
    }

    #[tokio::test]
    async fn test_send_message_fallback_attaches_swap_action() {
        let mut controller = test_controller();

        controller
            .send_message("please swap 1 SOL for USDC")
            .await
            .expect("send failed");

        let assistant = &controller.messages()[1];
        let actions = assistant.actions.as_ref().expect("swap action expected");
        assert_eq!(actions[0].action, "swap");
    }
}
