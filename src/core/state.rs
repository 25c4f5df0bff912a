//! # Application State
//!
//! Core client state. This module contains domain logic only — no TUI
//! types. Presentation state lives in the `tui` module.
//!
//! ```text
//! App
//! ├── store: SessionStore            // persisted threads + active pointer
//! ├── log: ConversationLog           // messages of the active thread
//! ├── session_title / created_at     // metadata of the active thread
//! ├── status: RunStatus              // state machine for the current run
//! ├── tool_calls: ToolCallRegistry   // per-run tool progress
//! ├── typing: TypingIndicator        // placeholder dot animation
//! ├── in_flight: Option<String>      // id of the streaming assistant msg
//! ├── is_loading: bool               // a run is open
//! └── user_id: String                // stable backend identity
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use crate::core::config::ResolvedConfig;
use crate::core::conversation::ConversationLog;
use crate::core::session::{Session, SessionStore};
use crate::core::status::RunStatus;
use crate::core::tools::ToolCallRegistry;
use crate::core::typing::TypingIndicator;

pub struct App {
    pub store: SessionStore,
    pub log: ConversationLog,
    pub session_title: String,
    pub session_created_at: i64,
    pub status: RunStatus,
    pub tool_calls: ToolCallRegistry,
    pub typing: TypingIndicator,
    pub in_flight: Option<String>,
    pub is_loading: bool,
    pub user_id: String,
    pub greeting: String,
}

impl App {
    /// Build the app over previously persisted sessions. A fresh thread is
    /// activated on startup (the persisted ones stay in the sidebar), which
    /// is also how a session comes to exist implicitly on first load.
    pub fn new(config: &ResolvedConfig, user_id: String, sessions: Vec<Session>) -> Self {
        let fresh = Session::fresh(&config.greeting);
        let mut app = Self {
            store: SessionStore::new(sessions, fresh.id.clone()),
            log: ConversationLog::default(),
            session_title: String::new(),
            session_created_at: 0,
            status: RunStatus::default(),
            tool_calls: ToolCallRegistry::new(),
            typing: TypingIndicator::idle(),
            in_flight: None,
            is_loading: false,
            user_id,
            greeting: config.greeting.clone(),
        };
        app.activate(fresh);
        app
    }

    /// Snapshot the active thread as a Session for upserting into the store.
    pub fn snapshot(&self) -> Session {
        Session {
            id: self.store.active_id().to_string(),
            title: self.session_title.clone(),
            created_at: self.session_created_at,
            messages: self.log.messages.clone(),
        }
    }

    /// Load a session's thread into the live fields and make it active.
    pub fn activate(&mut self, session: Session) {
        self.store.set_active(&session.id);
        self.session_title = session.title;
        self.session_created_at = session.created_at;
        self.log = ConversationLog::from_messages(session.messages);
        self.reset_run_state();
    }

    /// Archive the current thread (if it earned persistence) and switch to
    /// a brand-new one.
    pub fn start_fresh(&mut self) {
        self.sync_store();
        self.activate(Session::fresh(&self.greeting));
    }

    /// Mirror the active thread into the store, but only once it holds a
    /// user message — greeting-only threads are not worth keeping.
    pub fn sync_store(&mut self) {
        if self.log.has_user_message() {
            self.store.upsert(self.snapshot());
        }
    }

    /// Clear everything scoped to a single run.
    pub fn reset_run_state(&mut self) {
        self.tool_calls.clear();
        self.status.reset();
        self.typing.stop();
        self.in_flight = None;
        self.is_loading = false;
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::test_app;

    #[test]
    fn test_new_app_starts_with_greeting_thread() {
        let app = test_app();
        assert_eq!(app.session_title, crate::core::session::NEW_CHAT_TITLE);
        assert_eq!(app.log.len(), 1);
        assert!(!app.is_loading);
        assert!(app.store.is_empty()); // greeting-only thread not upserted
    }

    #[test]
    fn test_sync_store_skips_greeting_only_thread() {
        let mut app = test_app();
        app.sync_store();
        assert!(app.store.is_empty());

        app.log.append_user("hello");
        app.sync_store();
        assert_eq!(app.store.len(), 1);
        assert_eq!(app.store.sessions()[0].id, app.store.active_id());
    }

    #[test]
    fn test_start_fresh_archives_and_resets() {
        let mut app = test_app();
        app.log.append_user("first question");
        let old_id = app.store.active_id().to_string();

        app.start_fresh();

        assert_ne!(app.store.active_id(), old_id);
        assert!(app.store.contains(&old_id));
        assert_eq!(app.log.len(), 1); // greeting only
        assert!(!app.log.has_user_message());
    }
}
