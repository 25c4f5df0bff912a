//! # Sessions
//!
//! Multiple conversation threads keyed by an opaque session id, cached in
//! `~/.flightdeck/sessions.json`. The local store is authoritative for the
//! UI's list and ordering; the backend's copy is a best-effort mirror that
//! is only ever deleted, never pulled back.
//!
//! Writes use atomic rename (write `.tmp`, then `rename()`) for crash
//! safety. A session is only worth persisting once it holds at least one
//! user message — a greeting-only thread is never saved.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Utc;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::core::conversation::{ConversationLog, Message, Role};

/// Title of a thread before the first user message names it.
pub const NEW_CHAT_TITLE: &str = "New chat";

/// Titles are clipped to this many characters, plus an ellipsis.
pub const TITLE_MAX_CHARS: usize = 32;

/// One persisted conversation thread.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Session {
    pub id: String,
    pub title: String,
    #[serde(rename = "createdAt")]
    pub created_at: i64,
    pub messages: Vec<Message>,
}

impl Session {
    /// A brand-new thread holding only the greeting.
    pub fn fresh(greeting: &str) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: NEW_CHAT_TITLE.to_string(),
            created_at: Utc::now().timestamp_millis(),
            messages: ConversationLog::greeting(greeting).messages,
        }
    }

    pub fn has_user_message(&self) -> bool {
        self.messages.iter().any(|m| m.role == Role::User)
    }
}

/// Clip `text` to the title length, appending an ellipsis when truncated.
pub fn derive_title(text: &str) -> String {
    let trimmed = text.trim();
    let clipped: String = trimmed.chars().take(TITLE_MAX_CHARS).collect();
    if trimmed.chars().count() > TITLE_MAX_CHARS {
        format!("{clipped}...")
    } else {
        clipped
    }
}

/// Outcome of removing a session, telling the caller what became active.
#[derive(Debug, PartialEq)]
pub enum RemoveOutcome {
    /// The id wasn't in the store (it may still only exist in memory).
    NotFound,
    /// A background thread was removed; the active one is untouched.
    Unchanged,
    /// The active thread was removed; this remaining session takes over
    /// (first in store order, not recency).
    SwitchedTo(Session),
    /// Nothing remained; a fresh greeting-only session was created.
    Fresh(Session),
}

/// The session collection plus the active pointer. Insertion order is the
/// storage order and is never rewritten by listing or selection.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: Vec<Session>,
    active_id: String,
}

impl SessionStore {
    pub fn new(sessions: Vec<Session>, active_id: String) -> Self {
        Self {
            sessions,
            active_id,
        }
    }

    pub fn active_id(&self) -> &str {
        &self.active_id
    }

    pub fn set_active(&mut self, id: &str) {
        self.active_id = id.to_string();
    }

    /// Replace by id if present, else append. The invariant that no two
    /// sessions share an id holds by construction.
    pub fn upsert(&mut self, session: Session) {
        match self.sessions.iter_mut().find(|s| s.id == session.id) {
            Some(slot) => *slot = session,
            None => self.sessions.push(session),
        }
    }

    pub fn get(&self, id: &str) -> Option<&Session> {
        self.sessions.iter().find(|s| s.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Sessions sorted by creation time, newest first. The underlying
    /// storage order is left untouched.
    pub fn list_by_recency(&self) -> Vec<&Session> {
        let mut listed: Vec<&Session> = self.sessions.iter().collect();
        listed.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        listed
    }

    /// Make `id` active and return a copy of its thread for loading.
    pub fn select(&mut self, id: &str) -> Option<Session> {
        let session = self.get(id).cloned()?;
        self.active_id = session.id.clone();
        Some(session)
    }

    /// Remove `id` locally. When the active thread was removed, falls back
    /// to the first remaining session in store order, or mints a fresh one.
    /// Remote deletion is the caller's (best-effort) job.
    pub fn remove(&mut self, id: &str, greeting: &str) -> RemoveOutcome {
        let was_active = id == self.active_id;
        let before = self.sessions.len();
        self.sessions.retain(|s| s.id != id);
        let found = self.sessions.len() < before;

        if !was_active {
            return if found {
                RemoveOutcome::Unchanged
            } else {
                RemoveOutcome::NotFound
            };
        }

        match self.sessions.first().cloned() {
            Some(next) => {
                self.active_id = next.id.clone();
                RemoveOutcome::SwitchedTo(next)
            }
            None => {
                let fresh = Session::fresh(greeting);
                self.active_id = fresh.id.clone();
                RemoveOutcome::Fresh(fresh)
            }
        }
    }

    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

// ============================================================================
// Disk persistence
// ============================================================================

/// Returns `~/.flightdeck/`, creating it if needed.
pub fn data_dir() -> io::Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no home directory"))?;
    let dir = home.join(".flightdeck");
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

fn sessions_path(dir: &Path) -> PathBuf {
    dir.join("sessions.json")
}

/// Atomically write `data` as JSON to `path` (via `.tmp` + rename).
fn atomic_write_json<T: Serialize>(path: &Path, data: &T) -> io::Result<()> {
    let tmp_path = path.with_extension("tmp");
    let json = serde_json::to_string_pretty(data)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    fs::write(&tmp_path, json)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}

/// Load the persisted session list. Missing file means first run; a
/// malformed file is logged and treated as empty rather than crashing.
pub fn load_sessions(dir: &Path) -> Vec<Session> {
    let path = sessions_path(dir);
    if !path.exists() {
        return Vec::new();
    }
    match fs::read_to_string(&path) {
        Ok(json) => match serde_json::from_str(&json) {
            Ok(sessions) => sessions,
            Err(e) => {
                warn!("Malformed {}: {} (starting empty)", path.display(), e);
                Vec::new()
            }
        },
        Err(e) => {
            warn!("Could not read {}: {}", path.display(), e);
            Vec::new()
        }
    }
}

/// Persist the session list, skipping threads with no user message yet.
pub fn save_sessions(dir: &Path, sessions: &[Session]) -> io::Result<()> {
    let persistable: Vec<&Session> = sessions.iter().filter(|s| s.has_user_message()).collect();
    atomic_write_json(&sessions_path(dir), &persistable)?;
    debug!("Saved {} session(s)", persistable.len());
    Ok(())
}

/// Stable per-installation user identifier, minted on first run.
pub fn load_or_mint_user_id(dir: &Path) -> io::Result<String> {
    let path = dir.join("identity");
    if let Ok(stored) = fs::read_to_string(&path) {
        let stored = stored.trim().to_string();
        if !stored.is_empty() {
            return Ok(stored);
        }
    }
    let fresh = uuid::Uuid::new_v4().to_string();
    fs::write(&path, &fresh)?;
    Ok(fresh)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_at(id: &str, created_at: i64) -> Session {
        Session {
            id: id.to_string(),
            title: format!("chat {id}"),
            created_at,
            messages: Vec::new(),
        }
    }

    fn session_with_user_msg(id: &str, created_at: i64, text: &str) -> Session {
        let mut log = ConversationLog::greeting("hi");
        log.append_user(text);
        Session {
            id: id.to_string(),
            title: derive_title(text),
            created_at,
            messages: log.messages,
        }
    }

    #[test]
    fn test_upsert_replaces_in_place_or_appends() {
        let mut store = SessionStore::default();
        store.upsert(session_at("s1", 100));
        store.upsert(session_at("s2", 200));
        assert_eq!(store.len(), 2);

        let mut updated = session_at("s1", 100);
        updated.title = "renamed".to_string();
        store.upsert(updated);

        assert_eq!(store.len(), 2);
        assert_eq!(store.get("s1").unwrap().title, "renamed");
        // position unchanged
        assert_eq!(store.sessions()[0].id, "s1");
    }

    #[test]
    fn test_list_by_recency_leaves_storage_order_alone() {
        let mut store = SessionStore::default();
        store.upsert(session_at("a", 100));
        store.upsert(session_at("b", 300));
        store.upsert(session_at("c", 200));

        let listed: Vec<i64> = store.list_by_recency().iter().map(|s| s.created_at).collect();
        assert_eq!(listed, vec![300, 200, 100]);

        let stored: Vec<&str> = store.sessions().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(stored, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_remove_active_falls_back_to_first_in_store_order() {
        // Store order [s1, s2, s3]; s2 is newer than s3 by recency, but the
        // fallback is store order, so deleting active s1 selects s2.
        let mut store = SessionStore::default();
        store.upsert(session_at("s1", 100));
        store.upsert(session_at("s2", 50));
        store.upsert(session_at("s3", 900));
        store.set_active("s1");

        match store.remove("s1", "hello") {
            RemoveOutcome::SwitchedTo(next) => assert_eq!(next.id, "s2"),
            other => panic!("unexpected: {:?}", other),
        }
        assert_eq!(store.active_id(), "s2");
        assert!(!store.contains("s1"));
    }

    #[test]
    fn test_remove_last_session_creates_fresh_greeting_thread() {
        let mut store = SessionStore::default();
        store.upsert(session_at("only", 100));
        store.set_active("only");

        match store.remove("only", "Hello! How can I help?") {
            RemoveOutcome::Fresh(fresh) => {
                assert_eq!(fresh.title, NEW_CHAT_TITLE);
                assert_eq!(fresh.messages.len(), 1);
                assert_eq!(fresh.messages[0].content, "Hello! How can I help?");
                assert_eq!(store.active_id(), fresh.id);
            }
            other => panic!("unexpected: {:?}", other),
        }
        assert!(store.is_empty());
    }

    #[test]
    fn test_remove_background_session_keeps_active() {
        let mut store = SessionStore::default();
        store.upsert(session_at("s1", 100));
        store.upsert(session_at("s2", 200));
        store.set_active("s1");

        assert_eq!(store.remove("s2", "hi"), RemoveOutcome::Unchanged);
        assert_eq!(store.active_id(), "s1");
    }

    #[test]
    fn test_remove_unknown_id() {
        let mut store = SessionStore::default();
        store.upsert(session_at("s1", 100));
        store.set_active("s1");
        assert_eq!(store.remove("ghost", "hi"), RemoveOutcome::NotFound);
    }

    #[test]
    fn test_derive_title_clips_at_32_chars() {
        let long = "a".repeat(40);
        let title = derive_title(&long);
        assert_eq!(title.chars().count(), TITLE_MAX_CHARS + 3);
        assert!(title.ends_with("..."));

        assert_eq!(derive_title("short question"), "short question");
        // multibyte input must not split a character
        let hindi = "नमस्ते ".repeat(10);
        assert!(derive_title(&hindi).ends_with("..."));
    }

    #[test]
    fn test_save_skips_greeting_only_sessions() {
        let dir = tempfile::tempdir().unwrap();
        let greeting_only = Session::fresh("hi");
        let real = session_with_user_msg("real", 100, "book me a flight");

        save_sessions(dir.path(), &[greeting_only, real]).unwrap();

        let loaded = load_sessions(dir.path());
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, "real");
    }

    #[test]
    fn test_load_round_trip_preserves_messages() {
        let dir = tempfile::tempdir().unwrap();
        let session = session_with_user_msg("s", 42, "window seat please");
        save_sessions(dir.path(), std::slice::from_ref(&session)).unwrap();

        let loaded = load_sessions(dir.path());
        assert_eq!(loaded, vec![session]);
    }

    #[test]
    fn test_load_missing_or_malformed_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_sessions(dir.path()).is_empty());

        fs::write(dir.path().join("sessions.json"), "{not json").unwrap();
        assert!(load_sessions(dir.path()).is_empty());
    }

    #[test]
    fn test_user_id_is_stable_across_loads() {
        let dir = tempfile::tempdir().unwrap();
        let first = load_or_mint_user_id(dir.path()).unwrap();
        let second = load_or_mint_user_id(dir.path()).unwrap();
        assert_eq!(first, second);
        assert!(!first.is_empty());
    }
}
