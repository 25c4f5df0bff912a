//! # Conversation Log
//!
//! The ordered message list for the active session. Append-only, with one
//! exception: the single in-flight assistant message (the tail, while a run
//! is active) may be rewritten as content streams in. Every in-place update
//! is gated on an explicit id match, never on position alone, so a log that
//! advanced past the expected message is left untouched.

use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Initial content of the streaming placeholder bubble.
pub const PLACEHOLDER_DOT: &str = "●";

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    #[serde(rename = "user")]
    User,
    #[serde(rename = "assistant")]
    Assistant,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Message {
    pub id: String,
    pub role: Role,
    pub content: String,
    /// Display timestamp, fixed at creation.
    pub time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chart: Option<Value>,
}

impl Message {
    fn new(role: Role, content: &str) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            role,
            content: content.to_string(),
            time: time_label(),
            table: None,
            chart: None,
        }
    }
}

fn time_label() -> String {
    Local::now().format("%H:%M").to_string()
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct ConversationLog {
    pub messages: Vec<Message>,
}

impl ConversationLog {
    /// A fresh log containing only the assistant greeting.
    pub fn greeting(greeting: &str) -> Self {
        Self {
            messages: vec![Message::new(Role::Assistant, greeting)],
        }
    }

    pub fn from_messages(messages: Vec<Message>) -> Self {
        Self { messages }
    }

    pub fn append_user(&mut self, content: &str) -> &Message {
        self.messages.push(Message::new(Role::User, content));
        self.messages.last().expect("just pushed")
    }

    /// Append an empty-ish assistant bubble for the upcoming run and return
    /// its id. The caller tracks this id as the in-flight message.
    pub fn append_assistant_placeholder(&mut self) -> String {
        let msg = Message::new(Role::Assistant, PLACEHOLDER_DOT);
        let id = msg.id.clone();
        self.messages.push(msg);
        id
    }

    /// Append a standalone assistant message (e.g. a failure notice when no
    /// message is in flight).
    pub fn append_assistant(&mut self, content: &str) {
        self.messages.push(Message::new(Role::Assistant, content));
    }

    /// Append `delta` to the tail message, only if its id matches.
    /// Returns whether anything changed.
    pub fn append_delta(&mut self, id: &str, delta: &str) -> bool {
        match self.tail_mut(id) {
            Some(msg) => {
                msg.content.push_str(delta);
                true
            }
            None => false,
        }
    }

    /// Replace the tail message's content, only if its id matches.
    pub fn replace_content(&mut self, id: &str, content: &str) -> bool {
        match self.tail_mut(id) {
            Some(msg) => {
                msg.content = content.to_string();
                true
            }
            None => false,
        }
    }

    /// Attach optional structured payloads to the tail message at run end.
    pub fn finalize(&mut self, id: &str, table: Option<Value>, chart: Option<Value>) -> bool {
        match self.tail_mut(id) {
            Some(msg) => {
                if table.is_some() {
                    msg.table = table;
                }
                if chart.is_some() {
                    msg.chart = chart;
                }
                true
            }
            None => false,
        }
    }

    pub fn has_user_message(&self) -> bool {
        self.messages.iter().any(|m| m.role == Role::User)
    }

    pub fn first_user_message(&self) -> Option<&Message> {
        self.messages.iter().find(|m| m.role == Role::User)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    // Tail lookup with the id check that guards against the log having
    // advanced past the expected in-flight message.
    fn tail_mut(&mut self, id: &str) -> Option<&mut Message> {
        self.messages.last_mut().filter(|m| m.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_greeting_log_has_no_user_message() {
        let log = ConversationLog::greeting("Hello!");
        assert_eq!(log.len(), 1);
        assert_eq!(log.messages[0].role, Role::Assistant);
        assert!(!log.has_user_message());
    }

    #[test]
    fn test_placeholder_starts_with_one_dot() {
        let mut log = ConversationLog::greeting("hi");
        let id = log.append_assistant_placeholder();
        assert_eq!(log.messages.last().unwrap().id, id);
        assert_eq!(log.messages.last().unwrap().content, PLACEHOLDER_DOT);
    }

    #[test]
    fn test_append_delta_requires_matching_id() {
        let mut log = ConversationLog::greeting("hi");
        let id = log.append_assistant_placeholder();
        assert!(log.replace_content(&id, ""));
        assert!(log.append_delta(&id, "Hel"));
        assert!(log.append_delta(&id, "lo"));
        assert_eq!(log.messages.last().unwrap().content, "Hello");

        // Stale id: the log advanced, nothing may change
        log.append_user("next question");
        assert!(!log.append_delta(&id, "zzz"));
        assert_eq!(log.messages[1].content, "Hello");
    }

    #[test]
    fn test_replace_content_ignores_non_tail_id() {
        let mut log = ConversationLog::greeting("hi");
        let greeting_id = log.messages[0].id.clone();
        log.append_user("question");
        assert!(!log.replace_content(&greeting_id, "overwritten"));
        assert_eq!(log.messages[0].content, "hi");
    }

    #[test]
    fn test_finalize_attaches_table_and_chart() {
        let mut log = ConversationLog::greeting("hi");
        let id = log.append_assistant_placeholder();
        let table = serde_json::json!({"rows": [1, 2]});
        assert!(log.finalize(&id, Some(table.clone()), None));
        let tail = log.messages.last().unwrap();
        assert_eq!(tail.table, Some(table));
        assert!(tail.chart.is_none());
    }

    #[test]
    fn test_order_is_insertion_order() {
        let mut log = ConversationLog::greeting("hi");
        log.append_user("one");
        let id = log.append_assistant_placeholder();
        log.replace_content(&id, "two");
        let contents: Vec<&str> = log.messages.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["hi", "one", "two"]);
    }

    #[test]
    fn test_message_serialization_skips_empty_payloads() {
        let log = ConversationLog::greeting("hi");
        let json = serde_json::to_string(&log.messages[0]).unwrap();
        assert!(!json.contains("table"));
        assert!(!json.contains("chart"));
        assert!(json.contains(r#""role":"assistant""#));
    }
}
