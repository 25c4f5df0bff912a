//! # Tool Call Registry
//!
//! Tool invocations the backend reports during a run, built incrementally
//! from START / ARGS / RESULT events. Entries are keyed by the backend-
//! supplied id and kept in arrival order for display. The registry is
//! cleared at the start of each user-initiated run, so ids never leak
//! across runs.
//!
//! Argument deltas carry no sequence number; the backend is assumed to send
//! them in order. Deltas for ids that never started are dropped and logged.

use log::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolCallStatus {
    Calling,
    Completed,
}

#[derive(Debug, Clone)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    /// JSON-shaped text, accumulated from deltas.
    pub args: String,
    pub result: String,
    pub status: ToolCallStatus,
    /// Display-only flag; no bearing on correctness.
    pub expanded: bool,
}

impl ToolCall {
    fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            args: String::new(),
            result: String::new(),
            status: ToolCallStatus::Calling,
            expanded: false,
        }
    }

    /// Pretty-printed args when they parse as JSON, verbatim otherwise.
    pub fn display_args(&self) -> String {
        pretty_json(&self.args).unwrap_or_else(|| self.args.clone())
    }

    pub fn display_result(&self) -> String {
        pretty_json(&self.result).unwrap_or_else(|| self.result.clone())
    }
}

/// Re-serialize `text` with indentation if it parses as JSON.
pub fn pretty_json(text: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(text).ok()?;
    serde_json::to_string_pretty(&value).ok()
}

#[derive(Debug, Default)]
pub struct ToolCallRegistry {
    calls: Vec<ToolCall>,
}

impl ToolCallRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a starting tool call. A duplicate START for a known id
    /// resets its args and status instead of inserting twice.
    pub fn start(&mut self, id: &str, name: &str) {
        match self.get_mut(id) {
            Some(tc) => {
                tc.args.clear();
                tc.status = ToolCallStatus::Calling;
            }
            None => self.calls.push(ToolCall::new(id, name)),
        }
    }

    /// Append an argument fragment. Unknown ids are ignored.
    pub fn append_args(&mut self, id: &str, delta: &str) {
        match self.get_mut(id) {
            Some(tc) => tc.args.push_str(delta),
            None => warn!("Argument delta for unknown tool call id: {}", id),
        }
    }

    /// Record the result and mark the call completed.
    pub fn set_result(&mut self, id: &str, content: &str) {
        match self.get_mut(id) {
            Some(tc) => {
                tc.result = content.to_string();
                tc.status = ToolCallStatus::Completed;
            }
            None => warn!("Result for unknown tool call id: {}", id),
        }
    }

    /// Flip the display flag for one entry. UI-only.
    pub fn toggle_expanded(&mut self, id: &str) {
        if let Some(tc) = self.get_mut(id) {
            tc.expanded = !tc.expanded;
        }
    }

    /// Drop everything. Called at the start of each new run.
    pub fn clear(&mut self) {
        self.calls.clear();
    }

    pub fn get(&self, id: &str) -> Option<&ToolCall> {
        self.calls.iter().find(|tc| tc.id == id)
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut ToolCall> {
        self.calls.iter_mut().find(|tc| tc.id == id)
    }

    pub fn calls(&self) -> &[ToolCall] {
        &self.calls
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }
}
