//! # Run Status
//!
//! Lifecycle status of the in-flight backend run, advanced purely by decoded
//! event type. Exactly one status exists at a time; `label()` is what the
//! status line shows.

use crate::stream::RunEvent;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RunStatus {
    /// Idle; also the terminal state after a finished run.
    #[default]
    Online,
    /// Set locally the instant a user message is sent, before any event.
    Thinking,
    Processing,
    Typing,
    Calling(String),
    ProcessingResults,
    /// Terminal for the current run.
    Error,
}

impl RunStatus {
    /// Human-readable label for the status line.
    pub fn label(&self) -> String {
        match self {
            RunStatus::Online => "online".to_string(),
            RunStatus::Thinking => "thinking...".to_string(),
            RunStatus::Processing => "processing...".to_string(),
            RunStatus::Typing => "typing...".to_string(),
            RunStatus::Calling(tool) => format!("calling {tool}..."),
            RunStatus::ProcessingResults => "processing results...".to_string(),
            RunStatus::Error => "error".to_string(),
        }
    }

    /// Local transition when a user message is submitted (next run begins).
    pub fn begin_run(&mut self) {
        *self = RunStatus::Thinking;
    }

    pub fn reset(&mut self) {
        *self = RunStatus::Online;
    }

    /// Advance on a decoded event. Events with no status meaning
    /// (content deltas, arg deltas, unknown types) leave it unchanged.
    pub fn apply(&mut self, event: &RunEvent) {
        match event {
            RunEvent::RunStarted => *self = RunStatus::Processing,
            RunEvent::TextMessageStart => *self = RunStatus::Typing,
            RunEvent::TextMessageEnd => *self = RunStatus::Online,
            RunEvent::ToolCallStart { tool_call_name, .. } => {
                *self = RunStatus::Calling(tool_call_name.clone());
            }
            RunEvent::ToolCallResult { .. } => *self = RunStatus::ProcessingResults,
            RunEvent::RunFinished { .. } => *self = RunStatus::Online,
            RunEvent::RunError { .. } => *self = RunStatus::Error,
            RunEvent::TextMessageContent { .. }
            | RunEvent::ToolCallArgs { .. }
            | RunEvent::Unknown => {}
        }
    }
}
