//! # Run Event Decoding
//!
//! Each frame payload is a JSON object with a `type` discriminator. A
//! malformed payload is dropped with a warning — one bad frame must not
//! abort the run. Unknown `type` values decode to [`RunEvent::Unknown`] so
//! future backend events pass through harmlessly.

use log::warn;
use serde::Deserialize;
use serde_json::Value;

/// A decoded streaming event describing run progress.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type")]
pub enum RunEvent {
    #[serde(rename = "RUN_STARTED")]
    RunStarted,
    #[serde(rename = "TEXT_MESSAGE_START")]
    TextMessageStart,
    #[serde(rename = "TEXT_MESSAGE_CONTENT")]
    TextMessageContent { delta: String },
    #[serde(rename = "TEXT_MESSAGE_END")]
    TextMessageEnd,
    #[serde(rename = "TOOL_CALL_START")]
    ToolCallStart {
        #[serde(rename = "toolCallId")]
        tool_call_id: String,
        #[serde(rename = "toolCallName")]
        tool_call_name: String,
    },
    #[serde(rename = "TOOL_CALL_ARGS")]
    ToolCallArgs {
        #[serde(rename = "toolCallId")]
        tool_call_id: String,
        delta: String,
    },
    #[serde(rename = "TOOL_CALL_RESULT")]
    ToolCallResult {
        #[serde(rename = "toolCallId")]
        tool_call_id: String,
        content: String,
    },
    #[serde(rename = "RUN_FINISHED")]
    RunFinished {
        #[serde(default)]
        table: Option<Value>,
        #[serde(default)]
        chart: Option<Value>,
    },
    #[serde(rename = "RUN_ERROR")]
    RunError { message: String },
    /// Forward compatibility: an event type this client does not know yet.
    #[serde(other)]
    Unknown,
}

/// Decode one frame payload. Returns `None` (and logs) on malformed input.
pub fn decode_event(payload: &str) -> Option<RunEvent> {
    match serde_json::from_str::<RunEvent>(payload) {
        Ok(event) => Some(event),
        Err(e) => {
            warn!("Dropping malformed event frame: {} ({})", e, payload);
            None
        }
    }
}
