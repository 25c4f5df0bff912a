//! Wire types for the backend's non-streaming endpoints.
//!
//! The streaming run protocol has its own types in `crate::stream`; these
//! cover session deletion, history retrieval, and the synchronous chat
//! fallback.

use serde::{Deserialize, Serialize};

/// Response body of `DELETE /session`.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct DeleteAck {
    pub message: String,
    pub session_id: String,
}

/// One message as the backend stores it.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct HistoryMessage {
    pub role: String,
    pub content: String,
}

/// Response body of `GET /session/{id}/history`.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct HistoryResponse {
    pub session_id: String,
    pub messages: Vec<HistoryMessage>,
    pub count: usize,
}

/// Request body of `POST /chat` (synchronous, non-streaming).
#[derive(Serialize, Debug, Clone)]
pub struct ChatRequest {
    pub session_id: String,
    pub message: String,
}

/// Response body of `POST /chat`.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ChatReply {
    pub reply: String,
    pub session_id: String,
    pub message_count: usize,
}
