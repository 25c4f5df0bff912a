//! HTTP client for the flight-assistant backend.
//!
//! `stream_run` is the main entry point: it opens the SSE run stream and
//! forwards decoded events over a channel until the stream ends. The rest
//! of the methods are plain request/response JSON calls.

use std::fmt;

use futures::StreamExt;
use log::{debug, info, warn};
use tokio::sync::mpsc::Sender;

use crate::api::types::{ChatReply, ChatRequest, DeleteAck, HistoryResponse};
use crate::stream::{FrameSplitter, RunEvent, decode_event};

/// Errors from backend calls.
/// Variants carry enough info to determine retryability (future use).
#[derive(Debug)]
pub enum ClientError {
    /// Network-level failure (timeout, DNS, connection refused). Retryable.
    Network(String),
    /// Backend returned an error response. Retryable if status >= 500 or 429.
    Api { status: u16, message: String },
    /// Failed to parse the backend's response. Not retryable.
    Parse(String),
    /// The mpsc channel was closed (UI dropped the receiver). Not retryable.
    ChannelClosed,
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Network(msg) => write!(f, "network error: {msg}"),
            ClientError::Api { status, message } => {
                write!(f, "API error (HTTP {status}): {message}")
            }
            ClientError::Parse(msg) => write!(f, "parse error: {msg}"),
            ClientError::ChannelClosed => write!(f, "channel closed"),
        }
    }
}

impl std::error::Error for ClientError {}

pub struct BackendClient {
    base_url: String,
    http: reqwest::Client,
}

impl BackendClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    /// Open the run stream for one prompt and forward each decoded event
    /// over `sender`. Returns when the backend closes the stream.
    ///
    /// Malformed frames are skipped (decode_event logs them); unrecognized
    /// event types come through as `RunEvent::Unknown` so callers can count
    /// them if they care.
    pub async fn stream_run(
        &self,
        prompt: &str,
        user_id: &str,
        session_id: &str,
        sender: &Sender<RunEvent>,
    ) -> Result<(), ClientError> {
        info!(
            "Opening run stream: session={}, prompt_len={}",
            session_id,
            prompt.len()
        );

        let response = self
            .http
            .post(format!("{}/get_data", self.base_url))
            .query(&[
                ("userprompt", prompt),
                ("userId", user_id),
                ("sessionId", session_id),
            ])
            .header("Accept", "text/event-stream")
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        debug!("Run stream response status: {}", response.status());

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let err_body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            warn!("Run stream rejected: {} - {}", status, err_body);
            return Err(ClientError::Api {
                status,
                message: err_body,
            });
        }

        let mut splitter = FrameSplitter::new();
        let mut event_count = 0usize;
        let mut body = response.bytes_stream();

        while let Some(chunk) = body.next().await {
            let chunk = chunk.map_err(|e| ClientError::Network(e.to_string()))?;
            let text = String::from_utf8_lossy(&chunk);
            debug!("Raw chunk received: {} bytes", chunk.len());

            for payload in splitter.push(&text) {
                let Some(event) = decode_event(&payload) else {
                    continue;
                };
                event_count += 1;
                if sender.send(event).await.is_err() {
                    warn!("Event send failed: receiver dropped");
                    return Err(ClientError::ChannelClosed);
                }
            }
        }

        if !splitter.pending().is_empty() {
            debug!(
                "Stream closed with {} bytes of incomplete frame",
                splitter.pending().len()
            );
        }
        info!("Run stream ended: {} events forwarded", event_count);
        Ok(())
    }

    /// Delete a session on the backend. Best effort; the local store is
    /// authoritative either way.
    pub async fn delete_session(
        &self,
        user_id: &str,
        session_id: &str,
    ) -> Result<DeleteAck, ClientError> {
        let response = self
            .http
            .delete(format!("{}/session", self.base_url))
            .query(&[("userId", user_id), ("sessionId", session_id)])
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let err_body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(ClientError::Api {
                status,
                message: err_body,
            });
        }

        response
            .json::<DeleteAck>()
            .await
            .map_err(|e| ClientError::Parse(e.to_string()))
    }

    /// Fetch the backend's view of a session's message history.
    pub async fn fetch_history(&self, session_id: &str) -> Result<HistoryResponse, ClientError> {
        let response = self
            .http
            .get(format!("{}/session/{}/history", self.base_url, session_id))
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let err_body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(ClientError::Api {
                status,
                message: err_body,
            });
        }

        response
            .json::<HistoryResponse>()
            .await
            .map_err(|e| ClientError::Parse(e.to_string()))
    }

    /// Synchronous chat without streaming. Not used by the TUI loop, but
    /// the backend exposes it and it's handy for scripting and debugging.
    pub async fn send_chat(&self, request: &ChatRequest) -> Result<ChatReply, ClientError> {
        let response = self
            .http
            .post(format!("{}/chat", self.base_url))
            .json(request)
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let err_body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(ClientError::Api {
                status,
                message: err_body,
            });
        }

        response
            .json::<ChatReply>()
            .await
            .map_err(|e| ClientError::Parse(e.to_string()))
    }
}
