//! # Stream Frame Splitting
//!
//! The backend streams newline-delimited frames of the form `data: <json>`.
//! Chunks arrive with arbitrary boundaries — a chunk may end mid-frame — so
//! a pending buffer carries the trailing partial line across calls.
//!
//! Guarantee: feeding the same bytes through `push` one byte at a time or in
//! any other grouping yields the identical ordered sequence of payloads.

use log::debug;

/// Prefix marking an event frame. Lines without it are ignored.
pub const DATA_PREFIX: &str = "data: ";

#[derive(Debug, Default)]
pub struct FrameSplitter {
    buffer: String,
}

impl FrameSplitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one raw chunk. Returns the payloads (prefix stripped) of every
    /// frame the chunk completed, in arrival order.
    pub fn push(&mut self, chunk: &str) -> Vec<String> {
        self.buffer.push_str(chunk);

        let mut payloads = Vec::new();
        while let Some(pos) = self.buffer.find('\n') {
            let line = self.buffer[..pos].to_string();
            self.buffer.drain(..=pos);

            let line = line.trim_end_matches('\r');
            if let Some(payload) = line.strip_prefix(DATA_PREFIX) {
                payloads.push(payload.to_string());
            } else if !line.is_empty() {
                debug!("Ignoring non-data line: {}", line);
            }
        }
        payloads
    }

    /// The retained partial line, if any. Discarded at end of stream — a
    /// frame without its terminator never completed.
    pub fn pending(&self) -> &str {
        &self.buffer
    }
}
