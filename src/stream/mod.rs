//! # Stream Layer
//!
//! Turns the raw SSE byte stream into typed [`event::RunEvent`]s:
//! [`frame::FrameSplitter`] reassembles complete `data:` frames across
//! arbitrary chunk boundaries, [`event::decode_event`] parses each payload.

pub mod event;
pub mod frame;

pub use event::{RunEvent, decode_event};
pub use frame::FrameSplitter;
