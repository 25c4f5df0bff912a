//! # Backend API
//!
//! HTTP access to the flight-assistant backend: the streaming run endpoint
//! plus session deletion, history, and the non-streaming chat fallback.

pub mod client;
pub mod types;

pub use client::{BackendClient, ClientError};
