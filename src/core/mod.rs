//! # Core Application Logic
//!
//! Flightdeck's business logic. It knows nothing about any specific UI
//! technology and does no I/O of its own (persistence helpers in
//! [`session`] are the one exception, and the TUI calls those explicitly).
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • State (app data)     │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    └───────────┬─────────────┘
//!                                │
//!                    ┌───────────┴───────────┐
//!                    ▼                       ▼
//!             ┌────────────┐          ┌────────────┐
//!             │    TUI     │          │    API     │
//!             │  Adapter   │          │  client    │
//!             │ (ratatui)  │          │ (reqwest)  │
//!             └────────────┘          └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: The `App` struct — all application state in one place
//! - [`action`]: The `Action` enum — everything that can happen in the app
//! - [`status`]: Run lifecycle state machine behind the status line
//! - [`conversation`]: The active thread's messages
//! - [`session`]: Session store, recency listing, and disk persistence
//! - [`tools`]: Per-run registry of backend-reported tool calls
//! - [`typing`]: Placeholder dot animation while a reply is pending
//! - [`config`]: Settings with defaults → file → env → CLI resolution

pub mod action;
pub mod config;
pub mod conversation;
pub mod session;
pub mod state;
pub mod status;
pub mod tools;
pub mod typing;
