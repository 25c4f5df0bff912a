//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use crate::core::action::{Action, update};
use crate::core::config::ResolvedConfig;
use crate::core::state::App;
use crate::stream::RunEvent;

pub fn test_config() -> ResolvedConfig {
    ResolvedConfig {
        base_url: "http://127.0.0.1:8001".to_string(),
        greeting: "Hello! I'm your flight assistant. How can I help?".to_string(),
        typing_period_ms: 350,
    }
}

/// Creates a test App with no persisted sessions.
pub fn test_app() -> App {
    App::new(&test_config(), "test-user".to_string(), Vec::new())
}

/// Feed a sequence of decoded stream events through the reducer.
pub fn run_events<I>(app: &mut App, events: I)
where
    I: IntoIterator<Item = RunEvent>,
{
    for event in events {
        update(app, Action::Run(event));
    }
}
