//! # Actions
//!
//! Everything that can happen becomes an `Action`. User presses Enter?
//! That's `Action::Submit`. A decoded stream event arrives? That's
//! `Action::Run(event)`.
//!
//! `update()` takes the current state and an action and mutates the state.
//! No I/O happens here — the returned `Effect` tells the shell what to do
//! (open a stream, persist the store, fire a remote delete). Background
//! tasks never touch `App` directly; they only send actions over a channel,
//! so every mutation is serialized through this one function.
//!
//! ```text
//! State + Action  →  update()  →  State' + Effect
//! ```

use log::{debug, info, warn};

use crate::core::session::{NEW_CHAT_TITLE, RemoveOutcome, derive_title};
use crate::core::state::App;
use crate::core::status::RunStatus;
use crate::stream::RunEvent;

/// Shown when the stream fails without a backend-supplied error message.
pub const GENERIC_FAILURE: &str = "Sorry, an error occurred. Please try again.";

#[derive(Debug, Clone)]
pub enum Action {
    /// User submitted a message; starts the next run.
    Submit(String),
    /// A decoded event from the open stream.
    Run(RunEvent),
    /// The stream failed at the transport level (bad status, read error).
    StreamFailed(String),
    /// Periodic dot-animation tick from the shell's timer.
    TypingTick,
    /// Flip the detail view of one tool call (display only).
    ToggleToolCall(String),
    NewSession,
    SelectSession(String),
    DeleteSession(String),
    Quit,
}

/// I/O the shell must perform after an update.
#[derive(Debug, PartialEq)]
pub enum Effect {
    None,
    Quit,
    /// Open the run stream for this prompt.
    SpawnRun { prompt: String },
    /// Persist the session store.
    SaveStore,
    /// The active thread changed: abort any open stream, then persist.
    SessionSwitched,
    /// A session was removed locally: abort if needed, persist, and issue
    /// the best-effort remote deletion.
    DeleteRemote { session_id: String },
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::Submit(text) => submit(app, &text),
        Action::Run(event) => apply_run_event(app, event),
        Action::StreamFailed(reason) => {
            warn!("Stream failed: {}", reason);
            fail_run(app, GENERIC_FAILURE)
        }
        Action::TypingTick => {
            if let Some(frame) = app.typing.tick()
                && let Some(id) = app.in_flight.clone()
            {
                app.log.replace_content(&id, &frame);
            }
            Effect::None
        }
        Action::ToggleToolCall(id) => {
            app.tool_calls.toggle_expanded(&id);
            Effect::None
        }
        Action::NewSession => {
            if app.is_loading {
                // Abandoning a thread mid-run abandons its stream too
                info!("New session requested mid-run; aborting stream");
            }
            app.start_fresh();
            Effect::SessionSwitched
        }
        Action::SelectSession(id) => select_session(app, &id),
        Action::DeleteSession(id) => delete_session(app, &id),
        Action::Quit => {
            app.sync_store();
            Effect::Quit
        }
    }
}

fn submit(app: &mut App, text: &str) -> Effect {
    let prompt = text.trim().to_string();
    if prompt.is_empty() || app.is_loading {
        return Effect::None;
    }

    app.log.append_user(&prompt);
    if app.session_title == NEW_CHAT_TITLE {
        app.session_title = derive_title(&prompt);
    }

    // Per-run state starts clean for each user-initiated run
    app.tool_calls.clear();
    app.status.begin_run();
    app.typing.start();
    app.in_flight = Some(app.log.append_assistant_placeholder());
    app.is_loading = true;
    app.sync_store();

    Effect::SpawnRun { prompt }
}

fn apply_run_event(app: &mut App, event: RunEvent) -> Effect {
    // Stragglers from an aborted stream can still be queued after a session
    // switch or after the run terminated; they must not touch fresh state.
    if !app.is_loading {
        debug!("Dropping run event with no run open: {:?}", event);
        return Effect::None;
    }

    app.status.apply(&event);

    match event {
        RunEvent::TextMessageContent { delta } => {
            if let Some(id) = app.in_flight.clone() {
                // First real content: the dots stop exactly once, and the
                // placeholder is cleared immediately before the delta lands.
                if app.typing.stop() {
                    app.log.replace_content(&id, "");
                }
                app.log.append_delta(&id, &delta);
            }
            Effect::None
        }
        RunEvent::ToolCallStart {
            tool_call_id,
            tool_call_name,
        } => {
            app.tool_calls.start(&tool_call_id, &tool_call_name);
            Effect::None
        }
        RunEvent::ToolCallArgs {
            tool_call_id,
            delta,
        } => {
            app.tool_calls.append_args(&tool_call_id, &delta);
            Effect::None
        }
        RunEvent::ToolCallResult {
            tool_call_id,
            content,
        } => {
            app.tool_calls.set_result(&tool_call_id, &content);
            Effect::None
        }
        RunEvent::RunFinished { table, chart } => {
            app.typing.stop();
            app.is_loading = false;
            if let Some(id) = app.in_flight.take() {
                app.log.finalize(&id, table, chart);
            }
            app.sync_store();
            Effect::SaveStore
        }
        RunEvent::RunError { message } => {
            warn!("Run error from backend: {}", message);
            app.typing.stop();
            app.is_loading = false;
            let notice = format!("Error: {message}");
            if let Some(id) = app.in_flight.take() {
                app.log.replace_content(&id, &notice);
            } else {
                app.log.append_assistant(&notice);
            }
            app.sync_store();
            Effect::SaveStore
        }
        RunEvent::RunStarted
        | RunEvent::TextMessageStart
        | RunEvent::TextMessageEnd
        | RunEvent::Unknown => Effect::None,
    }
}

/// Transport-level failure: stop the animation, turn whichever message is
/// in flight into a notice (or append one), and leave the UI usable.
fn fail_run(app: &mut App, notice: &str) -> Effect {
    app.typing.stop();
    app.is_loading = false;
    app.status = RunStatus::Error;
    if let Some(id) = app.in_flight.take() {
        app.log.replace_content(&id, notice);
    } else {
        app.log.append_assistant(notice);
    }
    app.sync_store();
    Effect::SaveStore
}

fn select_session(app: &mut App, id: &str) -> Effect {
    if id == app.store.active_id() {
        return Effect::None;
    }
    app.sync_store();
    match app.store.select(id) {
        Some(session) => {
            app.activate(session);
            Effect::SessionSwitched
        }
        None => {
            warn!("Select of unknown session id: {}", id);
            Effect::None
        }
    }
}

fn delete_session(app: &mut App, id: &str) -> Effect {
    // Make sure the active thread is in the store before removal, so
    // deleting a background session can't drop unsaved work.
    app.sync_store();
    let greeting = app.greeting.clone();
    match app.store.remove(id, &greeting) {
        RemoveOutcome::SwitchedTo(next) | RemoveOutcome::Fresh(next) => {
            app.activate(next);
            Effect::DeleteRemote {
                session_id: id.to_string(),
            }
        }
        RemoveOutcome::Unchanged => Effect::DeleteRemote {
            session_id: id.to_string(),
        },
        RemoveOutcome::NotFound => {
            warn!("Delete of unknown session id: {}", id);
            Effect::None
        }
    }
}
