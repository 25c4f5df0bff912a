//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates keyboard events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Redraw Strategy
//!
//! The event loop uses conditional redraw to avoid unnecessary work:
//!
//! - **Animating** (a run is open): draws every ~80ms so the typing dots
//!   and streaming text stay smooth.
//! - **Idle**: sleeps up to 250ms, only redraws on events or resize.

mod event;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::path::Path;
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use crossterm::execute;

use crate::api::BackendClient;
use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::session;
use crate::core::state::App;
use crate::stream::RunEvent;
use crate::tui::event::{TuiEvent, poll_event_timeout};

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub input_buffer: String,
    pub scroll: u16,
    pub stick_to_bottom: bool,
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            input_buffer: String::new(),
            scroll: 0,
            stick_to_bottom: true,
        }
    }
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,                        // Show cursor for input editing
            SetCursorStyle::SteadyBlock, // Non-blinking: avoids blink timer reset from continuous redraws
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, steady block cursor)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            DisableMouseCapture,
            DisableBracketedPaste,
            Hide // Hide cursor on exit
        );
    }
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let dir = session::data_dir()?;
    let user_id = session::load_or_mint_user_id(&dir)?;
    let sessions = session::load_sessions(&dir);
    info!(
        "Loaded {} session(s) for user {}",
        sessions.len(),
        user_id
    );

    let mut app = App::new(&config, user_id, sessions);
    let mut tui = TuiState::new();
    let client = Arc::new(BackendClient::new(&config.base_url));
    let typing_period = Duration::from_millis(config.typing_period_ms);

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();

    // Abort handles for the open stream (dropped on session switch/delete)
    let mut abort_handles: Vec<tokio::task::AbortHandle> = Vec::new();

    let mut last_tick = Instant::now();
    let mut needs_redraw = true; // Force first frame
    let mut should_quit = false;

    loop {
        // Advance the placeholder dots on the configured period
        if app.typing.is_running() && last_tick.elapsed() >= typing_period {
            last_tick = Instant::now();
            update(&mut app, Action::TypingTick);
            needs_redraw = true;
        }

        if app.is_loading {
            needs_redraw = true;
        }

        if needs_redraw {
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui))?;
            needs_redraw = false;
        }

        // Dynamic poll timeout: short when a run is open, long when idle
        let timeout = if app.is_loading {
            Duration::from_millis(80)
        } else {
            Duration::from_millis(250)
        };

        if let Some(tui_event) = poll_event_timeout(timeout) {
            needs_redraw = true;
            match tui_event {
                TuiEvent::Resize => {}
                TuiEvent::Quit => {
                    let effect = update(&mut app, Action::Quit);
                    should_quit |= handle_effect(
                        effect,
                        &app,
                        &client,
                        &dir,
                        &tx,
                        &mut abort_handles,
                    );
                }
                TuiEvent::Submit => {
                    let text = std::mem::take(&mut tui.input_buffer);
                    let effect = update(&mut app, Action::Submit(text));
                    tui.stick_to_bottom = true;
                    should_quit |= handle_effect(
                        effect,
                        &app,
                        &client,
                        &dir,
                        &tx,
                        &mut abort_handles,
                    );
                }
                TuiEvent::NewSession => {
                    let effect = update(&mut app, Action::NewSession);
                    tui.stick_to_bottom = true;
                    should_quit |= handle_effect(
                        effect,
                        &app,
                        &client,
                        &dir,
                        &tx,
                        &mut abort_handles,
                    );
                }
                TuiEvent::CycleSession => {
                    if let Some(id) = next_session_id(&app) {
                        let effect = update(&mut app, Action::SelectSession(id));
                        tui.stick_to_bottom = true;
                        should_quit |= handle_effect(
                            effect,
                            &app,
                            &client,
                            &dir,
                            &tx,
                            &mut abort_handles,
                        );
                    }
                }
                TuiEvent::DeleteSession => {
                    let id = app.store.active_id().to_string();
                    let effect = update(&mut app, Action::DeleteSession(id));
                    tui.stick_to_bottom = true;
                    should_quit |= handle_effect(
                        effect,
                        &app,
                        &client,
                        &dir,
                        &tx,
                        &mut abort_handles,
                    );
                }
                TuiEvent::ToggleToolCall => {
                    if let Some(last) = app.tool_calls.calls().last() {
                        let id = last.id.clone();
                        update(&mut app, Action::ToggleToolCall(id));
                    }
                }
                TuiEvent::InputChar(c) => tui.input_buffer.push(c),
                TuiEvent::Paste(data) => tui.input_buffer.push_str(&data),
                TuiEvent::Backspace => {
                    tui.input_buffer.pop();
                }
                TuiEvent::ScrollUp => {
                    tui.stick_to_bottom = false;
                    tui.scroll = tui.scroll.saturating_sub(1);
                }
                TuiEvent::ScrollDown => tui.scroll = tui.scroll.saturating_add(1),
                TuiEvent::ScrollPageUp => {
                    tui.stick_to_bottom = false;
                    tui.scroll = tui.scroll.saturating_sub(10);
                }
                TuiEvent::ScrollPageDown => tui.scroll = tui.scroll.saturating_add(10),
                TuiEvent::ScrollToBottom => tui.stick_to_bottom = true,
            }
        }

        // Handle background task actions (streaming events)
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            let effect = update(&mut app, action);
            should_quit |= handle_effect(effect, &app, &client, &dir, &tx, &mut abort_handles);
        }

        if should_quit {
            break;
        }
    }

    // The reducer already archived the active thread on Quit
    if let Err(e) = session::save_sessions(&dir, app.store.sessions()) {
        warn!("Failed to save sessions on exit: {}", e);
    }

    for handle in abort_handles.drain(..) {
        handle.abort();
    }

    ratatui::restore();
    Ok(())
}

/// Perform the I/O an update asked for. Returns true when the app should
/// quit.
fn handle_effect(
    effect: Effect,
    app: &App,
    client: &Arc<BackendClient>,
    dir: &Path,
    tx: &mpsc::Sender<Action>,
    abort_handles: &mut Vec<tokio::task::AbortHandle>,
) -> bool {
    match effect {
        Effect::None => {}
        Effect::Quit => {
            save_store(dir, app);
            return true;
        }
        Effect::SpawnRun { prompt } => {
            *abort_handles = spawn_run(
                client.clone(),
                prompt,
                app.user_id.clone(),
                app.store.active_id().to_string(),
                tx.clone(),
            );
        }
        Effect::SaveStore => save_store(dir, app),
        Effect::SessionSwitched => {
            abort_stream(abort_handles);
            save_store(dir, app);
        }
        Effect::DeleteRemote { session_id } => {
            abort_stream(abort_handles);
            save_store(dir, app);
            spawn_delete(client.clone(), app.user_id.clone(), session_id);
        }
    }
    false
}

fn save_store(dir: &Path, app: &App) {
    if let Err(e) = session::save_sessions(dir, app.store.sessions()) {
        warn!("Failed to save sessions: {}", e);
    }
}

fn abort_stream(abort_handles: &mut Vec<tokio::task::AbortHandle>) {
    for handle in abort_handles.drain(..) {
        handle.abort();
    }
}

/// Next session in the sidebar's recency order, cycling past the end.
fn next_session_id(app: &App) -> Option<String> {
    let listed = app.store.list_by_recency();
    if listed.is_empty() {
        return None;
    }
    let active_id = app.store.active_id();
    match listed.iter().position(|s| s.id == active_id) {
        Some(pos) => Some(listed[(pos + 1) % listed.len()].id.clone()),
        // Active thread isn't persisted yet; jump to the most recent one
        None => Some(listed[0].id.clone()),
    }
}

fn spawn_run(
    client: Arc<BackendClient>,
    prompt: String,
    user_id: String,
    session_id: String,
    tx: mpsc::Sender<Action>,
) -> Vec<tokio::task::AbortHandle> {
    info!("Spawning run: session={}", session_id);

    // Async channel for decoded stream events
    let (event_tx, mut event_rx) = tokio::sync::mpsc::channel::<RunEvent>(100);

    // Spawn the streaming task. Failures are only logged here: dropping
    // event_tx closes the channel, and the forwarder reports the failure
    // exactly once if no terminal event made it through first.
    let stream_handle = tokio::spawn(async move {
        if let Err(e) = client
            .stream_run(&prompt, &user_id, &session_id, &event_tx)
            .await
        {
            info!("Stream error: {}", e);
        }
    });

    // Spawn a task to forward events to the Action channel
    let forward_handle = tokio::spawn(async move {
        let mut forwarded_count = 0usize;
        let mut saw_terminal = false;

        while let Some(event) = event_rx.recv().await {
            forwarded_count += 1;
            if matches!(event, RunEvent::RunFinished { .. } | RunEvent::RunError { .. }) {
                saw_terminal = true;
            }
            if tx.send(Action::Run(event)).is_err() {
                warn!("Failed to forward run event: receiver dropped");
                return;
            }
        }

        info!("Stream channel closed: {} events forwarded", forwarded_count);
        if !saw_terminal
            && tx
                .send(Action::StreamFailed(
                    "stream ended before the run finished".to_string(),
                ))
                .is_err()
        {
            warn!("Failed to send stream failure action: receiver dropped");
        }
    });

    vec![stream_handle.abort_handle(), forward_handle.abort_handle()]
}

/// Best-effort remote deletion. The local store is already updated; a
/// failure here only means the backend keeps stale history.
fn spawn_delete(client: Arc<BackendClient>, user_id: String, session_id: String) {
    tokio::spawn(async move {
        match client.delete_session(&user_id, &session_id).await {
            Ok(ack) => info!("Remote delete ok: {} ({})", ack.session_id, ack.message),
            Err(e) => warn!("Remote delete failed for {}: {}", session_id, e),
        }
    });
}
