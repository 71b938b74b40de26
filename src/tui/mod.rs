//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates keyboard events into `core::Action` values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Focus
//!
//! Keys go to the composer by default. Esc moves focus to the session
//! sidebar; Enter, Esc, or typing there hands it back. Ctrl+C, Ctrl+N,
//! Ctrl+Y (copy the latest result as JSON) and scrolling work regardless
//! of focus.
//!
//! ## Redraw Strategy
//!
//! - **Animating** (landing page, an analysis in flight): draws every ~80ms.
//! - **Idle**: sleeps up to 500ms, only redraws on events or resize.
//!
//! ## Analyses
//!
//! `Effect::Analyze` spawns a tokio task running `run_analysis`; its
//! `AnalysisSettled` action comes back over an `mpsc` channel and is
//! applied between frames. Nothing is ever cancelled.

mod clipboard;
mod component;
mod components;
mod event;
mod ui;

use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use log::{debug, info, warn};

use crate::analysis::{AnalysisClient, SentimentAnalyzer};
use crate::core::action::{Action, Effect, run_analysis, update};
use crate::core::config::ResolvedConfig;
use crate::core::session::SessionId;
use crate::core::state::App;
use crate::tui::component::EventHandler;
use crate::tui::components::{
    Composer, ComposerEvent, MessageListState, SessionListEvent, SessionListState,
};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// Which pane receives keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Composer,
    Sessions,
}

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub message_list: MessageListState,
    pub composer: Composer,
    pub session_list: SessionListState,
    pub focus: Focus,
    /// Session whose conversation is on screen; a change resets scrolling
    pub shown_session: Option<SessionId>,
    pub pulse_value: f32,
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            message_list: MessageListState::new(),
            composer: Composer::new(),
            session_list: SessionListState::new(),
            focus: Focus::Composer, // User expects to type immediately
            shown_session: None,
            pulse_value: 0.0,
        }
    }

    /// Copy App-derived props into components.
    pub fn sync_props(&mut self, app: &App) {
        self.composer.disabled = app.active_is_submitting();
        self.composer.dimmed = self.focus == Focus::Sessions;
    }

    fn focus_sessions(&mut self, app: &App) {
        self.focus = Focus::Sessions;
        self.session_list
            .sync(app.store.sessions(), app.store.active_id());
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        // The Kitty keyboard protocol is what lets Shift+Enter be told apart
        // from Enter; terminals that lack it ignore the request.
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, keyboard enhancement)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            PopKeyboardEnhancementFlags,
            DisableMouseCapture,
            DisableBracketedPaste,
            Hide
        );
    }
}

/// Build the HTTP analyzer for a resolved config.
pub fn build_analyzer(config: &ResolvedConfig) -> Arc<dyn SentimentAnalyzer> {
    Arc::new(AnalysisClient::new(
        &config.base_url,
        &config.predict_path,
        &config.health_path,
    ))
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let mut app = App::from_config(build_analyzer(&config), &config);
    let mut tui = TuiState::new();

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = match TerminalModeGuard::new() {
        Ok(guard) => Some(guard),
        Err(e) => {
            warn!("Failed to enable terminal modes: {}", e);
            None
        }
    };

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();

    let start_time = Instant::now();
    let mut needs_redraw = true; // Force first frame

    loop {
        tui.sync_props(&app);

        let showing_landing = app.store.active().is_none_or(|s| s.messages.is_empty());
        let animating = !app.in_flight.is_empty() || showing_landing;
        if animating {
            needs_redraw = true;
        }

        if needs_redraw {
            let elapsed = start_time.elapsed().as_secs_f32();
            tui.pulse_value = (elapsed * 5.0).sin() * 0.5 + 0.5;
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui))?;
            needs_redraw = false;
        }

        let timeout = if animating {
            Duration::from_millis(80)
        } else {
            Duration::from_millis(500)
        };
        let first_event = poll_event_timeout(timeout);

        // Process first event + drain ALL pending events before next draw
        let mut should_quit = false;
        if first_event.is_some() {
            needs_redraw = true;
        }
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            // Earlier events in this batch may have changed what is submitting
            tui.sync_props(&app);

            match event {
                TuiEvent::Resize => {}
                TuiEvent::ForceQuit => should_quit |= dispatch(&mut app, Action::Quit, &tx),
                TuiEvent::NewSession => {
                    should_quit |= dispatch(&mut app, Action::NewSession, &tx);
                    tui.focus = Focus::Composer;
                }
                TuiEvent::CopyResult => {
                    should_quit |= dispatch(&mut app, Action::CopyLastResult, &tx);
                }
                TuiEvent::ScrollUp
                | TuiEvent::ScrollDown
                | TuiEvent::ScrollPageUp
                | TuiEvent::ScrollPageDown => {
                    tui.message_list.handle_event(&event);
                }
                _ => match tui.focus {
                    Focus::Composer => {
                        should_quit |= handle_composer_event(&mut app, &mut tui, &event, &tx)
                    }
                    Focus::Sessions => {
                        should_quit |= handle_sidebar_event(&mut app, &mut tui, &event, &tx)
                    }
                },
            }
        }

        if should_quit {
            break;
        }

        // Apply settled analyses and clipboard failures
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            if dispatch(&mut app, action, &tx) {
                should_quit = true;
            }
        }

        if should_quit {
            break;
        }
    }

    if !app.in_flight.is_empty() {
        info!(
            "Exiting with {} analyses still in flight",
            app.in_flight.len()
        );
    }

    ratatui::restore();
    Ok(())
}

fn handle_composer_event(
    app: &mut App,
    tui: &mut TuiState,
    event: &TuiEvent,
    tx: &mpsc::Sender<Action>,
) -> bool {
    if matches!(event, TuiEvent::Escape) {
        tui.focus_sessions(app);
        return false;
    }

    match tui.composer.handle_event(event) {
        Some(ComposerEvent::Submit(text)) => dispatch(app, Action::Submit(text), tx),
        Some(ComposerEvent::ContentChanged) | None => false,
    }
}

fn handle_sidebar_event(
    app: &mut App,
    tui: &mut TuiState,
    event: &TuiEvent,
    tx: &mpsc::Sender<Action>,
) -> bool {
    let Some(sidebar_event) = tui.session_list.handle_event(event, app.store.sessions()) else {
        return false;
    };

    match sidebar_event {
        SessionListEvent::Select(id) => dispatch(app, Action::SelectSession(id), tx),
        SessionListEvent::CreateNew => {
            tui.focus = Focus::Composer;
            dispatch(app, Action::NewSession, tx)
        }
        SessionListEvent::Delete(id) => {
            let quit = dispatch(app, Action::DeleteSession(id), tx);
            tui.session_list
                .sync(app.store.sessions(), app.store.active_id());
            quit
        }
        SessionListEvent::Dismiss(forwarded) => {
            tui.focus = Focus::Composer;
            tui.sync_props(app);
            match forwarded {
                Some(event) => handle_composer_event(app, tui, &event, tx),
                None => false,
            }
        }
    }
}

/// Run an action through the reducer and perform its effect.
/// Returns true when the app should quit.
fn dispatch(app: &mut App, action: Action, tx: &mpsc::Sender<Action>) -> bool {
    match update(app, action) {
        Effect::None => false,
        Effect::Analyze { session_id, text } => {
            spawn_analysis(app.analyzer.clone(), session_id, text, tx.clone());
            false
        }
        Effect::CopyToClipboard(text) => {
            clipboard::spawn_copy(text, tx.clone());
            false
        }
        Effect::Quit => true,
    }
}

fn spawn_analysis(
    analyzer: Arc<dyn SentimentAnalyzer>,
    session_id: SessionId,
    text: String,
    tx: mpsc::Sender<Action>,
) {
    info!("Spawning analysis for session {}", session_id);
    tokio::spawn(async move {
        let action = run_analysis(analyzer, session_id, text).await;
        if tx.send(action).is_err() {
            warn!(
                "Failed to deliver analysis for session {}: receiver dropped",
                session_id
            );
        }
    });
}
