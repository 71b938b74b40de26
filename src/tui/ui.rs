use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};

use crate::core::state::App;
use crate::tui::component::Component;
use crate::tui::components::{
    LandingPage, MessageList, MessageListState, SessionList, TitleBar,
};
use crate::tui::{Focus, TuiState};

/// Sidebar width, shrunk on narrow terminals.
const SIDEBAR_WIDTH: u16 = 32;

/// ```text
/// ┌ title bar ─────────────────────────────────────┐
/// ├ sessions ─┬ conversation / landing ────────────┤
/// │           │                                    │
/// │           ├ composer ──────────────────────────┤
/// └───────────┴────────────────────────────────────┘
/// ```
pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState) {
    use Constraint::{Length, Min};

    let [title_area, body_area] = Layout::vertical([Length(1), Min(0)]).areas(frame.area());

    TitleBar::new(
        app.analyzer.name().to_string(),
        app.store.len(),
        app.status_message.clone(),
    )
    .render(frame, title_area);

    let sidebar_width = SIDEBAR_WIDTH.min(body_area.width / 3);
    let [sidebar_area, main_area] =
        Layout::horizontal([Length(sidebar_width), Min(0)]).areas(body_area);

    SessionList {
        state: &mut tui.session_list,
        sessions: app.store.sessions(),
        active: app.store.active_id(),
        in_flight: &app.in_flight,
        focused: tui.focus == Focus::Sessions,
    }
    .render(frame, sidebar_area);

    let composer_height = tui.composer.calculate_height(main_area.width);
    let [conversation_area, composer_area] =
        Layout::vertical([Min(0), Length(composer_height)]).areas(main_area);

    match app.store.active() {
        Some(session) if !session.messages.is_empty() => {
            // Switching sessions starts the new one pinned to its newest message
            if tui.shown_session != Some(session.id) {
                tui.message_list = MessageListState::new();
                tui.shown_session = Some(session.id);
            }
            MessageList {
                state: &mut tui.message_list,
                session_id: session.id,
                messages: &session.messages,
                pending: app.is_submitting(session.id),
                pulse_value: tui.pulse_value,
            }
            .render(frame, conversation_area);
        }
        _ => {
            tui.shown_session = None;
            LandingPage::new(tui.pulse_value).render(frame, conversation_area);
        }
    }

    tui.composer.render(frame, composer_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::action::{Action, update};
    use crate::test_support::test_app;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn draw(app: &App, tui: &mut TuiState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| draw_ui(f, app, tui)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_empty_app_shows_landing() {
        let app = test_app();
        let mut tui = TuiState::new();
        let text = draw(&app, &mut tui);
        assert!(text.contains("Welcome to Sentiment Analysis"));
        assert!(text.contains("No sessions yet."));
        assert!(text.contains("0 sessions"));
    }

    #[test]
    fn test_submitting_session_shows_placeholder_and_disabled_composer() {
        let mut app = test_app();
        update(&mut app, Action::Submit("I love this product!".into()));
        let mut tui = TuiState::new();
        tui.sync_props(&app);

        let text = draw(&app, &mut tui);
        assert!(text.contains("I love this product!"));
        assert!(text.contains("Analyzing sentiment..."));
        assert!(text.contains("Analyzing..."));
        assert!(!text.contains("Welcome to Sentiment Analysis"));
    }

    #[test]
    fn test_switching_sessions_resets_scroll() {
        let mut app = test_app();
        update(&mut app, Action::Submit("first".into()));
        let first = app.store.active_id().unwrap();
        let mut tui = TuiState::new();
        draw(&app, &mut tui);
        assert_eq!(tui.shown_session, Some(first));

        tui.message_list.stick_to_bottom = false;
        update(&mut app, Action::NewSession);
        draw(&app, &mut tui);
        assert_eq!(tui.shown_session, None);

        update(&mut app, Action::SelectSession(first));
        draw(&app, &mut tui);
        assert!(tui.message_list.stick_to_bottom);
    }
}
