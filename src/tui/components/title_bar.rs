//! # TitleBar Component
//!
//! Top status bar: endpoint, session count, and the latest status message.
//!
//! Stateless. All three props are copied from `App` each frame:
//!
//! ```text
//! Senti (endpoint: http://localhost:3000) | 2 sessions | Positive (92.0%)
//! ```
//!
//! The status part is dropped when empty so narrow terminals keep the
//! endpoint visible.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::tui::component::Component;

pub struct TitleBar {
    /// Where predictions are sent (analyzer name)
    pub endpoint: String,
    pub session_count: usize,
    pub status_message: String,
}

impl TitleBar {
    pub fn new(endpoint: String, session_count: usize, status_message: String) -> Self {
        Self {
            endpoint,
            session_count,
            status_message,
        }
    }

    fn text(&self) -> String {
        let sessions = match self.session_count {
            1 => "1 session".to_string(),
            n => format!("{n} sessions"),
        };
        if self.status_message.is_empty() {
            format!("Senti (endpoint: {}) | {}", self.endpoint, sessions)
        } else {
            format!(
                "Senti (endpoint: {}) | {} | {}",
                self.endpoint, sessions, self.status_message
            )
        }
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let line = Line::from(Span::styled(self.text(), Style::default().fg(Color::Gray)));
        frame.render_widget(line, area);
    }
}
