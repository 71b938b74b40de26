//! # Landing Page Component
//!
//! Welcome screen shown in the conversation pane when the active session
//! has no messages (or no session exists yet).

use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::component::Component;

/// What the welcome screen suggests analyzing.
const USE_CASES: [(&str, &str); 3] = [
    ("Social Media", "Analyze tweets, posts, and comments"),
    ("Reviews", "Understand customer feedback"),
    ("Any Text", "Articles, messages, and documents"),
];

pub struct LandingPage {
    /// Pulse (0.0 to 1.0) driving the heading emphasis
    pub pulse_value: f32,
}

impl LandingPage {
    pub fn new(pulse_value: f32) -> Self {
        Self { pulse_value }
    }

    fn lines(&self) -> Vec<Line<'static>> {
        let mut heading = Style::default().fg(Color::Yellow);
        if self.pulse_value > 0.5 {
            heading = heading.add_modifier(Modifier::BOLD);
        }

        let mut lines = vec![
            Line::styled("Welcome to Sentiment Analysis", heading),
            Line::styled(
                "Enter any text below to discover its emotional tone.",
                Style::default().fg(Color::Gray),
            ),
            Line::raw(""),
        ];
        lines.extend(USE_CASES.iter().map(|(name, description)| {
            Line::from(vec![
                Span::styled(
                    format!("{name}: "),
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                ),
                Span::styled(*description, Style::default().fg(Color::Gray)),
            ])
        }));
        lines.push(Line::raw(""));
        lines.push(Line::styled(
            format!("Senti v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::DarkGray),
        ));
        lines
    }
}

impl Component for LandingPage {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let lines = self.lines();
        let [text_area] = Layout::vertical([Constraint::Length(lines.len() as u16)])
            .flex(Flex::Center)
            .areas(area);

        frame.render_widget(Paragraph::new(lines).centered(), text_area);
    }
}
