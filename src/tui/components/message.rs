use chrono::Local;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph, Widget, Wrap};

use crate::analysis::{AnalysisResult, Sentiment, format_percent};
use crate::core::message::{Message, Payload, Role};

/// Horizontal padding (per side) between the border and text content.
const CONTENT_PAD_H: u16 = 1;
/// Total horizontal space consumed by borders (1 left + 1 right) and padding.
const HORIZONTAL_OVERHEAD: u16 = 2 + CONTENT_PAD_H * 2;
/// Total vertical space consumed by borders (1 top + 1 bottom).
const VERTICAL_OVERHEAD: u16 = 2;

/// Pulse intensity above which the pending card's border turns BOLD.
const PULSE_BOLD_THRESHOLD: f32 = 0.6;

pub const PENDING_TEXT: &str = "Analyzing sentiment...";

pub fn sentiment_color(sentiment: Sentiment) -> Color {
    match sentiment {
        Sentiment::Positive => Color::Green,
        Sentiment::Negative => Color::Red,
        Sentiment::Neutral => Color::Blue,
    }
}

fn sentiment_glyph(sentiment: Sentiment) -> &'static str {
    match sentiment {
        Sentiment::Positive => "▲",
        Sentiment::Negative => "▼",
        Sentiment::Neutral => "●",
    }
}

/// A single conversation entry: the user's text, an analysis card, or an
/// error card.
///
/// Transient: built each frame by `MessageList` for the visible messages.
#[derive(Clone, Copy)]
pub struct MessageCard<'a> {
    pub message: &'a Message,
}

impl<'a> MessageCard<'a> {
    pub fn new(message: &'a Message) -> Self {
        Self { message }
    }

    /// Rendered height at `width`, predicted with `textwrap` so the list can
    /// lay out its scroll canvas before anything is drawn.
    pub fn calculate_height(message: &Message, width: u16) -> u16 {
        let content_width = width.saturating_sub(HORIZONTAL_OVERHEAD);
        if content_width == 0 {
            return 1;
        }

        let options = textwrap::Options::new(content_width as usize)
            .break_words(true)
            .word_separator(textwrap::WordSeparator::AsciiSpace);

        let content_lines: usize = body_lines(message)
            .iter()
            .map(|line| {
                let plain: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
                textwrap::wrap(&plain, &options).len().max(1)
            })
            .sum();

        u16::try_from(content_lines.max(1))
            .unwrap_or(u16::MAX)
            .saturating_add(VERTICAL_OVERHEAD)
    }

    fn title(&self) -> String {
        let time = self.message.timestamp.with_timezone(&Local).format("%H:%M");
        match (&self.message.role, &self.message.payload) {
            (Role::User, _) => format!(" You · {time} "),
            (Role::Assistant, Payload::Error(_)) => format!(" Analysis Failed · {time} "),
            (Role::Assistant, _) => format!(" AI Analysis · {time} "),
        }
    }

    fn border_style(&self) -> Style {
        match &self.message.payload {
            Payload::Result(result) => Style::default().fg(sentiment_color(result.sentiment)),
            Payload::Error(_) => Style::default().fg(Color::Red),
            Payload::Text(_) => Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::DIM),
        }
    }
}

/// Body lines of a card, before wrapping.
fn body_lines(message: &Message) -> Vec<Line<'static>> {
    match &message.payload {
        Payload::Text(text) => text
            .trim_end()
            .lines()
            .map(|l| Line::raw(l.to_string()))
            .collect(),
        Payload::Result(result) => result_lines(result),
        Payload::Error(error) => vec![Line::styled(
            error.message.clone(),
            Style::default().fg(Color::Red),
        )],
    }
}

fn result_lines(result: &AnalysisResult) -> Vec<Line<'static>> {
    let color = sentiment_color(result.sentiment);
    let score = |sentiment: Sentiment| {
        Span::styled(
            format!(
                "{} {}",
                sentiment.label(),
                format_percent(result.scores.get(sentiment))
            ),
            Style::default().fg(sentiment_color(sentiment)),
        )
    };

    let mut lines = vec![
        Line::from(vec![
            Span::styled(
                format!("{} ", sentiment_glyph(result.sentiment)),
                Style::default().fg(color),
            ),
            Span::styled(
                result.headline(),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            score(Sentiment::Positive),
            Span::raw("  "),
            score(Sentiment::Neutral),
            Span::raw("  "),
            score(Sentiment::Negative),
        ]),
        Line::styled(result.emotions_line(), Style::default().fg(Color::Gray)),
    ];
    if let Some(words) = result.word_line() {
        lines.push(Line::styled(words, Style::default().fg(Color::DarkGray)));
    }
    lines
}

impl<'a> Widget for MessageCard<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = self.border_style();
        let block = Block::bordered()
            .title(self.title())
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title_style(border_style)
            .padding(Padding::horizontal(CONTENT_PAD_H));

        let inner_area = block.inner(area);
        block.render(area, buf);

        Paragraph::new(body_lines(self.message))
            .wrap(Wrap { trim: true })
            .render(inner_area, buf);
    }
}

/// Placeholder shown below the last message while its session is submitting.
pub struct PendingCard {
    pub pulse_intensity: f32,
}

impl PendingCard {
    pub const HEIGHT: u16 = 1 + VERTICAL_OVERHEAD;
}

impl Widget for PendingCard {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let emphasis = if self.pulse_intensity > PULSE_BOLD_THRESHOLD {
            Modifier::BOLD
        } else {
            Modifier::DIM
        };
        let border_style = Style::default().fg(Color::Yellow).add_modifier(emphasis);

        let block = Block::bordered()
            .title(" AI Analysis ")
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .padding(Padding::horizontal(CONTENT_PAD_H));

        Paragraph::new(PENDING_TEXT)
            .style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::ITALIC),
            )
            .block(block)
            .render(area, buf);
    }
}
