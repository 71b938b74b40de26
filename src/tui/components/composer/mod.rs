//! # Composer Component
//!
//! Multi-line text entry for the text to analyze.
//!
//! ## Responsibilities
//!
//! - Capture text input (typing, paste, Shift+Enter newlines)
//! - Handle editing (backspace, delete, cursor movement)
//! - Emit `Submit` on Enter when the draft is non-blank
//! - Refuse all input while `disabled` (the active session is submitting)
//!
//! The draft and cursor are internal state. `disabled` and `dimmed` are
//! props synced from the application and TUI state before every frame.

mod layout;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Padding, Paragraph};

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

use layout::{
    MAX_VISIBLE_LINES, TEXT_OFFSET_X, TEXT_OFFSET_Y, VERTICAL_OVERHEAD, cursor_cell, inner_width,
    line_count, next_char_boundary, prev_char_boundary, wrap,
};

const PLACEHOLDER: &str = "Enter text to analyze sentiment...";

/// High-level events emitted by the Composer
#[derive(Debug, Clone, PartialEq)]
pub enum ComposerEvent {
    /// Draft submitted; the composer has already cleared itself.
    Submit(String),
    ContentChanged,
}

pub struct Composer {
    /// Draft text (Internal State)
    pub buffer: String,
    /// True while the active session is submitting (Prop)
    pub disabled: bool,
    /// True while another pane has focus (Prop)
    pub dimmed: bool,
    /// Cursor as a byte offset into `buffer`
    cursor: usize,
    /// First wrapped line shown when the draft is taller than the viewport
    scroll_offset: u16,
    /// Outer width seen at the last render, used for vertical movement
    last_width: u16,
}

impl Default for Composer {
    fn default() -> Self {
        Self::new()
    }
}

impl Composer {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            disabled: false,
            dimmed: false,
            cursor: 0,
            scroll_offset: 0,
            last_width: 80,
        }
    }

    /// Height needed for the current draft, between one and
    /// `MAX_VISIBLE_LINES` lines of text plus borders.
    pub fn calculate_height(&self, width: u16) -> u16 {
        line_count(&self.buffer, inner_width(width)).clamp(1, MAX_VISIBLE_LINES)
            + VERTICAL_OVERHEAD
    }

    fn insert(&mut self, text: &str) -> Option<ComposerEvent> {
        self.buffer.insert_str(self.cursor, text);
        self.cursor += text.len();
        Some(ComposerEvent::ContentChanged)
    }

    fn move_to(&mut self, pos: usize) -> Option<ComposerEvent> {
        (pos != self.cursor).then(|| {
            self.cursor = pos;
            ComposerEvent::ContentChanged
        })
    }

    /// Move one wrapped line up (`-1`) or down (`1`), keeping the column
    /// where the target line is long enough.
    fn move_vertically(&mut self, direction: i32) -> Option<ComposerEvent> {
        let width = inner_width(self.last_width);
        let (row, col) = cursor_cell(&self.buffer, self.cursor, width);
        let target = row as i32 + direction;
        if target < 0 || target >= line_count(&self.buffer, width) as i32 {
            return None;
        }
        let target = target as u16;

        // Walk char boundaries to the last position on the target row whose
        // column does not pass the current one.
        let mut best = None;
        let boundaries = self
            .buffer
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(self.buffer.len()));
        for pos in boundaries {
            let (r, c) = cursor_cell(&self.buffer, pos, width);
            if r == target && c <= col {
                best = Some(pos);
            } else if r > target {
                break;
            }
        }
        best.and_then(|pos| self.move_to(pos))
    }

    fn keep_cursor_visible(&mut self, width: u16) {
        let (row, _) = cursor_cell(&self.buffer, self.cursor, width);
        if line_count(&self.buffer, width) <= MAX_VISIBLE_LINES {
            self.scroll_offset = 0;
        } else if row < self.scroll_offset {
            self.scroll_offset = row;
        } else if row >= self.scroll_offset + MAX_VISIBLE_LINES {
            self.scroll_offset = row + 1 - MAX_VISIBLE_LINES;
        }
    }
}

impl Component for Composer {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        self.last_width = area.width;
        let width = inner_width(area.width);
        self.keep_cursor_visible(width);

        let (title, border_style) = if self.disabled {
            (" Analyzing... ", Style::default().fg(Color::DarkGray))
        } else if self.dimmed {
            (" Analyze ", Style::default().fg(Color::DarkGray))
        } else {
            (
                " Analyze (Enter to send, Shift+Enter for newline) ",
                Style::default().fg(Color::Green),
            )
        };
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title(title)
            .padding(Padding::horizontal(1));

        let paragraph = if self.buffer.is_empty() {
            Paragraph::new(PLACEHOLDER).style(
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            )
        } else {
            let lines: Vec<Line> = wrap(&self.buffer, width)
                .into_iter()
                .skip(self.scroll_offset as usize)
                .take(MAX_VISIBLE_LINES as usize)
                .map(|l| Line::raw(l.into_owned()))
                .collect();
            let style = if self.disabled {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default()
            };
            Paragraph::new(lines).style(style)
        };
        frame.render_widget(paragraph.block(block), area);

        if !self.disabled && !self.dimmed {
            let (row, col) = cursor_cell(&self.buffer, self.cursor, width);
            let visible_row = row.saturating_sub(self.scroll_offset);
            frame.set_cursor_position((
                area.x + TEXT_OFFSET_X + col,
                area.y + TEXT_OFFSET_Y + visible_row,
            ));
        }
    }
}

impl EventHandler for Composer {
    type Event = ComposerEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        if self.disabled {
            return None;
        }

        match event {
            TuiEvent::InputChar(c) => {
                let mut utf8 = [0; 4];
                self.insert(c.encode_utf8(&mut utf8))
            }
            TuiEvent::Paste(text) => {
                // Terminals deliver pasted line breaks as CR
                let text = text.replace("\r\n", "\n").replace('\r', "\n");
                self.insert(&text)
            }
            TuiEvent::Backspace => {
                if self.cursor == 0 {
                    return None;
                }
                let prev = prev_char_boundary(&self.buffer, self.cursor);
                self.buffer.drain(prev..self.cursor);
                self.cursor = prev;
                Some(ComposerEvent::ContentChanged)
            }
            TuiEvent::Delete => {
                if self.cursor >= self.buffer.len() {
                    return None;
                }
                let next = next_char_boundary(&self.buffer, self.cursor);
                self.buffer.drain(self.cursor..next);
                Some(ComposerEvent::ContentChanged)
            }
            TuiEvent::CursorLeft => self.move_to(prev_char_boundary(&self.buffer, self.cursor)),
            TuiEvent::CursorRight => self.move_to(next_char_boundary(&self.buffer, self.cursor)),
            TuiEvent::CursorHome => {
                let start = self.buffer[..self.cursor]
                    .rfind('\n')
                    .map(|i| i + 1)
                    .unwrap_or(0);
                self.move_to(start)
            }
            TuiEvent::CursorEnd => {
                let end = self.buffer[self.cursor..]
                    .find('\n')
                    .map(|i| self.cursor + i)
                    .unwrap_or(self.buffer.len());
                self.move_to(end)
            }
            TuiEvent::CursorUp => self.move_vertically(-1),
            TuiEvent::CursorDown => self.move_vertically(1),
            TuiEvent::Submit => {
                if self.buffer.trim().is_empty() {
                    return None;
                }
                let text = std::mem::take(&mut self.buffer);
                self.cursor = 0;
                self.scroll_offset = 0;
                Some(ComposerEvent::Submit(text))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn typed(text: &str) -> Composer {
        let mut composer = Composer::new();
        for c in text.chars() {
            composer.handle_event(&TuiEvent::InputChar(c));
        }
        composer
    }

    fn render_text(composer: &mut Composer, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| composer.render(f, f.area())).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_typing_and_backspace() {
        let mut composer = typed("ab");
        assert_eq!(composer.buffer, "ab");

        let res = composer.handle_event(&TuiEvent::Backspace);
        assert_eq!(res, Some(ComposerEvent::ContentChanged));
        assert_eq!(composer.buffer, "a");
    }

    #[test]
    fn test_submit_clears_draft() {
        let mut composer = typed("I love this product!");
        match composer.handle_event(&TuiEvent::Submit) {
            Some(ComposerEvent::Submit(text)) => assert_eq!(text, "I love this product!"),
            other => panic!("Expected Submit, got {:?}", other),
        }
        assert!(composer.buffer.is_empty());
        assert_eq!(
            composer.handle_event(&TuiEvent::Backspace),
            None,
            "cursor should be back at the start"
        );
    }

    #[test]
    fn test_blank_draft_is_not_submitted() {
        let mut composer = typed("  \n ");
        assert_eq!(composer.handle_event(&TuiEvent::Submit), None);
        assert_eq!(composer.buffer, "  \n ");
    }

    #[test]
    fn test_disabled_composer_ignores_input() {
        let mut composer = typed("pending");
        composer.disabled = true;

        assert_eq!(composer.handle_event(&TuiEvent::Submit), None);
        assert_eq!(composer.handle_event(&TuiEvent::InputChar('x')), None);
        assert_eq!(composer.buffer, "pending");

        composer.disabled = false;
        assert!(matches!(
            composer.handle_event(&TuiEvent::Submit),
            Some(ComposerEvent::Submit(_))
        ));
    }

    #[test]
    fn test_shift_enter_newline_is_kept_in_submission() {
        let mut composer = typed("line one");
        composer.handle_event(&TuiEvent::InputChar('\n'));
        composer.handle_event(&TuiEvent::Paste("line\r\ntwo".into()));
        match composer.handle_event(&TuiEvent::Submit) {
            Some(ComposerEvent::Submit(text)) => assert_eq!(text, "line one\nline\ntwo"),
            other => panic!("Expected Submit, got {:?}", other),
        }
    }

    #[test]
    fn test_editing_multibyte_text() {
        let mut composer = typed("café");
        composer.handle_event(&TuiEvent::CursorLeft);
        composer.handle_event(&TuiEvent::Delete);
        assert_eq!(composer.buffer, "caf");
        composer.handle_event(&TuiEvent::CursorHome);
        composer.handle_event(&TuiEvent::InputChar('¡'));
        assert_eq!(composer.buffer, "¡caf");
    }

    #[test]
    fn test_vertical_movement_between_lines() {
        let mut composer = typed("abc\nde");
        assert_eq!(
            composer.handle_event(&TuiEvent::CursorUp),
            Some(ComposerEvent::ContentChanged)
        );
        composer.handle_event(&TuiEvent::InputChar('X'));
        assert_eq!(composer.buffer, "abXc\nde");
        assert_eq!(composer.handle_event(&TuiEvent::CursorUp), None);
    }

    #[test]
    fn test_height_grows_then_caps() {
        let composer = Composer::new();
        assert_eq!(composer.calculate_height(40), 3);

        let composer = typed("1\n2\n3");
        assert_eq!(composer.calculate_height(40), 5);

        let composer = typed("1\n2\n3\n4\n5\n6\n7\n8\n9");
        assert_eq!(
            composer.calculate_height(40),
            MAX_VISIBLE_LINES + VERTICAL_OVERHEAD
        );
    }

    #[test]
    fn test_render_placeholder_and_disabled_title() {
        let mut composer = Composer::new();
        let text = render_text(&mut composer, 70, 3);
        assert!(text.contains("Enter text to analyze sentiment..."));
        assert!(text.contains("Analyze"));

        composer.disabled = true;
        let text = render_text(&mut composer, 70, 3);
        assert!(text.contains("Analyzing..."));
    }

    #[test]
    fn test_render_shows_tail_of_long_draft() {
        let mut composer = typed("1\n2\n3\n4\n5\n6\n7\n8\nlast");
        let text = render_text(&mut composer, 30, 8);
        assert!(text.contains("last"));
        assert!(!text.contains('1'));
    }
}
