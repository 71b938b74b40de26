//! # Session List Component
//!
//! Sidebar listing every session, newest first. Focused with Esc from the
//! composer; Enter or typing hands focus back.
//!
//! Follows the persistent state + transient wrapper pattern:
//! - `SessionListState` lives in `TuiState`
//! - `SessionList` is created each frame with borrowed state and props

use std::collections::HashSet;
use std::sync::Arc;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, List, ListItem, ListState, Padding, Paragraph};
use unicode_width::UnicodeWidthChar;

use crate::core::session::{Session, SessionId};
use crate::tui::component::Component;
use crate::tui::event::TuiEvent;

/// Persistent state for the sidebar.
#[derive(Default)]
pub struct SessionListState {
    pub highlighted: usize,
    pub confirm_delete: bool,
    pub list_state: ListState,
}

/// Events emitted by the session list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionListEvent {
    Select(SessionId),
    CreateNew,
    Delete(SessionId),
    /// Hand focus back to the composer, forwarding the event that caused it.
    Dismiss(Option<TuiEvent>),
}

impl SessionListState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the highlight onto the active session.
    pub fn sync(&mut self, sessions: &[Arc<Session>], active: Option<SessionId>) {
        self.highlighted = active
            .and_then(|id| sessions.iter().position(|s| s.id == id))
            .unwrap_or(0);
        self.clamp(sessions.len());
    }

    fn clamp(&mut self, len: usize) {
        if len == 0 {
            self.highlighted = 0;
            self.list_state.select(None);
        } else {
            self.highlighted = self.highlighted.min(len - 1);
            self.list_state.select(Some(self.highlighted));
        }
    }

    /// Handle a key event while the sidebar has focus.
    pub fn handle_event(
        &mut self,
        event: &TuiEvent,
        sessions: &[Arc<Session>],
    ) -> Option<SessionListEvent> {
        // Any key other than `d` cancels a pending delete
        let is_delete_key = matches!(event, TuiEvent::InputChar('d'));
        if !is_delete_key {
            self.confirm_delete = false;
        }

        match event {
            TuiEvent::Escape => Some(SessionListEvent::Dismiss(None)),
            TuiEvent::CursorUp => {
                self.highlighted = self.highlighted.saturating_sub(1);
                self.clamp(sessions.len());
                self.highlighted_id(sessions).map(SessionListEvent::Select)
            }
            TuiEvent::CursorDown => {
                self.highlighted += 1;
                self.clamp(sessions.len());
                self.highlighted_id(sessions).map(SessionListEvent::Select)
            }
            TuiEvent::Submit => Some(SessionListEvent::Dismiss(None)),
            TuiEvent::InputChar('n') => Some(SessionListEvent::CreateNew),
            TuiEvent::InputChar('d') => {
                let id = self.highlighted_id(sessions)?;
                if self.confirm_delete {
                    self.confirm_delete = false;
                    Some(SessionListEvent::Delete(id))
                } else {
                    self.confirm_delete = true;
                    None
                }
            }
            TuiEvent::InputChar(_) | TuiEvent::Paste(_) => {
                Some(SessionListEvent::Dismiss(Some(event.clone())))
            }
            _ => None,
        }
    }

    fn highlighted_id(&self, sessions: &[Arc<Session>]) -> Option<SessionId> {
        sessions.get(self.highlighted).map(|s| s.id)
    }
}

/// Transient render wrapper for the sidebar.
pub struct SessionList<'a> {
    pub state: &'a mut SessionListState,
    pub sessions: &'a [Arc<Session>],
    pub active: Option<SessionId>,
    pub in_flight: &'a HashSet<SessionId>,
    pub focused: bool,
}

impl<'a> Component for SessionList<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let help_text = if self.state.confirm_delete {
            " d again to delete "
        } else if self.focused {
            " n New  d Delete "
        } else {
            " Esc to browse "
        };
        let border_style = if self.focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title(" Sessions ")
            .title_bottom(Line::from(help_text).centered())
            .padding(Padding::horizontal(1));

        if self.sessions.is_empty() {
            let empty = Paragraph::new("No sessions yet.")
                .style(Style::default().fg(Color::DarkGray))
                .centered()
                .block(block);
            frame.render_widget(empty, area);
            return;
        }

        let title_width = area.width.saturating_sub(4) as usize;
        let items: Vec<ListItem> = self
            .sessions
            .iter()
            .enumerate()
            .map(|(i, session)| {
                let is_active = self.active == Some(session.id);
                let is_highlighted = self.focused && i == self.state.highlighted;

                let mut title_style = if is_active {
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::Gray)
                };
                if is_highlighted {
                    title_style = title_style.add_modifier(Modifier::REVERSED);
                    if self.state.confirm_delete {
                        title_style = title_style.fg(Color::Red);
                    }
                }

                let mut detail = session.message_count_label();
                if self.in_flight.contains(&session.id) {
                    detail.push_str(" · analyzing");
                }

                ListItem::new(vec![
                    Line::from(Span::styled(
                        truncate_to_width(&session.title, title_width),
                        title_style,
                    )),
                    Line::from(Span::styled(detail, Style::default().fg(Color::DarkGray))),
                ])
            })
            .collect();

        self.state.clamp(self.sessions.len());
        frame.render_stateful_widget(
            List::new(items).block(block),
            area,
            &mut self.state.list_state,
        );
    }
}

/// Truncate to `max_width` terminal columns, ending in "…" when cut.
fn truncate_to_width(s: &str, max_width: usize) -> String {
    let total: usize = s.chars().map(|c| c.width().unwrap_or(0)).sum();
    if total <= max_width {
        return s.to_string();
    }

    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > max_width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}
