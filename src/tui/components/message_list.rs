//! # MessageList Component
//!
//! Scrollable view of the active session's conversation.
//!
//! ## Responsibilities
//!
//! - Display the session's messages, oldest first
//! - Show the "Analyzing sentiment..." placeholder while the session submits
//! - Keep the newest message in view unless the user scrolled away
//! - Cache message heights between frames
//!
//! `MessageList` is a transient component (created each frame) that wraps
//! `&'a mut MessageListState` (persistent state) and the messages (props).
//! Messages never change once appended, so cached heights stay valid until
//! the width or the session changes.

use ratatui::Frame;
use ratatui::layout::{Position, Rect, Size};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::core::message::Message;
use crate::core::session::SessionId;
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::message::{MessageCard, PendingCard};
use crate::tui::event::TuiEvent;

/// Scroll and layout state for the message list.
/// Must be persisted in the parent TuiState.
pub struct MessageListState {
    pub scroll_state: ScrollViewState,
    /// When true, auto-scroll to bottom on new content
    pub stick_to_bottom: bool,
    /// Last known viewport height (for scroll clamping between frames)
    pub viewport_height: u16,
    layout: LayoutCache,
}

impl Default for MessageListState {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageListState {
    pub fn new() -> Self {
        Self {
            scroll_state: ScrollViewState::default(),
            stick_to_bottom: true,
            viewport_height: 0,
            layout: LayoutCache::default(),
        }
    }

    fn max_offset(&self) -> u16 {
        self.layout.canvas_height.saturating_sub(self.viewport_height)
    }

    /// Clamp scroll offset so it never exceeds the content bounds.
    fn clamp_scroll(&mut self) {
        let max_y = self.max_offset();
        let current = self.scroll_state.offset();
        if current.y > max_y {
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }

    /// Re-engage auto-scroll once the user scrolls back to the bottom.
    fn repin_if_at_bottom(&mut self) {
        if self.scroll_state.offset().y >= self.max_offset() {
            self.stick_to_bottom = true;
            self.clamp_scroll();
        }
    }
}

impl EventHandler for MessageListState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::ScrollUp => {
                self.scroll_state.scroll_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollDown => {
                self.scroll_state.scroll_down();
                self.repin_if_at_bottom();
            }
            TuiEvent::ScrollPageUp => {
                self.scroll_state.scroll_page_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollPageDown => {
                self.scroll_state.scroll_page_down();
                self.repin_if_at_bottom();
            }
            _ => {}
        }
        None
    }
}

/// Per-message heights for one session at one width.
#[derive(Default)]
struct LayoutCache {
    session: Option<SessionId>,
    width: u16,
    heights: Vec<u16>,
    /// Sum of `heights` plus the pending placeholder, if shown.
    ///
    /// Saturates at `u16::MAX` rows (the ratatui buffer limit). Anything
    /// past that in one session is not drawn and cannot be scrolled to.
    canvas_height: u16,
}

impl LayoutCache {
    /// Bring the cache up to date, measuring only messages not seen yet.
    fn refresh(&mut self, session: SessionId, messages: &[Message], width: u16, pending: bool) {
        if self.session != Some(session)
            || self.width != width
            || self.heights.len() > messages.len()
        {
            self.session = Some(session);
            self.width = width;
            self.heights.clear();
        }

        for message in messages.iter().skip(self.heights.len()) {
            self.heights.push(MessageCard::calculate_height(message, width));
        }

        let messages_height = self.heights.iter().fold(0u16, |acc, &h| acc.saturating_add(h));
        self.canvas_height = if pending {
            messages_height.saturating_add(PendingCard::HEIGHT)
        } else {
            messages_height
        };
    }
}

/// Scrollable conversation view component.
/// Created fresh each frame with references to state and data.
pub struct MessageList<'a> {
    pub state: &'a mut MessageListState,
    pub session_id: SessionId,
    pub messages: &'a [Message],
    /// The session is submitting; show the placeholder after the last message
    pub pending: bool,
    pub pulse_value: f32,
}

impl<'a> Component for MessageList<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let content_width = area.width.saturating_sub(1); // -1 for scrollbar
        self.state
            .layout
            .refresh(self.session_id, self.messages, content_width, self.pending);
        self.state.viewport_height = area.height;

        if self.state.stick_to_bottom {
            let bottom = self.state.max_offset();
            self.state.scroll_state.set_offset(Position { x: 0, y: bottom });
        } else {
            self.state.clamp_scroll();
        }

        let canvas_height = self.state.layout.canvas_height;
        let mut scroll_view = ScrollView::new(Size::new(content_width, canvas_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Automatic)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        // Only messages near the viewport are drawn into the canvas
        let offset = self.state.scroll_state.offset().y;
        let visible_start = offset.saturating_sub(area.height);
        let visible_end = offset.saturating_add(area.height.saturating_mul(2));

        let mut y: u16 = 0;
        for (message, &height) in self.messages.iter().zip(&self.state.layout.heights) {
            if y.saturating_add(height) > visible_start && y < visible_end {
                scroll_view.render_widget(
                    MessageCard::new(message),
                    Rect::new(0, y, content_width, height),
                );
            }
            y = y.saturating_add(height);
        }

        if self.pending {
            scroll_view.render_widget(
                PendingCard {
                    pulse_intensity: self.pulse_value,
                },
                Rect::new(0, y, content_width, PendingCard::HEIGHT),
            );
        }

        frame.render_stateful_widget(scroll_view, area, &mut self.state.scroll_state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn render_text(
        state: &mut MessageListState,
        session_id: SessionId,
        messages: &[Message],
        pending: bool,
        size: (u16, u16),
    ) -> String {
        let mut terminal = Terminal::new(TestBackend::new(size.0, size.1)).unwrap();
        terminal
            .draw(|f| {
                MessageList {
                    state,
                    session_id,
                    messages,
                    pending,
                    pulse_value: 0.0,
                }
                .render(f, f.area())
            })
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_layout_cache_measures_only_new_messages() {
        let session = SessionId::new();
        let mut messages = vec![Message::user("one")];
        let mut cache = LayoutCache::default();

        cache.refresh(session, &messages, 40, false);
        assert_eq!(cache.heights, vec![3]);
        assert_eq!(cache.canvas_height, 3);

        // A stale entry for the first message survives an append
        cache.heights[0] = 7;
        messages.push(Message::user("two"));
        cache.refresh(session, &messages, 40, true);
        assert_eq!(cache.heights, vec![7, 3]);
        assert_eq!(cache.canvas_height, 10 + PendingCard::HEIGHT);
    }

    #[test]
    fn test_layout_cache_resets_on_width_or_session_change() {
        let session = SessionId::new();
        let messages = vec![Message::user("one")];
        let mut cache = LayoutCache::default();
        cache.refresh(session, &messages, 40, false);
        cache.heights[0] = 7;

        cache.refresh(session, &messages, 30, false);
        assert_eq!(cache.heights, vec![3]);

        cache.heights[0] = 7;
        cache.refresh(SessionId::new(), &messages, 30, false);
        assert_eq!(cache.heights, vec![3]);
    }

    #[test]
    fn test_layout_cache_canvas_saturates() {
        let session = SessionId::new();
        let long = "x\n".repeat(40_000);
        let messages = vec![Message::user(long.clone()), Message::user(long)];
        let mut cache = LayoutCache::default();

        cache.refresh(session, &messages, 40, true);
        assert_eq!(cache.heights, vec![40_002, 40_002]);
        assert_eq!(cache.canvas_height, u16::MAX);
    }

    #[test]
    fn test_pending_placeholder_is_rendered() {
        let mut state = MessageListState::new();
        let messages = vec![Message::user("I love this product!")];
        let text = render_text(&mut state, SessionId::new(), &messages, true, (60, 10));
        assert!(text.contains("I love this product!"));
        assert!(text.contains("Analyzing sentiment..."));

        let text = render_text(&mut state, SessionId::new(), &messages, false, (60, 10));
        assert!(!text.contains("Analyzing sentiment..."));
    }

    #[test]
    fn test_sticks_to_newest_message() {
        let mut state = MessageListState::new();
        let messages: Vec<Message> = (0..10)
            .map(|i| Message::user(format!("message {i}")))
            .collect();
        let text = render_text(&mut state, SessionId::new(), &messages, false, (40, 6));
        assert!(text.contains("message 9"));
        assert!(!text.contains("message 0"));
    }

    #[test]
    fn test_scrolling_up_unpins_and_bottom_repins() {
        let mut state = MessageListState::new();
        let session = SessionId::new();
        let messages: Vec<Message> = (0..10)
            .map(|i| Message::user(format!("message {i}")))
            .collect();
        render_text(&mut state, session, &messages, false, (40, 6));

        state.handle_event(&TuiEvent::ScrollPageUp);
        assert!(!state.stick_to_bottom);
        let text = render_text(&mut state, session, &messages, false, (40, 6));
        assert!(!text.contains("message 9"));

        for _ in 0..20 {
            state.handle_event(&TuiEvent::ScrollDown);
        }
        assert!(state.stick_to_bottom);
    }
}
