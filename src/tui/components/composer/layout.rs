//! Wrapping and cursor geometry for the composer.
//!
//! Everything here is a pure function of the draft text and the outer width
//! of the composer block, so the same numbers drive height calculation,
//! rendering, and cursor placement.

use std::borrow::Cow;

use unicode_width::UnicodeWidthStr;

/// Borders (2) plus one column of padding on each side
pub(super) const HORIZONTAL_OVERHEAD: u16 = 4;
/// Top + bottom borders
pub(super) const VERTICAL_OVERHEAD: u16 = 2;
/// Visible draft lines before the composer starts scrolling internally
pub(super) const MAX_VISIBLE_LINES: u16 = 6;
/// Distance from the block's left edge to the first text column
pub(super) const TEXT_OFFSET_X: u16 = 2;
/// Distance from the block's top edge to the first text row
pub(super) const TEXT_OFFSET_Y: u16 = 1;

pub(super) fn inner_width(outer_width: u16) -> u16 {
    outer_width.saturating_sub(HORIZONTAL_OVERHEAD)
}

/// Wrap `text` the way the composer displays it. A trailing newline yields
/// a trailing empty line so the cursor has somewhere to sit.
pub(super) fn wrap(text: &str, width: u16) -> Vec<Cow<'_, str>> {
    if width == 0 {
        return vec![Cow::Borrowed("")];
    }
    let options = textwrap::Options::new(width as usize)
        .break_words(true)
        .word_separator(textwrap::WordSeparator::AsciiSpace);
    let mut lines = textwrap::wrap(text, options);
    if lines.is_empty() {
        lines.push(Cow::Borrowed(""));
    }
    if text.ends_with('\n') && !lines.last().is_some_and(|l| l.is_empty()) {
        lines.push(Cow::Borrowed(""));
    }
    lines
}

pub(super) fn line_count(text: &str, width: u16) -> u16 {
    wrap(text, width).len().min(u16::MAX as usize) as u16
}

/// Wrapped (row, column) of the byte offset `pos` within `text`.
pub(super) fn cursor_cell(text: &str, pos: usize, width: u16) -> (u16, u16) {
    let before = &text[..pos];
    let row = line_count(before, width).saturating_sub(1);

    // Columns come from the logical line so spaces that textwrap trims at a
    // wrap point are still counted.
    let logical = &before[before.rfind('\n').map(|i| i + 1).unwrap_or(0)..];
    let segments = wrap(logical, width);
    let consumed: usize = segments
        .iter()
        .take(segments.len().saturating_sub(1))
        .map(|seg| seg.width())
        .sum();
    let col = logical.width().saturating_sub(consumed);

    (row, col.min(width as usize) as u16)
}

pub(super) fn prev_char_boundary(text: &str, pos: usize) -> usize {
    text[..pos]
        .char_indices()
        .next_back()
        .map(|(i, _)| i)
        .unwrap_or(0)
}

pub(super) fn next_char_boundary(text: &str, pos: usize) -> usize {
    text[pos..]
        .chars()
        .next()
        .map(|c| pos + c.len_utf8())
        .unwrap_or(text.len())
}
