use std::ops::Range;

use anyhow::Error;
use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Move a list cursor by `offset`, clamped to `0..len`.
pub(crate) fn step_selection(selected: usize, len: usize, offset: isize) -> usize {
    if len == 0 {
        return 0;
    }
    let next = selected as isize + offset;
    next.clamp(0, len as isize - 1) as usize
}

/// Rows a paragraph of `text` occupies when wrapped at `width` columns. This
/// is a character-count estimate; word wrapping can push a line or two
/// further, which cards absorb with their padding row.
pub(crate) fn wrapped_height(text: &str, width: u16) -> u16 {
    let width = width.max(1) as usize;
    let chars = text.chars().count().max(1);
    chars.div_ceil(width).min(u16::MAX as usize) as u16
}

/// Pick the slice of variable-height cards to draw so `selected` stays
/// visible inside `available` rows. The window scrolls just far enough for
/// the selection to be the last card.
pub(crate) fn card_window(heights: &[u16], selected: usize, available: u16) -> Range<usize> {
    if heights.is_empty() || available == 0 {
        return 0..0;
    }
    let available = u32::from(available);
    let selected = selected.min(heights.len() - 1);

    let mut start = selected;
    let mut used = u32::from(heights[selected]);
    while start > 0 && used + u32::from(heights[start - 1]) <= available {
        start -= 1;
        used += u32::from(heights[start]);
    }

    let mut end = selected + 1;
    while end < heights.len() && used + u32::from(heights[end]) <= available {
        used += u32::from(heights[end]);
        end += 1;
    }

    start..end
}

/// Produce a rectangle centered within `area` that spans the requested percent
/// of the width and height. Used for modal dialogs.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(area);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(horizontal[1]);

    vertical[1]
}

/// Extract the most relevant error message from a chained error.
pub(crate) fn surface_error(err: &Error) -> String {
    err.chain()
        .last()
        .map(|cause| cause.to_string())
        .unwrap_or_else(|| err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_clamps_both_ends() {
        assert_eq!(step_selection(0, 3, -1), 0);
        assert_eq!(step_selection(1, 3, 5), 2);
        assert_eq!(step_selection(2, 3, -1), 1);
        assert_eq!(step_selection(4, 0, 1), 0);
    }

    #[test]
    fn wrapped_height_rounds_up() {
        assert_eq!(wrapped_height("", 10), 1);
        assert_eq!(wrapped_height("abcdefghij", 10), 1);
        assert_eq!(wrapped_height("abcdefghijk", 10), 2);
        assert_eq!(wrapped_height("abc", 0), 3);
    }

    #[test]
    fn window_keeps_selection_visible() {
        let heights = [3, 3, 3, 3, 3];
        assert_eq!(card_window(&heights, 0, 9), 0..3);
        assert_eq!(card_window(&heights, 1, 9), 0..3);
        assert_eq!(card_window(&heights, 4, 9), 2..5);
    }

    #[test]
    fn window_handles_oversized_card() {
        assert_eq!(card_window(&[20, 2], 0, 5), 0..1);
        assert_eq!(card_window(&[], 0, 5), 0..0);
    }

    #[test]
    fn surface_error_prefers_root_cause() {
        let err = anyhow::anyhow!("disk offline").context("failed to write");
        assert_eq!(surface_error(&err), "disk offline");
    }
}
