use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::models::{HighlightColor, VerseRef};

use super::helpers::step_selection;
use super::palette::{swatch, PaletteEntry, HIGHLIGHT_COLORS};

/// What the user picked in the highlight modal.
#[derive(Clone, Copy)]
pub(crate) enum PickerChoice {
    Color(&'static PaletteEntry),
    Remove,
}

impl PickerChoice {
    /// The color to persist, or `None` for removal.
    pub(crate) fn color(&self) -> Option<HighlightColor> {
        match self {
            PickerChoice::Color(entry) => Some(entry.color()),
            PickerChoice::Remove => None,
        }
    }
}

/// State for the "Highlight Verse" modal. It lives only while the modal is
/// open and is dropped on apply or cancel.
pub(crate) struct HighlightPicker {
    pub(crate) verse_ref: VerseRef,
    pub(crate) selected: usize,
}

impl HighlightPicker {
    pub(crate) fn new(verse_ref: VerseRef) -> Self {
        Self {
            verse_ref,
            selected: 0,
        }
    }

    /// Palette swatches followed by the remove action.
    fn option_count() -> usize {
        HIGHLIGHT_COLORS.len() + 1
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        self.selected = step_selection(self.selected, Self::option_count(), offset);
    }

    /// Jump to an option by its 1-based number key.
    pub(crate) fn select_number(&mut self, number: usize) -> bool {
        if (1..=Self::option_count()).contains(&number) {
            self.selected = number - 1;
            true
        } else {
            false
        }
    }

    pub(crate) fn choice(&self) -> PickerChoice {
        HIGHLIGHT_COLORS
            .get(self.selected)
            .map(PickerChoice::Color)
            .unwrap_or(PickerChoice::Remove)
    }

    /// Lines for the modal body, one per option.
    pub(crate) fn build_lines(&self) -> Vec<Line<'static>> {
        let mut lines = Vec::with_capacity(Self::option_count());
        for (index, entry) in HIGHLIGHT_COLORS.iter().enumerate() {
            let mut style = Style::default().fg(Color::White).add_modifier(Modifier::BOLD);
            if let Some(bg) = swatch(&entry.color()) {
                style = style.bg(bg);
            }
            lines.push(self.option_line(index, entry.label, style));
        }
        lines.push(Line::from(""));
        lines.push(self.option_line(
            HIGHLIGHT_COLORS.len(),
            "Remove Highlight",
            Style::default().fg(Color::Red),
        ));
        lines
    }

    fn option_line(&self, index: usize, label: &str, style: Style) -> Line<'static> {
        let marker = if index == self.selected { "▶ " } else { "  " };
        Line::from(vec![
            Span::styled(marker.to_string(), Style::default().fg(Color::Yellow)),
            Span::styled(format!(" {}. {:<18}", index + 1, label), style),
        ])
    }
}
