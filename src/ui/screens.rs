use std::collections::BTreeMap;
use std::num::NonZeroU32;

use crate::models::{Chapter, ColorGroup, HighlightColor, HighlightedVerse, VerseRef};

use super::helpers::step_selection;

/// Cursor over the chapter list. The chapters themselves live in the corpus.
#[derive(Default)]
pub(crate) struct ChaptersScreen {
    pub(crate) selected: usize,
}

impl ChaptersScreen {
    pub(crate) fn move_selection(&mut self, offset: isize, len: usize) {
        self.selected = step_selection(self.selected, len, offset);
    }

    pub(crate) fn select_last(&mut self, len: usize) {
        self.selected = len.saturating_sub(1);
    }
}

/// One open chapter plus the highlights loaded for it when it was opened.
pub(crate) struct VersesScreen {
    pub(crate) chapter: Chapter,
    pub(crate) highlights: BTreeMap<NonZeroU32, HighlightColor>,
    pub(crate) selected: usize,
}

impl VersesScreen {
    pub(crate) fn new(chapter: Chapter, highlights: BTreeMap<NonZeroU32, HighlightColor>) -> Self {
        Self {
            chapter,
            highlights,
            selected: 0,
        }
    }

    /// Put the cursor on a specific verse, e.g. when jumping from the library.
    pub(crate) fn focus_verse(&mut self, verse: NonZeroU32) {
        if let Some(index) = self.chapter.verses.iter().position(|v| v.verse == verse) {
            self.selected = index;
        }
    }

    pub(crate) fn current_ref(&self) -> Option<VerseRef> {
        self.chapter.verse_ref(self.selected)
    }

    pub(crate) fn highlight_for(&self, verse: NonZeroU32) -> Option<&HighlightColor> {
        self.highlights.get(&verse)
    }

    /// Mirror a store write that already succeeded. `None` clears.
    pub(crate) fn apply_highlight(&mut self, verse: NonZeroU32, color: Option<HighlightColor>) {
        match color {
            Some(color) => {
                self.highlights.insert(verse, color);
            }
            None => {
                self.highlights.remove(&verse);
            }
        }
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        self.selected = step_selection(self.selected, self.chapter.verses.len(), offset);
    }

    pub(crate) fn select_last(&mut self) {
        self.selected = self.chapter.verses.len().saturating_sub(1);
    }
}

/// Highlights grouped by color. Rebuilt every time the library gains focus.
#[derive(Default)]
pub(crate) struct LibraryScreen {
    pub(crate) groups: Vec<ColorGroup>,
    pub(crate) active_group: usize,
    pub(crate) selected: usize,
}

impl LibraryScreen {
    /// Swap in freshly loaded groups. The first color becomes active, matching
    /// what a user sees on a cold open.
    pub(crate) fn with_groups(groups: Vec<ColorGroup>) -> Self {
        Self {
            groups,
            active_group: 0,
            selected: 0,
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub(crate) fn active(&self) -> Option<&ColorGroup> {
        self.groups.get(self.active_group)
    }

    pub(crate) fn active_verses(&self) -> &[HighlightedVerse] {
        self.active().map(|group| group.verses.as_slice()).unwrap_or(&[])
    }

    pub(crate) fn current_verse(&self) -> Option<&HighlightedVerse> {
        self.active_verses().get(self.selected)
    }

    /// Move between color pills; the verse cursor resets for the new group.
    pub(crate) fn move_group(&mut self, offset: isize) {
        let next = step_selection(self.active_group, self.groups.len(), offset);
        if next != self.active_group {
            self.active_group = next;
            self.selected = 0;
        }
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        self.selected = step_selection(self.selected, self.active_verses().len(), offset);
    }

    pub(crate) fn select_last(&mut self) {
        self.selected = self.active_verses().len().saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Verse;

    fn nz(n: u32) -> NonZeroU32 {
        NonZeroU32::new(n).unwrap()
    }

    fn chapter() -> Chapter {
        Chapter {
            chapter: nz(117),
            verses: vec![
                Verse {
                    verse: nz(1),
                    text: "O praise the LORD".to_string(),
                },
                Verse {
                    verse: nz(2),
                    text: "For his merciful kindness".to_string(),
                },
            ],
        }
    }

    fn group(color: &str, refs: &[(u32, u32)]) -> ColorGroup {
        ColorGroup {
            color: color.into(),
            verses: refs
                .iter()
                .map(|&(c, v)| HighlightedVerse {
                    verse_ref: VerseRef::checked(c, v).unwrap(),
                    text: String::new(),
                    color: color.into(),
                })
                .collect(),
        }
    }

    #[test]
    fn verses_track_local_highlights() {
        let mut screen = VersesScreen::new(chapter(), BTreeMap::new());
        screen.apply_highlight(nz(2), Some("Red".into()));
        assert_eq!(screen.highlight_for(nz(2)), Some(&HighlightColor::from("Red")));
        screen.apply_highlight(nz(2), None);
        assert_eq!(screen.highlight_for(nz(2)), None);
    }

    #[test]
    fn verse_cursor_is_clamped() {
        let mut screen = VersesScreen::new(chapter(), BTreeMap::new());
        screen.move_selection(5);
        assert_eq!(screen.current_ref(), VerseRef::checked(117, 2));
        screen.move_selection(-9);
        assert_eq!(screen.current_ref(), VerseRef::checked(117, 1));
        screen.focus_verse(nz(2));
        assert_eq!(screen.selected, 1);
        screen.focus_verse(nz(40));
        assert_eq!(screen.selected, 1);
    }

    #[test]
    fn library_defaults_to_first_group() {
        let library = LibraryScreen::with_groups(vec![
            group("Red", &[(23, 1), (23, 5)]),
            group("Blue", &[(90, 1)]),
        ]);
        assert_eq!(library.active().unwrap().color.as_str(), "Red");
        assert_eq!(library.active_verses().len(), 2);
    }

    #[test]
    fn switching_groups_resets_cursor() {
        let mut library = LibraryScreen::with_groups(vec![
            group("Red", &[(23, 1), (23, 5)]),
            group("Blue", &[(90, 1)]),
        ]);
        library.move_selection(1);
        assert_eq!(library.selected, 1);
        library.move_group(1);
        assert_eq!(library.active().unwrap().color.as_str(), "Blue");
        assert_eq!(library.selected, 0);
        library.move_group(1);
        assert_eq!(library.active_group, 1);
    }

    #[test]
    fn empty_library_has_no_current_verse() {
        let mut library = LibraryScreen::default();
        library.move_group(1);
        library.move_selection(1);
        assert!(library.is_empty());
        assert!(library.current_verse().is_none());
    }
}
