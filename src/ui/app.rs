use std::collections::BTreeMap;
use std::mem;
use std::num::NonZeroU32;

use crossterm::event::KeyCode;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Tabs, Wrap};
use ratatui::Frame;
use tracing::{error, info};

use crate::corpus::Corpus;
use crate::db::{HighlightStore, KeyValueStore, SqliteStore};
use crate::error::StoreError;
use crate::models::HighlightColor;
use crate::query::HighlightQuery;

use super::forms::HighlightPicker;
use super::helpers::{card_window, centered_rect, surface_error, wrapped_height};
use super::palette::{border, label_for, swatch};
use super::screens::{ChaptersScreen, LibraryScreen, VersesScreen};

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Tab bar across the top of every screen.
const TAB_BAR_HEIGHT: u16 = 3;
/// Rows moved by PageUp / PageDown.
const PAGE: isize = 5;

/// Card body, its height in rows, and the highlight tinting it.
type Card<'a> = (Vec<Line<'static>>, u16, Option<&'a HighlightColor>);

/// The two top-level tabs. The Psalms tab is a small stack: the chapter list
/// with an optional open chapter on top.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Tab {
    Psalms,
    Library,
}

/// Fine-grained modes scoped to the current screen.
enum Mode {
    Normal,
    PickingHighlight(HighlightPicker),
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
#[derive(Debug, PartialEq, Eq)]
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state shared across the TUI.
pub struct App<S = SqliteStore> {
    store: HighlightStore<S>,
    corpus: Corpus,
    tab: Tab,
    chapters: ChaptersScreen,
    verses: Option<VersesScreen>,
    library: LibraryScreen,
    mode: Mode,
    status: Option<StatusMessage>,
}

impl<S: KeyValueStore> App<S> {
    pub fn new(store: HighlightStore<S>, corpus: Corpus) -> Self {
        Self {
            store,
            corpus,
            tab: Tab::Psalms,
            chapters: ChaptersScreen::default(),
            verses: None,
            library: LibraryScreen::default(),
            mode: Mode::Normal,
            status: None,
        }
    }

    /// Feed one key press through the state machine. Returns `true` when the
    /// user asked to quit.
    pub fn handle_key(&mut self, code: KeyCode) -> bool {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit),
            Mode::PickingHighlight(picker) => self.handle_picker(code, picker),
        };

        exit
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Mode {
        match code {
            KeyCode::Char('q') => {
                *exit = true;
                return Mode::Normal;
            }
            KeyCode::Tab | KeyCode::BackTab => {
                self.switch_tab();
                return Mode::Normal;
            }
            _ => {}
        }

        match self.tab {
            Tab::Psalms if self.verses.is_some() => self.handle_verses_key(code),
            Tab::Psalms => self.handle_chapters_key(code, exit),
            Tab::Library => self.handle_library_key(code),
        }
    }

    fn handle_chapters_key(&mut self, code: KeyCode, exit: &mut bool) -> Mode {
        let len = self.corpus.chapters().len();
        match code {
            KeyCode::Esc => *exit = true,
            KeyCode::Up => self.chapters.move_selection(-1, len),
            KeyCode::Down => self.chapters.move_selection(1, len),
            KeyCode::PageUp => self.chapters.move_selection(-PAGE, len),
            KeyCode::PageDown => self.chapters.move_selection(PAGE, len),
            KeyCode::Home => self.chapters.selected = 0,
            KeyCode::End => self.chapters.select_last(len),
            KeyCode::Enter => {
                let selected = self
                    .corpus
                    .chapters()
                    .get(self.chapters.selected)
                    .map(|chapter| chapter.chapter);
                match selected {
                    Some(number) => {
                        self.clear_status();
                        self.open_chapter(number, None);
                    }
                    None => self.set_status("No chapter selected.", StatusKind::Error),
                }
            }
            _ => {}
        }
        Mode::Normal
    }

    fn handle_verses_key(&mut self, code: KeyCode) -> Mode {
        let Some(verses) = self.verses.as_mut() else {
            return Mode::Normal;
        };

        match code {
            KeyCode::Esc | KeyCode::Backspace => {
                self.verses = None;
                self.clear_status();
            }
            KeyCode::Up => verses.move_selection(-1),
            KeyCode::Down => verses.move_selection(1),
            KeyCode::PageUp => verses.move_selection(-PAGE),
            KeyCode::PageDown => verses.move_selection(PAGE),
            KeyCode::Home => verses.selected = 0,
            KeyCode::End => verses.select_last(),
            KeyCode::Enter => {
                if let Some(verse_ref) = verses.current_ref() {
                    self.clear_status();
                    return Mode::PickingHighlight(HighlightPicker::new(verse_ref));
                }
            }
            _ => {}
        }
        Mode::Normal
    }

    fn handle_library_key(&mut self, code: KeyCode) -> Mode {
        match code {
            KeyCode::Esc => {
                self.tab = Tab::Psalms;
                self.clear_status();
            }
            KeyCode::Left => self.library.move_group(-1),
            KeyCode::Right => self.library.move_group(1),
            KeyCode::Up => self.library.move_selection(-1),
            KeyCode::Down => self.library.move_selection(1),
            KeyCode::PageUp => self.library.move_selection(-PAGE),
            KeyCode::PageDown => self.library.move_selection(PAGE),
            KeyCode::Home => self.library.selected = 0,
            KeyCode::End => self.library.select_last(),
            KeyCode::Char('r') | KeyCode::Char('R') => self.reload_library(),
            KeyCode::Enter => {
                if let Some(verse_ref) = self.library.current_verse().map(|v| v.verse_ref) {
                    self.clear_status();
                    self.open_chapter(verse_ref.chapter, Some(verse_ref.verse));
                }
            }
            _ => {}
        }
        Mode::Normal
    }

    fn handle_picker(&mut self, code: KeyCode, mut picker: HighlightPicker) -> Mode {
        match code {
            KeyCode::Esc => return Mode::Normal,
            KeyCode::Up => picker.move_selection(-1),
            KeyCode::Down => picker.move_selection(1),
            KeyCode::Enter => {
                self.apply_highlight(&picker);
                return Mode::Normal;
            }
            KeyCode::Char(ch) => {
                let picked = ch
                    .to_digit(10)
                    .is_some_and(|number| picker.select_number(number as usize));
                if picked {
                    self.apply_highlight(&picker);
                    return Mode::Normal;
                }
            }
            _ => {}
        }
        Mode::PickingHighlight(picker)
    }

    /// Persist the picker's choice. The open chapter only reflects the change
    /// after the store accepted it.
    fn apply_highlight(&mut self, picker: &HighlightPicker) {
        let verse_ref = picker.verse_ref;
        let color = picker.choice().color();
        let result = match &color {
            Some(color) => self.store.set_highlight(verse_ref, color),
            None => self.store.remove_highlight(verse_ref),
        };

        if let Err(err) = result {
            error!(verse = %verse_ref, error = %err, "failed to save highlight");
            self.set_status(
                format!("Highlight not saved: {}", describe(err)),
                StatusKind::Error,
            );
            return;
        }

        let message = match &color {
            Some(color) => format!("Psalm {verse_ref} highlighted {}.", label_for(color)),
            None => format!("Removed highlight from Psalm {verse_ref}."),
        };
        info!(
            verse = %verse_ref,
            color = ?color.as_ref().map(HighlightColor::as_str),
            "highlight changed"
        );

        if let Some(verses) = self
            .verses
            .as_mut()
            .filter(|verses| verses.chapter.chapter == verse_ref.chapter)
        {
            verses.apply_highlight(verse_ref.verse, color);
        }
        self.set_status(message, StatusKind::Info);
    }

    /// Open a chapter on the Psalms tab, optionally with the cursor on one
    /// verse. Highlights are loaded fresh from the store every time.
    fn open_chapter(&mut self, number: NonZeroU32, focus: Option<NonZeroU32>) {
        let Some(chapter) = self.corpus.chapter(number).cloned() else {
            self.set_status(
                format!("Psalm {number} is not in this corpus."),
                StatusKind::Error,
            );
            return;
        };

        let highlights = match HighlightQuery::new(&self.store, &self.corpus)
            .resolve_chapter_highlights(number)
        {
            Ok(highlights) => highlights,
            Err(err) => {
                error!(chapter = number.get(), error = %err, "failed to load chapter highlights");
                self.set_status(
                    format!("Failed to load highlights: {}", describe(err)),
                    StatusKind::Error,
                );
                BTreeMap::new()
            }
        };

        let mut screen = VersesScreen::new(chapter, highlights);
        if let Some(verse) = focus {
            screen.focus_verse(verse);
        }
        if let Some(index) = self
            .corpus
            .chapters()
            .iter()
            .position(|chapter| chapter.chapter == number)
        {
            self.chapters.selected = index;
        }

        self.verses = Some(screen);
        self.tab = Tab::Psalms;
    }

    fn switch_tab(&mut self) {
        self.clear_status();
        match self.tab {
            Tab::Psalms => {
                self.reload_library();
                self.tab = Tab::Library;
            }
            Tab::Library => self.tab = Tab::Psalms,
        }
    }

    /// Rebuild the grouped listing. On failure the previous listing stays up.
    fn reload_library(&mut self) {
        match HighlightQuery::new(&self.store, &self.corpus).list_by_color() {
            Ok(groups) => self.library = LibraryScreen::with_groups(groups),
            Err(err) => {
                error!(error = %err, "failed to load highlight library");
                self.set_status(
                    format!("Failed to load highlights: {}", describe(err)),
                    StatusKind::Error,
                );
            }
        }
    }

    fn set_status<T: Into<String>>(&mut self, text: T, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(TAB_BAR_HEIGHT),
                Constraint::Min(0),
                Constraint::Length(FOOTER_HEIGHT),
            ])
            .split(area);

        self.draw_tab_bar(frame, chunks[0]);
        match (self.tab, &self.verses) {
            (Tab::Psalms, Some(verses)) => self.draw_verses(frame, chunks[1], verses),
            (Tab::Psalms, None) => self.draw_chapters(frame, chunks[1]),
            (Tab::Library, _) => self.draw_library(frame, chunks[1]),
        }
        self.draw_footer(frame, chunks[2]);

        if let Mode::PickingHighlight(picker) = &self.mode {
            self.draw_picker(frame, area, picker);
        }
    }

    fn draw_tab_bar(&self, frame: &mut Frame, area: Rect) {
        let selected = match self.tab {
            Tab::Psalms => 0,
            Tab::Library => 1,
        };
        let tabs = Tabs::new(vec!["Psalms", "Library"])
            .select(selected)
            .style(Style::default().fg(Color::Gray))
            .highlight_style(
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            )
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(tabs, area);
    }

    fn draw_chapters(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title("Book of Psalms");

        if self.corpus.is_empty() {
            let message = Paragraph::new("The corpus has no chapters.")
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(message, area);
            return;
        }

        let items: Vec<ListItem> = self
            .corpus
            .chapters()
            .iter()
            .map(|chapter| {
                ListItem::new(Line::from(vec![
                    Span::raw(format!("Psalm {}", chapter.chapter)),
                    Span::styled(
                        format!("  ({} verses)", chapter.verses.len()),
                        Style::default().fg(Color::DarkGray),
                    ),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().fg(Color::Yellow))
            .highlight_symbol("▶ ");

        let mut list_state = ListState::default();
        list_state.select(Some(self.chapters.selected));
        frame.render_stateful_widget(list, area, &mut list_state);
    }

    fn draw_verses(&self, frame: &mut Frame, area: Rect, verses: &VersesScreen) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(1)])
            .split(area);

        let header = Paragraph::new(Line::from(vec![
            Span::styled(
                format!("Psalm {}", verses.chapter.chapter),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!(
                "  •  {} of {} verses highlighted",
                verses.highlights.len(),
                verses.chapter.verses.len()
            )),
        ]))
        .alignment(Alignment::Left)
        .block(Block::default().borders(Borders::ALL).title("Verses"));
        frame.render_widget(header, chunks[0]);

        let inner_width = chunks[1].width.saturating_sub(2);
        let cards: Vec<Card> = verses
            .chapter
            .verses
            .iter()
            .enumerate()
            .map(|(index, verse)| {
                let marker = if index == verses.selected { "▶ " } else { "" };
                let number = format!("{marker}{}. ", verse.verse);
                let height = wrapped_height(&format!("{number}{}", verse.text), inner_width) + 3;
                let line = Line::from(vec![
                    Span::styled(number, Style::default().add_modifier(Modifier::BOLD)),
                    Span::raw(verse.text.clone()),
                ]);
                (vec![line], height, verses.highlight_for(verse.verse))
            })
            .collect();

        self.render_cards(frame, chunks[1], cards, verses.selected);
    }

    fn draw_library(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title("Highlight Library");

        if self.library.is_empty() {
            let message = Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(
                    "No highlights yet.",
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    "Go to the Psalms tab to select and highlight verses.",
                    Style::default().fg(Color::Gray),
                )),
            ])
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(block);
            frame.render_widget(message, area);
            return;
        }

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(1)])
            .split(area);

        let mut pills = Vec::with_capacity(self.library.groups.len() * 2);
        for (index, group) in self.library.groups.iter().enumerate() {
            let style = if index == self.library.active_group {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Gray)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray).bg(Color::DarkGray)
            };
            pills.push(Span::styled(
                format!(" {} ({}) ", label_for(&group.color), group.verses.len()),
                style,
            ));
            pills.push(Span::raw(" "));
        }
        let pill_bar = Paragraph::new(Line::from(pills)).block(block);
        frame.render_widget(pill_bar, chunks[0]);

        let inner_width = chunks[1].width.saturating_sub(2);
        let selected = self.library.selected;
        let cards: Vec<Card> = self
            .library
            .active_verses()
            .iter()
            .enumerate()
            .map(|(index, verse)| {
                let quoted = if index == selected {
                    format!("▶ \"{}\"", verse.text)
                } else {
                    format!("\"{}\"", verse.text)
                };
                let height = wrapped_height(&quoted, inner_width) + 3;
                let lines = vec![
                    Line::from(quoted),
                    Line::from(Span::styled(
                        format!("Psalm {}", verse.verse_ref),
                        Style::default()
                            .fg(Color::Gray)
                            .add_modifier(Modifier::BOLD),
                    ))
                    .alignment(Alignment::Right),
                ];
                (lines, height, Some(&verse.color))
            })
            .collect();

        self.render_cards(frame, chunks[1], cards, selected);
    }

    /// Stack variable-height cards, scrolled so the selection is visible.
    /// Highlighted cards take their swatch as background and palette border.
    fn render_cards(
        &self,
        frame: &mut Frame,
        area: Rect,
        cards: Vec<Card>,
        selected: usize,
    ) {
        if cards.is_empty() || area.height == 0 {
            return;
        }

        let heights: Vec<u16> = cards.iter().map(|(_, height, _)| *height).collect();
        let window = card_window(&heights, selected, area.height);

        let mut constraints: Vec<Constraint> = window
            .clone()
            .map(|index| Constraint::Length(heights[index]))
            .collect();
        constraints.push(Constraint::Min(0));
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);

        for (chunk, (index, (lines, _, highlight))) in rows
            .iter()
            .zip(cards.into_iter().enumerate().skip(window.start).take(window.len()))
        {
            if chunk.height == 0 {
                continue;
            }

            let mut style = Style::default();
            let mut block = Block::default().borders(Borders::ALL);
            if let Some(color) = highlight {
                if let Some(bg) = swatch(color) {
                    style = style.bg(bg);
                }
                if let Some(edge) = border(color) {
                    block = block.border_style(Style::default().fg(edge));
                }
            }
            if index == selected {
                block = block.border_style(Style::default().fg(Color::Yellow));
            }

            let paragraph = Paragraph::new(lines)
                .block(block)
                .wrap(Wrap { trim: true })
                .alignment(Alignment::Left)
                .style(style);
            frame.render_widget(paragraph, *chunk);
        }
    }

    fn draw_picker(&self, frame: &mut Frame, area: Rect, picker: &HighlightPicker) {
        let popup_area = centered_rect(50, 50, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title("Highlight Verse")
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines = vec![
            Line::from(Span::styled(
                format!("Psalm {}", picker.verse_ref),
                Style::default().fg(Color::Gray),
            )),
            Line::from(""),
        ];
        lines.extend(picker.build_lines());

        let paragraph = Paragraph::new(lines).alignment(Alignment::Left);
        frame.render_widget(paragraph, inner);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let instructions = self.footer_instructions();

        let paragraph = Paragraph::new(vec![status_line, instructions]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let hints: &[(&str, &str)] = match (&self.mode, self.tab, self.verses.is_some()) {
            (Mode::PickingHighlight(_), _, _) => &[
                ("[↑↓]", " Navigate   "),
                ("[1-5]", " Pick   "),
                ("[Enter]", " Apply   "),
                ("[Esc]", " Cancel"),
            ],
            (Mode::Normal, Tab::Psalms, false) => &[
                ("[↑↓]", " Navigate   "),
                ("[Enter]", " Open Psalm   "),
                ("[Tab]", " Library   "),
                ("[q]", " Quit"),
            ],
            (Mode::Normal, Tab::Psalms, true) => &[
                ("[↑↓]", " Navigate   "),
                ("[Enter]", " Highlight   "),
                ("[Esc]", " Chapters   "),
                ("[Tab]", " Library   "),
                ("[q]", " Quit"),
            ],
            (Mode::Normal, Tab::Library, _) => &[
                ("[←→]", " Color   "),
                ("[↑↓]", " Navigate   "),
                ("[Enter]", " Open Psalm   "),
                ("[r]", " Refresh   "),
                ("[Tab]", " Psalms   "),
                ("[q]", " Quit"),
            ],
        };

        Line::from(
            hints
                .iter()
                .flat_map(|(key, label)| {
                    [
                        Span::styled(key.to_string(), key_style),
                        Span::raw(label.to_string()),
                    ]
                })
                .collect::<Vec<_>>(),
        )
    }
}

/// Footer-friendly description of a store failure.
fn describe(err: StoreError) -> String {
    surface_error(&anyhow::Error::from(err))
}
