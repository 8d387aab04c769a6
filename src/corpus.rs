//! The read-only scripture corpus. It is parsed once at start-up and shared
//! by reference for the rest of the session.

use std::collections::HashSet;
use std::fs;
use std::num::NonZeroU32;
use std::path::Path;

use tracing::info;

use crate::error::CorpusError;
use crate::models::{Chapter, Verse, VerseRef};

/// JSON document compiled into the binary.
const BUNDLED_PSALMS: &str = include_str!("../data/psalms.json");

#[derive(Debug, Clone)]
pub struct Corpus {
    chapters: Vec<Chapter>,
}

impl Corpus {
    /// Parse the corpus that ships with the binary.
    pub fn bundled() -> Result<Self, CorpusError> {
        Self::from_json(BUNDLED_PSALMS)
    }

    /// Load an override corpus from disk, e.g. a different translation.
    pub fn from_path(path: &Path) -> Result<Self, CorpusError> {
        let raw = fs::read_to_string(path)?;
        let corpus = Self::from_json(&raw)?;
        info!(path = %path.display(), chapters = corpus.chapters.len(), "loaded corpus override");
        Ok(corpus)
    }

    pub fn from_json(raw: &str) -> Result<Self, CorpusError> {
        let chapters: Vec<Chapter> = serde_json::from_str(raw)?;
        Self::from_chapters(chapters)
    }

    /// Wrap already-parsed chapters after checking numbers are unique.
    pub fn from_chapters(chapters: Vec<Chapter>) -> Result<Self, CorpusError> {
        let mut seen_chapters = HashSet::new();
        for chapter in &chapters {
            if !seen_chapters.insert(chapter.chapter) {
                return Err(CorpusError::DuplicateChapter(chapter.chapter.get()));
            }
            let mut seen_verses = HashSet::new();
            for verse in &chapter.verses {
                if !seen_verses.insert(verse.verse) {
                    return Err(CorpusError::DuplicateVerse {
                        chapter: chapter.chapter.get(),
                        verse: verse.verse.get(),
                    });
                }
            }
        }
        Ok(Self { chapters })
    }

    /// Chapters in document order.
    pub fn chapters(&self) -> &[Chapter] {
        &self.chapters
    }

    pub fn chapter(&self, number: NonZeroU32) -> Option<&Chapter> {
        self.chapters.iter().find(|chapter| chapter.chapter == number)
    }

    /// Look up a verse. `None` means the reference is stale or never existed.
    pub fn verse(&self, verse_ref: VerseRef) -> Option<&Verse> {
        self.chapter(verse_ref.chapter)?.verse(verse_ref.verse)
    }

    pub fn is_empty(&self) -> bool {
        self.chapters.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_corpus_parses() {
        let corpus = Corpus::bundled().unwrap();
        assert!(!corpus.is_empty());
        let shepherd = corpus.verse(VerseRef::checked(23, 1).unwrap()).unwrap();
        assert_eq!(shepherd.text, "The LORD is my shepherd; I shall not want.");
    }

    #[test]
    fn missing_verse_is_none() {
        let corpus = Corpus::bundled().unwrap();
        assert!(corpus.verse(VerseRef::checked(999, 1).unwrap()).is_none());
        assert!(corpus.verse(VerseRef::checked(23, 99).unwrap()).is_none());
    }

    #[test]
    fn rejects_zero_numbers() {
        let raw = r#"[{"chapter": 0, "verses": []}]"#;
        assert!(matches!(Corpus::from_json(raw), Err(CorpusError::Parse(_))));
    }

    #[test]
    fn rejects_duplicate_chapters() {
        let raw = r#"[{"chapter": 1, "verses": []}, {"chapter": 1, "verses": []}]"#;
        assert!(matches!(
            Corpus::from_json(raw),
            Err(CorpusError::DuplicateChapter(1))
        ));
    }

    #[test]
    fn rejects_duplicate_verses() {
        let raw = r#"[{"chapter": 3, "verses": [
            {"verse": 1, "text": "a"},
            {"verse": 1, "text": "b"}
        ]}]"#;
        assert!(matches!(
            Corpus::from_json(raw),
            Err(CorpusError::DuplicateVerse {
                chapter: 3,
                verse: 1
            })
        ));
    }
}
