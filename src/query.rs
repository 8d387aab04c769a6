//! Read-only views that join stored highlights with the corpus. Nothing in
//! here writes; every call recomputes from the store.

use std::collections::BTreeMap;
use std::num::NonZeroU32;

use indexmap::IndexMap;
use tracing::debug;

use crate::corpus::Corpus;
use crate::db::{HighlightStore, KeyValueStore};
use crate::error::StoreError;
use crate::models::{ColorGroup, HighlightColor, HighlightedVerse};

pub struct HighlightQuery<'a, S> {
    store: &'a HighlightStore<S>,
    corpus: &'a Corpus,
}

impl<'a, S: KeyValueStore> HighlightQuery<'a, S> {
    pub fn new(store: &'a HighlightStore<S>, corpus: &'a Corpus) -> Self {
        Self { store, corpus }
    }

    /// Group every highlight by its raw color. Groups appear in the order
    /// their color is first seen in the store scan. Highlights whose verse no
    /// longer exists in the corpus are dropped.
    pub fn list_by_color(&self) -> Result<Vec<ColorGroup>, StoreError> {
        let mut groups: IndexMap<HighlightColor, Vec<HighlightedVerse>> = IndexMap::new();

        for (verse_ref, color) in self.store.all_highlights()? {
            let Some(verse) = self.corpus.verse(verse_ref) else {
                debug!(verse = %verse_ref, "dropping highlight on missing verse");
                continue;
            };
            groups
                .entry(color.clone())
                .or_default()
                .push(HighlightedVerse {
                    verse_ref,
                    text: verse.text.clone(),
                    color,
                });
        }

        Ok(groups
            .into_iter()
            .map(|(color, verses)| ColorGroup { color, verses })
            .collect())
    }

    /// Verse number → color for one chapter, limited to verses the corpus
    /// still has. Unhighlighted verses are simply absent.
    pub fn resolve_chapter_highlights(
        &self,
        chapter: NonZeroU32,
    ) -> Result<BTreeMap<NonZeroU32, HighlightColor>, StoreError> {
        let highlights = self.store.highlights_for_chapter(chapter)?;
        let Some(known) = self.corpus.chapter(chapter) else {
            return Ok(BTreeMap::new());
        };

        Ok(highlights
            .into_iter()
            .filter(|(verse_ref, _)| known.verse(verse_ref.verse).is_some())
            .map(|(verse_ref, color)| (verse_ref.verse, color))
            .collect())
    }
}
