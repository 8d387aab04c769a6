use std::num::NonZeroU32;

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::error::StoreError;
use crate::models::{chapter_prefix, HighlightColor, VerseRef, KEY_PREFIX};

use super::kv::KeyValueStore;

/// Highlights keyed by verse, in the order the substrate listed them.
pub type HighlightMap = IndexMap<VerseRef, HighlightColor>;

/// Durable verse → color mapping on top of a key-value substrate. The store
/// never consults the corpus: old keys must stay readable even after the
/// text they point at changes.
pub struct HighlightStore<S> {
    kv: S,
}

impl<S: KeyValueStore> HighlightStore<S> {
    pub fn new(kv: S) -> Self {
        Self { kv }
    }

    /// Assign `color` to a verse, replacing any earlier color. The highlight
    /// only counts as applied once this returns `Ok`.
    pub fn set_highlight(
        &self,
        verse_ref: VerseRef,
        color: &HighlightColor,
    ) -> Result<(), StoreError> {
        self.kv.set(&verse_ref.key(), color.as_str())?;
        debug!(verse = %verse_ref, color = %color, "highlight saved");
        Ok(())
    }

    /// Clear a verse's highlight. Clearing an unhighlighted verse is a no-op.
    pub fn remove_highlight(&self, verse_ref: VerseRef) -> Result<(), StoreError> {
        self.kv.remove(&verse_ref.key())?;
        debug!(verse = %verse_ref, "highlight removed");
        Ok(())
    }

    pub fn get_highlight(&self, verse_ref: VerseRef) -> Result<Option<HighlightColor>, StoreError> {
        Ok(self.kv.get(&verse_ref.key())?.map(HighlightColor::from))
    }

    /// Every highlight in one chapter. The prefix ends in `:`, so every key
    /// it lists decodes to this chapter.
    pub fn highlights_for_chapter(&self, chapter: NonZeroU32) -> Result<HighlightMap, StoreError> {
        self.scan(&chapter_prefix(chapter))
    }

    /// Every highlight in the store.
    pub fn all_highlights(&self) -> Result<HighlightMap, StoreError> {
        self.scan(KEY_PREFIX)
    }

    /// List, batch-read, and decode every key under `prefix`. Keys that fail
    /// to decode are legacy or foreign rows: they are logged and skipped so
    /// one bad row never hides the rest.
    fn scan(&self, prefix: &str) -> Result<HighlightMap, StoreError> {
        let keys = self.kv.list_keys_with_prefix(prefix)?;
        let entries = self.kv.get_many(&keys)?;

        let mut highlights = HighlightMap::with_capacity(entries.len());
        for (key, value) in entries {
            let Some(value) = value else {
                debug!(%key, "highlight vanished between list and read");
                continue;
            };
            match VerseRef::from_key(&key) {
                Ok(verse_ref) => {
                    highlights.insert(verse_ref, HighlightColor::from(value));
                }
                Err(err) => warn!(%key, error = %err, "skipping malformed highlight key"),
            }
        }

        Ok(highlights)
    }
}
