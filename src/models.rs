//! Domain models shared by the highlight store, the query layer, and the TUI.
//! These stay light-weight value types so the persistence and presentation
//! layers can pass them around freely. The one piece of real logic here is
//! the highlight key codec, which is the only identity the substrate knows.

use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::{DecodeError, KeyPart};

/// Prefix shared by every highlight key in the substrate. Anything else in
/// the key-value store belongs to someone else and is ignored.
pub const KEY_PREFIX: &str = "psalm-";

/// Identifies a single verse. Both numbers are positive by construction so a
/// malformed key can never sneak in as "chapter 0".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VerseRef {
    pub chapter: NonZeroU32,
    pub verse: NonZeroU32,
}

impl VerseRef {
    pub const fn new(chapter: NonZeroU32, verse: NonZeroU32) -> Self {
        Self { chapter, verse }
    }

    /// Build a reference from raw integers, rejecting zero in either slot.
    pub fn checked(chapter: u32, verse: u32) -> Option<Self> {
        Some(Self::new(NonZeroU32::new(chapter)?, NonZeroU32::new(verse)?))
    }

    /// Encode as the persisted `psalm-<chapter>:<verse>` key.
    pub fn key(&self) -> String {
        format!("{KEY_PREFIX}{}:{}", self.chapter, self.verse)
    }

    /// Decode a persisted key. Only the exact form produced by [`key`] is
    /// accepted: no zero padding, no signs, no surrounding whitespace.
    ///
    /// [`key`]: VerseRef::key
    pub fn from_key(key: &str) -> Result<Self, DecodeError> {
        let rest = key
            .strip_prefix(KEY_PREFIX)
            .ok_or_else(|| DecodeError::MissingPrefix(key.to_string()))?;
        let (chapter, verse) = rest
            .split_once(':')
            .ok_or_else(|| DecodeError::MissingSeparator(key.to_string()))?;

        Ok(Self {
            chapter: parse_key_number(key, KeyPart::Chapter, chapter)?,
            verse: parse_key_number(key, KeyPart::Verse, verse)?,
        })
    }
}

/// Prefix that selects every highlight key of one chapter. The trailing `:`
/// keeps chapter 2 from matching chapter 23.
pub fn chapter_prefix(chapter: NonZeroU32) -> String {
    format!("{KEY_PREFIX}{chapter}:")
}

fn parse_key_number(key: &str, part: KeyPart, raw: &str) -> Result<NonZeroU32, DecodeError> {
    let canonical =
        !raw.is_empty() && !raw.starts_with('0') && raw.bytes().all(|b| b.is_ascii_digit());

    canonical
        .then(|| raw.parse::<NonZeroU32>().ok())
        .flatten()
        .ok_or_else(|| DecodeError::InvalidNumber {
            key: key.to_string(),
            part,
            value: raw.to_string(),
        })
}

impl fmt::Display for VerseRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.chapter, self.verse)
    }
}

impl FromStr for VerseRef {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_key(s)
    }
}

/// Opaque highlight color token. The store persists whatever string the
/// caller hands it; only the presentation palette gives it meaning.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HighlightColor(String);

impl HighlightColor {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for HighlightColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for HighlightColor {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for HighlightColor {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

/// One chapter of the bundled corpus.
#[derive(Debug, Clone, Deserialize)]
pub struct Chapter {
    pub chapter: NonZeroU32,
    pub verses: Vec<Verse>,
}

impl Chapter {
    pub fn verse(&self, number: NonZeroU32) -> Option<&Verse> {
        self.verses.iter().find(|verse| verse.verse == number)
    }

    /// Reference for the verse at `index` in reading order.
    pub fn verse_ref(&self, index: usize) -> Option<VerseRef> {
        self.verses
            .get(index)
            .map(|verse| VerseRef::new(self.chapter, verse.verse))
    }
}

/// A numbered verse and its text.
#[derive(Debug, Clone, Deserialize)]
pub struct Verse {
    pub verse: NonZeroU32,
    pub text: String,
}

/// A highlight joined with the verse text it points at. This is what the
/// library view renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightedVerse {
    pub verse_ref: VerseRef,
    pub text: String,
    pub color: HighlightColor,
}

/// Every resolvable highlight sharing one raw color value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorGroup {
    pub color: HighlightColor,
    pub verses: Vec<HighlightedVerse>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vref(chapter: u32, verse: u32) -> VerseRef {
        VerseRef::checked(chapter, verse).expect("positive verse ref")
    }

    #[test]
    fn encodes_without_padding() {
        assert_eq!(vref(23, 1).key(), "psalm-23:1");
        assert_eq!(vref(119, 176).key(), "psalm-119:176");
    }

    #[test]
    fn decodes_what_it_encodes() {
        let verse_ref = vref(23, 1);
        let decoded = VerseRef::from_key(&verse_ref.key()).unwrap();
        assert_eq!(decoded, verse_ref);
        assert_eq!("psalm-90:17".parse::<VerseRef>().unwrap(), vref(90, 17));
    }

    #[test]
    fn rejects_foreign_prefix() {
        assert_eq!(
            VerseRef::from_key("hymn-23:1"),
            Err(DecodeError::MissingPrefix("hymn-23:1".to_string()))
        );
    }

    #[test]
    fn rejects_missing_separator() {
        assert_eq!(
            VerseRef::from_key("psalm-231"),
            Err(DecodeError::MissingSeparator("psalm-231".to_string()))
        );
    }

    #[test]
    fn rejects_non_canonical_numbers() {
        for key in [
            "psalm-abc:1",
            "psalm-23:",
            "psalm-:1",
            "psalm-023:1",
            "psalm-23:01",
            "psalm-0:1",
            "psalm-23:0",
            "psalm-+23:1",
            "psalm--23:1",
            "psalm- 23:1",
            "psalm-23:1 ",
            "psalm-23:1:2",
            "psalm-4294967296:1",
        ] {
            assert!(
                matches!(
                    VerseRef::from_key(key),
                    Err(DecodeError::InvalidNumber { .. })
                ),
                "{key} should not decode"
            );
        }
    }

    #[test]
    fn reports_which_part_failed() {
        match VerseRef::from_key("psalm-23:x") {
            Err(DecodeError::InvalidNumber { part, value, .. }) => {
                assert_eq!(part, KeyPart::Verse);
                assert_eq!(value, "x");
            }
            other => panic!("unexpected decode result: {other:?}"),
        }
    }

    #[test]
    fn checked_rejects_zero() {
        assert!(VerseRef::checked(0, 1).is_none());
        assert!(VerseRef::checked(1, 0).is_none());
    }

    #[test]
    fn chapter_prefix_is_colon_terminated() {
        let prefix = chapter_prefix(NonZeroU32::new(2).unwrap());
        assert_eq!(prefix, "psalm-2:");
        assert!(!"psalm-23:1".starts_with(&prefix));
    }
}
