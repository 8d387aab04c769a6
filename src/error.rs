//! Error taxonomy for the highlight core. The store only ever fails because
//! the substrate failed; key decoding and corpus loading have their own types
//! so callers can tell a corrupt row apart from a broken disk.

use std::error::Error as StdError;
use std::io;

use thiserror::Error;

/// Boxed substrate failure. SQLite is the only production substrate, but the
/// trait boundary keeps other backends (and test doubles) able to report.
pub type SubstrateError = Box<dyn StdError + Send + Sync + 'static>;

/// Failure talking to the key-value substrate.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read `{key}` from the highlight store")]
    Read {
        key: String,
        #[source]
        source: SubstrateError,
    },
    #[error("failed to write `{key}` to the highlight store")]
    Write {
        key: String,
        #[source]
        source: SubstrateError,
    },
}

impl StoreError {
    pub fn read(key: impl Into<String>, source: impl Into<SubstrateError>) -> Self {
        StoreError::Read {
            key: key.into(),
            source: source.into(),
        }
    }

    pub fn write(key: impl Into<String>, source: impl Into<SubstrateError>) -> Self {
        StoreError::Write {
            key: key.into(),
            source: source.into(),
        }
    }

    /// The substrate key the failing operation was addressing.
    pub fn key(&self) -> &str {
        match self {
            StoreError::Read { key, .. } | StoreError::Write { key, .. } => key,
        }
    }
}

/// Which half of a `psalm-<chapter>:<verse>` key failed to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPart {
    Chapter,
    Verse,
}

impl std::fmt::Display for KeyPart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeyPart::Chapter => f.write_str("chapter"),
            KeyPart::Verse => f.write_str("verse"),
        }
    }
}

/// A substrate key that is not a well-formed highlight key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("key `{0}` does not start with `psalm-`")]
    MissingPrefix(String),
    #[error("key `{0}` has no `:` between chapter and verse")]
    MissingSeparator(String),
    #[error("key `{key}` has an invalid {part} number `{value}`")]
    InvalidNumber {
        key: String,
        part: KeyPart,
        value: String,
    },
}

/// Problems loading the scripture corpus.
#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("failed to read corpus file")]
    Io(#[from] io::Error),
    #[error("corpus is not valid JSON")]
    Parse(#[from] serde_json::Error),
    #[error("chapter {0} appears more than once")]
    DuplicateChapter(u32),
    #[error("verse {verse} appears more than once in chapter {chapter}")]
    DuplicateVerse { chapter: u32, verse: u32 },
}
