//! Core library surface for the Psalms reader.
//!
//! The highlight store and query layer are usable without the terminal UI:
//! `db` owns persistence, `query` joins highlights with the `corpus`, and
//! `ui` is the Ratatui front-end the binary drives.
pub mod config;
pub mod corpus;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;
pub mod query;
pub mod ui;

/// Persistence entry points used by `main.rs` and integration tests.
pub use db::{HighlightMap, HighlightStore, KeyValueStore, SqliteStore};

/// Domain types passed between the store, the query layer, and the UI.
pub use models::{ColorGroup, HighlightColor, HighlightedVerse, VerseRef};

pub use corpus::Corpus;
pub use error::{CorpusError, DecodeError, StoreError};
pub use query::HighlightQuery;

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
