//! Persistence module split across logical submodules.

mod connection;
mod highlights;
mod kv;

pub use connection::{ensure_schema, open_database};
pub use highlights::{HighlightMap, HighlightStore};
pub use kv::{KeyValueStore, SqliteStore};
