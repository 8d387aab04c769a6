//! The string key-value substrate underneath the highlight store.

use std::path::Path;

use anyhow::Result;
use rusqlite::{params, Connection, OptionalExtension};

use crate::error::StoreError;

use super::connection::{open_database, open_in_memory};

/// Minimal local key-value contract. Read methods fail with
/// [`StoreError::Read`], write methods with [`StoreError::Write`].
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Insert or overwrite.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Delete if present. A missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StoreError>;

    /// Keys starting with the literal `prefix`, in first-insertion order.
    fn list_keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, StoreError>;

    /// One `(key, value)` pair per requested key, in request order. Keys that
    /// disappeared since they were listed come back as `None`.
    fn get_many(&self, keys: &[String]) -> Result<Vec<(String, Option<String>)>, StoreError>;
}

/// SQLite-backed substrate over the `kv` table.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self {
            conn: open_database(path)?,
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        Ok(Self {
            conn: open_in_memory()?,
        })
    }

    /// Wrap a bare connection as-is, without ensuring the schema.
    #[cfg(test)]
    pub(crate) fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.conn
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()
            .map_err(|err| StoreError::read(key, err))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        // ON CONFLICT keeps the original rowid, so overwriting a highlight
        // does not move it in the listing order.
        self.conn
            .execute(
                "INSERT INTO kv (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                params![key, value],
            )
            .map_err(|err| StoreError::write(key, err))?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", [key])
            .map_err(|err| StoreError::write(key, err))?;
        Ok(())
    }

    fn list_keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        // substr instead of LIKE: `_` and `%` in a prefix must stay literal.
        let mut stmt = self
            .conn
            .prepare_cached(
                "SELECT key FROM kv
                 WHERE substr(key, 1, length(?1)) = ?1
                 ORDER BY rowid",
            )
            .map_err(|err| StoreError::read(prefix, err))?;

        let keys = stmt
            .query_map([prefix], |row| row.get(0))
            .map_err(|err| StoreError::read(prefix, err))?
            .collect::<Result<Vec<String>, _>>()
            .map_err(|err| StoreError::read(prefix, err))?;

        Ok(keys)
    }

    fn get_many(&self, keys: &[String]) -> Result<Vec<(String, Option<String>)>, StoreError> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT value FROM kv WHERE key = ?1")
            .map_err(|err| StoreError::read(keys.join(","), err))?;

        let mut entries = Vec::with_capacity(keys.len());
        for key in keys {
            let value: Option<String> = stmt
                .query_row([key], |row| row.get(0))
                .optional()
                .map_err(|err| StoreError::read(key.as_str(), err))?;
            entries.push((key.clone(), value));
        }

        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> SqliteStore {
        SqliteStore::open_in_memory().unwrap()
    }

    #[test]
    fn set_get_remove() {
        let kv = store();
        assert_eq!(kv.get("a").unwrap(), None);
        kv.set("a", "1").unwrap();
        assert_eq!(kv.get("a").unwrap().as_deref(), Some("1"));
        kv.set("a", "2").unwrap();
        assert_eq!(kv.get("a").unwrap().as_deref(), Some("2"));
        kv.remove("a").unwrap();
        assert_eq!(kv.get("a").unwrap(), None);
        kv.remove("a").unwrap();
    }

    #[test]
    fn prefix_listing_keeps_first_insertion_order() {
        let kv = store();
        kv.set("psalm-90:1", "x").unwrap();
        kv.set("other", "y").unwrap();
        kv.set("psalm-23:1", "x").unwrap();
        kv.set("psalm-90:1", "z").unwrap();

        assert_eq!(
            kv.list_keys_with_prefix("psalm-").unwrap(),
            vec!["psalm-90:1".to_string(), "psalm-23:1".to_string()]
        );
    }

    #[test]
    fn prefix_is_literal() {
        let kv = store();
        kv.set("a_b", "1").unwrap();
        kv.set("axb", "2").unwrap();
        kv.set("a%c", "3").unwrap();

        assert_eq!(kv.list_keys_with_prefix("a_").unwrap(), vec!["a_b".to_string()]);
        assert_eq!(kv.list_keys_with_prefix("a%").unwrap(), vec!["a%c".to_string()]);
    }

    #[test]
    fn get_many_reports_missing_keys() {
        let kv = store();
        kv.set("k1", "v1").unwrap();
        let keys = vec!["k1".to_string(), "gone".to_string()];

        assert_eq!(
            kv.get_many(&keys).unwrap(),
            vec![
                ("k1".to_string(), Some("v1".to_string())),
                ("gone".to_string(), None),
            ]
        );
    }

    #[test]
    fn missing_schema_surfaces_as_store_errors() {
        let conn = Connection::open_in_memory().unwrap();
        let kv = SqliteStore::from_connection(conn);

        let err = kv.set("psalm-1:1", "Red").unwrap_err();
        assert!(matches!(err, StoreError::Write { .. }));
        assert_eq!(err.key(), "psalm-1:1");

        assert!(matches!(kv.get("psalm-1:1"), Err(StoreError::Read { .. })));
    }
}
