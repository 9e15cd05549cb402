//! Per-operation connection scope over a database file.
//!
//! # Responsibility
//! - Remember where the inventory database lives.
//! - Open a fresh connection for each operation and release it afterwards.
//!
//! # Invariants
//! - The connection is dropped on every exit path of [`Store::with_connection`]
//!   (success, validation failure, storage failure or unwinding panic).
//! - Opening always runs schema bootstrap, so a missing file is created.

use super::open::open_db;
use super::DbError;
use log::debug;
use rusqlite::Connection;
use std::path::{Path, PathBuf};

/// File-backed storage gateway handing out scoped connections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Store {
    path: PathBuf,
}

impl Store {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Database file location.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Opens the store once to create the file and schema.
    ///
    /// Intended for process startup; repeated calls are harmless.
    pub fn ensure_ready(&self) -> Result<(), DbError> {
        self.with_connection(|_| Ok::<(), DbError>(()))
    }

    /// Runs `f` with a freshly opened connection and releases it afterwards.
    ///
    /// Errors from opening are converted into the caller's error type, so
    /// one `?` covers both storage bootstrap and the operation itself.
    pub fn with_connection<T, E>(&self, f: impl FnOnce(&Connection) -> Result<T, E>) -> Result<T, E>
    where
        E: From<DbError>,
    {
        let conn = open_db(&self.path)?;
        let result = f(&conn);
        drop(conn);
        debug!(
            "event=store_scope module=db status={} action=release",
            if result.is_ok() { "ok" } else { "error" }
        );
        result
    }
}

#[cfg(test)]
mod tests {
    use super::Store;
    use crate::db::DbError;
    use rusqlite::Connection;

    #[test]
    fn ensure_ready_creates_missing_file_and_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("inventario.db");
        let store = Store::new(&path);

        store.ensure_ready().unwrap();
        store.ensure_ready().unwrap();

        assert!(path.exists());
        assert_eq!(store.path(), path.as_path());
    }

    #[test]
    fn with_connection_propagates_closure_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path().join("inventario.db"));

        let err = store
            .with_connection(|conn| {
                conn.execute("INSERT INTO missing_table VALUES (1);", [])?;
                Ok::<(), DbError>(())
            })
            .unwrap_err();
        assert!(matches!(err, DbError::Sqlite(_)));
    }

    #[test]
    fn failed_operation_releases_its_connection_and_write_lock() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inventario.db");
        let store = Store::new(&path);

        let err = store
            .with_connection(|conn| {
                conn.execute_batch(
                    "BEGIN IMMEDIATE;
                     INSERT INTO products (name, quantity, price) VALUES ('Bolt', 1, 1.0);",
                )?;
                Err::<(), DbError>(DbError::Sqlite(rusqlite::Error::InvalidQuery))
            })
            .unwrap_err();
        assert!(matches!(err, DbError::Sqlite(rusqlite::Error::InvalidQuery)));

        let conn = Connection::open(&path).unwrap();
        conn.execute_batch("PRAGMA locking_mode = EXCLUSIVE; BEGIN EXCLUSIVE; COMMIT;")
            .unwrap();
        let rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM products;", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 0);
    }
}
