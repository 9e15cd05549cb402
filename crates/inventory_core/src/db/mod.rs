//! SQLite storage gateway for the inventory.
//!
//! # Responsibility
//! - Open and configure SQLite connections for the inventory core.
//! - Create the `products` schema idempotently on every open.
//! - Scope one connection per operation through [`Store`].
//!
//! # Invariants
//! - Core code must not read/write product rows before `ensure_schema` succeeds.
//! - A connection handed out by [`Store::with_connection`] never outlives the
//!   closure it was opened for.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

mod open;
pub mod schema;
mod store;

pub(crate) use open::FOLD_CASE_FN;
pub use open::{open_db, open_db_in_memory};
pub use schema::ensure_schema;
pub use store::Store;

pub type DbResult<T> = Result<T, DbError>;

/// Storage failure: the `StorageError` surfaced to operators.
#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::Io { path, source } => write!(
                f,
                "cannot prepare database path `{}`: {source}",
                path.display()
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::Io { source, .. } => Some(source),
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
