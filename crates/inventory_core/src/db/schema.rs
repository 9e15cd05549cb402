//! Product table definition.
//!
//! # Invariants
//! - `ensure_schema` is idempotent and safe to run on every startup.
//! - `AUTOINCREMENT` keeps deleted ids from ever being reassigned.
//! - CHECK constraints mirror the record validator so that a row violating
//!   `quantity >= 0`, `price >= 0` or a non-empty name cannot be stored even
//!   by a caller that bypasses validation.

use super::DbResult;
use rusqlite::Connection;

const PRODUCTS_SCHEMA_SQL: &str = include_str!("schema.sql");

/// Creates the `products` table and its indexes when missing.
pub fn ensure_schema(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(PRODUCTS_SCHEMA_SQL)?;
    Ok(())
}

/// Returns whether the `products` table exists on this connection.
pub fn products_table_exists(conn: &Connection) -> DbResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = 'products'
        );",
        [],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

#[cfg(test)]
mod tests {
    use super::{ensure_schema, products_table_exists};
    use rusqlite::Connection;

    #[test]
    fn ensure_schema_creates_table_once() {
        let conn = Connection::open_in_memory().unwrap();
        assert!(!products_table_exists(&conn).unwrap());

        ensure_schema(&conn).unwrap();
        ensure_schema(&conn).unwrap();

        assert!(products_table_exists(&conn).unwrap());
    }

    #[test]
    fn check_constraints_reject_negative_quantity() {
        let conn = Connection::open_in_memory().unwrap();
        ensure_schema(&conn).unwrap();

        let result = conn.execute(
            "INSERT INTO products (name, quantity, price) VALUES ('Bolt', -1, 1.0);",
            [],
        );
        assert!(result.is_err());
    }
}
