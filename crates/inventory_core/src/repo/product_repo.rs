//! Product repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD, substring search and low-stock queries over `products`.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths validate before any SQL mutation; a rejected write changes nothing.
//! - Read paths reject invalid persisted state instead of masking it.
//! - Listing order is `id ASC`; low-stock order is `quantity ASC, id ASC`.

use crate::db::{DbError, FOLD_CASE_FN};
use crate::model::product::{NewProduct, Product, ProductId};
use crate::model::validation::{
    Confirmation, Field, ValidationError, ValidationReason, MAX_QUANTITY,
};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const PRODUCT_SELECT_SQL: &str = "SELECT
    id,
    name,
    description,
    quantity,
    price,
    category
FROM products";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for product persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(ValidationError),
    Db(DbError),
    NotFound(ProductId),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "product not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted product data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Quantity transition reported by [`ProductRepository::update_quantity`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantityChange {
    pub product_id: ProductId,
    pub name: String,
    pub previous: i64,
    pub current: i64,
}

/// Result of a confirmed-or-declined delete.
#[derive(Debug, Clone, PartialEq)]
pub enum DeleteOutcome {
    /// Row removed (or already gone by the time the delete ran).
    Deleted(Product),
    /// Caller declined; nothing changed.
    Cancelled(Product),
}

impl DeleteOutcome {
    pub fn product(&self) -> &Product {
        match self {
            Self::Deleted(product) | Self::Cancelled(product) => product,
        }
    }
}

/// One row of the low-stock report.
#[derive(Debug, Clone, PartialEq)]
pub struct LowStockEntry {
    pub product: Product,
    pub out_of_stock: bool,
}

/// Repository interface for product operations.
pub trait ProductRepository {
    fn create_product(&self, product: &NewProduct) -> RepoResult<Product>;
    fn list_products(&self) -> RepoResult<Vec<Product>>;
    fn get_product(&self, id: ProductId) -> RepoResult<Option<Product>>;
    fn update_quantity(&self, id: ProductId, new_quantity: i64) -> RepoResult<QuantityChange>;
    fn delete_product(&self, id: ProductId, confirmation: Confirmation)
        -> RepoResult<DeleteOutcome>;
    fn find_by_name_contains(&self, needle: &str) -> RepoResult<Vec<Product>>;
    fn find_by_category_contains(&self, needle: &str) -> RepoResult<Vec<Product>>;
    fn low_stock(&self, threshold: i64) -> RepoResult<Vec<LowStockEntry>>;
}

/// SQLite-backed product repository.
pub struct SqliteProductRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProductRepository<'conn> {
    /// Wraps a connection returned by `open_db`/`open_db_in_memory`.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn query_products(
        &self,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> RepoResult<Vec<Product>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params)?;
        let mut products = Vec::new();

        while let Some(row) = rows.next()? {
            products.push(parse_product_row(row)?);
        }

        Ok(products)
    }

    fn find_by_column_contains(&self, column: &str, needle: &str) -> RepoResult<Vec<Product>> {
        if needle.is_empty() {
            return self.list_products();
        }

        let folded = needle.to_lowercase();
        self.query_products(
            &format!(
                "{PRODUCT_SELECT_SQL}
                 WHERE instr({FOLD_CASE_FN}({column}), ?1) > 0
                 ORDER BY id ASC;"
            ),
            [folded],
        )
    }
}

impl ProductRepository for SqliteProductRepository<'_> {
    fn create_product(&self, product: &NewProduct) -> RepoResult<Product> {
        product.validate()?;

        self.conn.execute(
            "INSERT INTO products (
                name,
                description,
                quantity,
                price,
                category
            ) VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                product.name.as_str(),
                product.description.as_deref(),
                product.quantity,
                product.price,
                product.category.as_deref(),
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        Ok(product.clone().into_product(id))
    }

    fn list_products(&self) -> RepoResult<Vec<Product>> {
        self.query_products(&format!("{PRODUCT_SELECT_SQL} ORDER BY id ASC;"), [])
    }

    fn get_product(&self, id: ProductId) -> RepoResult<Option<Product>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PRODUCT_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_product_row(row)?));
        }

        Ok(None)
    }

    fn update_quantity(&self, id: ProductId, new_quantity: i64) -> RepoResult<QuantityChange> {
        if new_quantity < 0 {
            return Err(ValidationError::new(Field::Quantity, ValidationReason::Negative).into());
        }
        if new_quantity > MAX_QUANTITY {
            return Err(ValidationError::new(Field::Quantity, ValidationReason::TooLarge).into());
        }

        let tx = self.conn.unchecked_transaction()?;
        let current = tx
            .query_row(
                "SELECT name, quantity FROM products WHERE id = ?1;",
                [id],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)),
            )
            .optional()?;
        let Some((name, previous)) = current else {
            return Err(RepoError::NotFound(id));
        };

        tx.execute(
            "UPDATE products SET quantity = ?1 WHERE id = ?2;",
            params![new_quantity, id],
        )?;
        tx.commit()?;

        Ok(QuantityChange {
            product_id: id,
            name,
            previous,
            current: new_quantity,
        })
    }

    fn delete_product(
        &self,
        id: ProductId,
        confirmation: Confirmation,
    ) -> RepoResult<DeleteOutcome> {
        let Some(product) = self.get_product(id)? else {
            return Err(RepoError::NotFound(id));
        };

        if !confirmation.is_affirmative() {
            return Ok(DeleteOutcome::Cancelled(product));
        }

        // Zero affected rows means someone else already removed it.
        self.conn.execute("DELETE FROM products WHERE id = ?1;", [id])?;

        Ok(DeleteOutcome::Deleted(product))
    }

    fn find_by_name_contains(&self, needle: &str) -> RepoResult<Vec<Product>> {
        self.find_by_column_contains("name", needle)
    }

    fn find_by_category_contains(&self, needle: &str) -> RepoResult<Vec<Product>> {
        self.find_by_column_contains("category", needle)
    }

    fn low_stock(&self, threshold: i64) -> RepoResult<Vec<LowStockEntry>> {
        if threshold < 0 {
            return Err(ValidationError::new(Field::Threshold, ValidationReason::Negative).into());
        }

        let products = self.query_products(
            &format!(
                "{PRODUCT_SELECT_SQL}
                 WHERE quantity <= ?1
                 ORDER BY quantity ASC, id ASC;"
            ),
            [threshold],
        )?;

        Ok(products
            .into_iter()
            .map(|product| LowStockEntry {
                out_of_stock: product.is_out_of_stock(),
                product,
            })
            .collect())
    }
}

fn parse_product_row(row: &Row<'_>) -> RepoResult<Product> {
    let product = Product {
        id: row.get("id")?,
        name: row.get("name")?,
        description: non_empty(row.get("description")?),
        quantity: row.get("quantity")?,
        price: row.get("price")?,
        category: non_empty(row.get("category")?),
    };

    product.validate().map_err(|err| {
        RepoError::InvalidData(format!("row id {} violates record invariant: {err}", product.id))
    })?;
    Ok(product)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.is_empty())
}
