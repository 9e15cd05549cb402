//! Inventory use-case service.
//!
//! # Responsibility
//! - Provide one entry point per operator command (register, list, update
//!   quantity, delete, search, low-stock report).
//! - Validate every raw field before the repository is touched.
//! - Emit one metadata-only log event per use-case.
//!
//! # Invariants
//! - Validation is composed up front; a failing field never reaches storage.
//! - Service layer remains storage-agnostic; connection scope is owned by
//!   [`with_inventory`].

use crate::db::{DbError, Store};
use crate::model::product::{Product, ProductId};
use crate::model::validation::{
    validate_new_product, validate_quantity, validate_threshold, Confirmation, ProductDraft,
    ValidationError,
};
use crate::repo::product_repo::{
    DeleteOutcome, LowStockEntry, ProductRepository, QuantityChange, RepoError,
    SqliteProductRepository,
};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Operator-facing error taxonomy. None of these is fatal to the process.
#[derive(Debug)]
pub enum ServiceError {
    /// Malformed or out-of-range input; nothing was written.
    Validation(ValidationError),
    /// Referenced product does not exist; nothing was written.
    NotFound(ProductId),
    /// I/O or SQLite failure; the operation aborted.
    Storage(DbError),
    /// A stored row breaks a record invariant.
    InvalidData(String),
}

impl ServiceError {
    /// Stable short code used in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::NotFound(_) => "not_found",
            Self::Storage(_) => "storage",
            Self::InvalidData(_) => "invalid_data",
        }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "no product found with id {id}"),
            Self::Storage(err) => write!(f, "database error: {err}"),
            Self::InvalidData(message) => write!(f, "{message}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Storage(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            RepoError::Db(err) => Self::Storage(err),
            RepoError::NotFound(id) => Self::NotFound(id),
            RepoError::InvalidData(message) => Self::InvalidData(message),
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for ServiceError {
    fn from(value: DbError) -> Self {
        Self::Storage(value)
    }
}

/// Search modes offered to the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchCriteria {
    /// Exact id lookup.
    ById(ProductId),
    /// Case-insensitive, unanchored substring of the name.
    NameContains(String),
    /// Case-insensitive, unanchored substring of the category.
    CategoryContains(String),
}

impl SearchCriteria {
    fn label(&self) -> &'static str {
        match self {
            Self::ById(_) => "id",
            Self::NameContains(_) => "name",
            Self::CategoryContains(_) => "category",
        }
    }
}

/// Products at or below a stock threshold, lowest quantity first.
#[derive(Debug, Clone, PartialEq)]
pub struct LowStockReport {
    pub threshold: i64,
    pub entries: Vec<LowStockEntry>,
}

impl LowStockReport {
    pub fn out_of_stock_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.out_of_stock)
            .count()
    }
}

/// Use-case service wrapper for product operations.
pub struct InventoryService<R: ProductRepository> {
    repo: R,
}

impl<R: ProductRepository> InventoryService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Validates all draft fields, then stores one new product.
    pub fn register(&self, draft: &ProductDraft) -> ServiceResult<Product> {
        let result = validate_new_product(draft)
            .map_err(ServiceError::from)
            .and_then(|product| Ok(self.repo.create_product(&product)?));
        match &result {
            Ok(product) => info!(
                "event=product_register module=service status=ok product_id={}",
                product.id
            ),
            Err(err) => log_failure("product_register", err),
        }
        result
    }

    /// Lists every product by ascending id.
    pub fn list(&self) -> ServiceResult<Vec<Product>> {
        let result = self.repo.list_products().map_err(ServiceError::from);
        log_count("product_list", &result);
        result
    }

    /// Exact id lookup.
    pub fn find(&self, id: ProductId) -> ServiceResult<Option<Product>> {
        Ok(self.repo.get_product(id)?)
    }

    /// Like [`Self::find`] but absence is `NotFound`.
    ///
    /// Used by the dispatcher to show what is about to be changed or deleted.
    pub fn require(&self, id: ProductId) -> ServiceResult<Product> {
        self.find(id)?.ok_or(ServiceError::NotFound(id))
    }

    /// Replaces the quantity of product `id` with the parsed `raw_quantity`.
    pub fn update_quantity(
        &self,
        id: ProductId,
        raw_quantity: &str,
    ) -> ServiceResult<QuantityChange> {
        let result = validate_quantity(raw_quantity)
            .map_err(ServiceError::from)
            .and_then(|quantity| Ok(self.repo.update_quantity(id, quantity)?));
        match &result {
            Ok(change) => info!(
                "event=product_update_quantity module=service status=ok product_id={} previous={} current={}",
                change.product_id, change.previous, change.current
            ),
            Err(err) => log_failure("product_update_quantity", err),
        }
        result
    }

    /// Deletes product `id` only when `raw_confirmation` is an explicit yes.
    pub fn delete(&self, id: ProductId, raw_confirmation: &str) -> ServiceResult<DeleteOutcome> {
        let confirmation = Confirmation::from_token(raw_confirmation);
        let result = self
            .repo
            .delete_product(id, confirmation)
            .map_err(ServiceError::from);
        match &result {
            Ok(DeleteOutcome::Deleted(product)) => info!(
                "event=product_delete module=service status=ok product_id={}",
                product.id
            ),
            Ok(DeleteOutcome::Cancelled(product)) => info!(
                "event=product_delete module=service status=cancelled product_id={}",
                product.id
            ),
            Err(err) => log_failure("product_delete", err),
        }
        result
    }

    /// Runs one search. Substring needles are trimmed; blank matches all.
    pub fn search(&self, criteria: &SearchCriteria) -> ServiceResult<Vec<Product>> {
        let result = match criteria {
            SearchCriteria::ById(id) => self
                .repo
                .get_product(*id)
                .map(|found| found.into_iter().collect::<Vec<_>>()),
            SearchCriteria::NameContains(needle) => self.repo.find_by_name_contains(needle.trim()),
            SearchCriteria::CategoryContains(needle) => {
                self.repo.find_by_category_contains(needle.trim())
            }
        }
        .map_err(ServiceError::from);

        match &result {
            Ok(products) => info!(
                "event=product_search module=service status=ok by={} count={}",
                criteria.label(),
                products.len()
            ),
            Err(err) => log_failure("product_search", err),
        }
        result
    }

    /// Builds the low-stock report for a raw, operator-entered threshold.
    pub fn low_stock_report(&self, raw_threshold: &str) -> ServiceResult<LowStockReport> {
        let result = validate_threshold(raw_threshold)
            .map_err(ServiceError::from)
            .and_then(|threshold| {
                let entries = self.repo.low_stock(threshold)?;
                Ok(LowStockReport { threshold, entries })
            });
        match &result {
            Ok(report) => info!(
                "event=low_stock_report module=service status=ok threshold={} count={} out_of_stock={}",
                report.threshold,
                report.entries.len(),
                report.out_of_stock_count()
            ),
            Err(err) => log_failure("low_stock_report", err),
        }
        result
    }
}

/// Opens `store`, runs `f` against a service bound to that connection, and
/// releases the connection before returning.
pub fn with_inventory<T>(
    store: &Store,
    f: impl FnOnce(&InventoryService<SqliteProductRepository<'_>>) -> ServiceResult<T>,
) -> ServiceResult<T> {
    store.with_connection(|conn| {
        let service = InventoryService::new(SqliteProductRepository::new(conn));
        f(&service)
    })
}

fn log_count(event: &str, result: &ServiceResult<Vec<Product>>) {
    match result {
        Ok(products) => info!(
            "event={} module=service status=ok count={}",
            event,
            products.len()
        ),
        Err(err) => log_failure(event, err),
    }
}

fn log_failure(event: &str, err: &ServiceError) {
    warn!(
        "event={} module=service status=error error_code={} error={}",
        event,
        err.code(),
        err
    );
}
