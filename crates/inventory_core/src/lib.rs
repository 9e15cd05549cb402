//! Core domain logic for the inventory manager.
//! This crate is the single source of truth for product record invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod present;
pub mod repo;
pub mod service;

pub use db::{open_db, open_db_in_memory, DbError, DbResult, Store};
pub use logging::{init_logging, logging_status, LogLevel, LoggingError};
pub use model::product::{NewProduct, Product, ProductId};
pub use model::validation::{
    parse_id, Confirmation, Field, ProductDraft, ValidationError, ValidationReason,
};
pub use present::{render_low_stock, render_products, Palette, TableCaption};
pub use repo::product_repo::{
    DeleteOutcome, LowStockEntry, ProductRepository, QuantityChange, RepoError, RepoResult,
    SqliteProductRepository,
};
pub use service::inventory_service::{
    with_inventory, InventoryService, LowStockReport, SearchCriteria, ServiceError, ServiceResult,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
