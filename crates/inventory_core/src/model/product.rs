//! Product domain model.
//!
//! # Responsibility
//! - Define the stored product record and the insert payload.
//! - Re-check record invariants on both write and read paths.
//!
//! # Invariants
//! - `id` is assigned once by storage and never changes or gets reused.
//! - `name` is never empty; `0 <= quantity <= MAX_QUANTITY`; `0 <= price <= MAX_PRICE`.
//! - Empty description/category are represented as `None`, never `Some("")`.

use crate::model::validation::{Field, ValidationError, ValidationReason, MAX_PRICE, MAX_QUANTITY};
use serde::Serialize;

/// Storage-assigned product identifier.
pub type ProductId = i64;

/// Stored inventory record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    /// Units on hand. The only field mutable after creation.
    pub quantity: i64,
    /// Unit price.
    pub price: f64,
    pub category: Option<String>,
}

impl Product {
    /// Returns whether no units are left.
    pub fn is_out_of_stock(&self) -> bool {
        self.quantity == 0
    }

    /// Checks stored-record invariants.
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_record(&self.name, self.quantity, self.price)
    }
}

/// Validated payload for creating a product. `id` is assigned on insert.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub quantity: i64,
    pub price: f64,
    pub category: Option<String>,
}

impl NewProduct {
    /// Checks the same invariants enforced for stored records.
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_record(&self.name, self.quantity, self.price)
    }

    /// Builds the stored record once storage has assigned `id`.
    pub fn into_product(self, id: ProductId) -> Product {
        Product {
            id,
            name: self.name,
            description: self.description,
            quantity: self.quantity,
            price: self.price,
            category: self.category,
        }
    }
}

fn check_record(name: &str, quantity: i64, price: f64) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::new(Field::Name, ValidationReason::Empty));
    }
    if quantity < 0 {
        return Err(ValidationError::new(Field::Quantity, ValidationReason::Negative));
    }
    if quantity > MAX_QUANTITY {
        return Err(ValidationError::new(Field::Quantity, ValidationReason::TooLarge));
    }
    if !price.is_finite() {
        return Err(ValidationError::new(Field::Price, ValidationReason::NotANumber));
    }
    if price < 0.0 {
        return Err(ValidationError::new(Field::Price, ValidationReason::Negative));
    }
    if price > MAX_PRICE {
        return Err(ValidationError::new(Field::Price, ValidationReason::TooLarge));
    }
    Ok(())
}
