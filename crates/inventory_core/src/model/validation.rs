//! Pure validators for raw operator input.
//!
//! Each validator trims its input and either returns the coerced value or a
//! [`ValidationError`] naming the offending field. `validate_new_product`
//! composes all of them before any storage call, so a failing field can never
//! leave a partial write behind.

use crate::model::product::{NewProduct, ProductId};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Largest quantity that fits the 10-character quantity column.
pub const MAX_QUANTITY: i64 = 9_999_999_999;
/// Largest price that fits the 12-character `$` + two-decimal price column.
pub const MAX_PRICE: f64 = 99_999_999.99;

/// Input field a validation error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Id,
    Name,
    Quantity,
    Price,
    Threshold,
}

impl Field {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::Quantity => "quantity",
            Self::Price => "price",
            Self::Threshold => "threshold",
        }
    }
}

impl Display for Field {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a field was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationReason {
    Empty,
    NotAnInteger,
    /// Unparsable, NaN or infinite.
    NotANumber,
    Negative,
    /// Above the column-width maximum.
    TooLarge,
}

/// Malformed or out-of-range operator input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationError {
    pub field: Field,
    pub reason: ValidationReason,
}

impl ValidationError {
    pub fn new(field: Field, reason: ValidationReason) -> Self {
        Self { field, reason }
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.reason {
            ValidationReason::Empty => write!(f, "{} cannot be empty", self.field),
            ValidationReason::NotAnInteger => write!(f, "{} must be an integer", self.field),
            ValidationReason::NotANumber => write!(f, "{} must be a valid number", self.field),
            ValidationReason::Negative => write!(f, "{} cannot be negative", self.field),
            ValidationReason::TooLarge => write!(f, "{} is too large", self.field),
        }
    }
}

impl Error for ValidationError {}

/// Raw, unvalidated text for every field of a new product.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    pub quantity: String,
    pub price: String,
    pub category: String,
}

/// Operator answer to a destructive-action prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Affirmative,
    Declined,
}

impl Confirmation {
    /// Reads a confirmation token. Only an explicit yes (`s`, `si`, `sí`,
    /// `y`, `yes`, any case) is affirmative; everything else declines.
    pub fn from_token(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "s" | "si" | "sí" | "y" | "yes" => Self::Affirmative,
            _ => Self::Declined,
        }
    }

    pub fn is_affirmative(self) -> bool {
        matches!(self, Self::Affirmative)
    }
}

/// Trims the name; empty is rejected.
pub fn validate_name(raw: &str) -> Result<String, ValidationError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(ValidationError::new(Field::Name, ValidationReason::Empty));
    }
    Ok(name.to_string())
}

/// Trims free text; empty becomes `None`. Never fails.
pub fn validate_optional_text(raw: &str) -> Result<Option<String>, ValidationError> {
    let text = raw.trim();
    if text.is_empty() {
        return Ok(None);
    }
    Ok(Some(text.to_string()))
}

/// Parses a non-negative quantity no larger than [`MAX_QUANTITY`].
pub fn validate_quantity(raw: &str) -> Result<i64, ValidationError> {
    let quantity = parse_non_negative_int(raw, Field::Quantity)?;
    if quantity > MAX_QUANTITY {
        return Err(ValidationError::new(Field::Quantity, ValidationReason::TooLarge));
    }
    Ok(quantity)
}

/// Low-stock threshold: a non-negative integer.
pub fn validate_threshold(raw: &str) -> Result<i64, ValidationError> {
    parse_non_negative_int(raw, Field::Threshold)
}

/// Parses a finite price in `0..=MAX_PRICE`. `-0` is normalized to `0`.
pub fn validate_price(raw: &str) -> Result<f64, ValidationError> {
    let price = raw
        .trim()
        .parse::<f64>()
        .map_err(|_| ValidationError::new(Field::Price, ValidationReason::NotANumber))?;
    if !price.is_finite() {
        return Err(ValidationError::new(Field::Price, ValidationReason::NotANumber));
    }
    if price < 0.0 {
        return Err(ValidationError::new(Field::Price, ValidationReason::Negative));
    }
    if price > MAX_PRICE {
        return Err(ValidationError::new(Field::Price, ValidationReason::TooLarge));
    }
    Ok(if price == 0.0 { 0.0 } else { price })
}

/// Parses an operator-entered product id. Range is not checked here; an id
/// that was never assigned simply resolves to `NotFound`.
pub fn parse_id(raw: &str) -> Result<ProductId, ValidationError> {
    raw.trim()
        .parse::<ProductId>()
        .map_err(|_| ValidationError::new(Field::Id, ValidationReason::NotAnInteger))
}

/// Validates every field of `draft` into an insert payload.
///
/// Fields are checked in declaration order and the first failure wins.
pub fn validate_new_product(draft: &ProductDraft) -> Result<NewProduct, ValidationError> {
    Ok(NewProduct {
        name: validate_name(&draft.name)?,
        description: validate_optional_text(&draft.description)?,
        quantity: validate_quantity(&draft.quantity)?,
        price: validate_price(&draft.price)?,
        category: validate_optional_text(&draft.category)?,
    })
}

fn parse_non_negative_int(raw: &str, field: Field) -> Result<i64, ValidationError> {
    let value = raw
        .trim()
        .parse::<i64>()
        .map_err(|_| ValidationError::new(field, ValidationReason::NotAnInteger))?;
    if value < 0 {
        return Err(ValidationError::new(field, ValidationReason::Negative));
    }
    Ok(value)
}
