//! Domain errors.
//!
//! [`CoreError`] is what a cashier can get wrong at checkout;
//! [`ValidationError`] is what an admin can get wrong in the catalog.
//! Storage faults are not domain errors and live in `kasir-db`.

use thiserror::Error;

/// A checkout refused on business grounds. Nothing was written.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("Checkout must contain at least one item")]
    EmptyCheckout,

    /// Zero or negative, or large enough to overflow the line subtotal.
    #[error("Invalid quantity {quantity} for product {product_id}")]
    InvalidQuantity { product_id: i64, quantity: i64 },

    #[error("Product not found: {0}")]
    ProductNotFound(i64),

    /// ```text
    /// cart [{ product_id: 5, quantity: 3 }], product 5 has stock 2
    ///   UPDATE ... WHERE stock >= 3   → no row
    ///   SELECT stock                  → 2
    ///   → InsufficientStock { 5, available: 2, requested: 3 }, rollback
    /// ```
    #[error("Insufficient stock for product {product_id}: available {available}, requested {requested}")]
    InsufficientStock {
        product_id: i64,
        available: i64,
        requested: i64,
    },
}

impl CoreError {
    /// The product the cashier should look at, when there is one.
    pub fn product_id(&self) -> Option<i64> {
        match *self {
            CoreError::InvalidQuantity { product_id, .. }
            | CoreError::InsufficientStock { product_id, .. }
            | CoreError::ProductNotFound(product_id) => Some(product_id),
            CoreError::EmptyCheckout => None,
        }
    }
}

pub type CoreResult<T> = Result<T, CoreError>;

/// Rejected catalog input. `field` is the JSON field name.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: &'static str },

    #[error("{field} is longer than {max} characters")]
    TooLong { field: &'static str, max: usize },

    #[error("{field} must not be negative")]
    Negative { field: &'static str },

    /// Ids start at 1.
    #[error("{field} is not a valid id")]
    InvalidId { field: &'static str },
}
