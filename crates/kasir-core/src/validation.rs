//! Catalog input rules.
//!
//! Checked in the repositories before any SQL runs, so a bad payload comes
//! back as a field-level message instead of a raw constraint failure. The
//! schema repeats the numeric rules (`CHECK price >= 0`, `CHECK stock >= 0`)
//! and the category foreign key, which only SQLite can check.
//!
//! Checkout quantities are not catalog input; see
//! [`crate::checkout::validate_items`].

use crate::error::ValidationError;
use crate::types::{CategoryInput, ProductInput};

pub type ValidationResult<T> = Result<T, ValidationError>;

pub const MAX_NAME_LEN: usize = 200;
pub const MAX_DESCRIPTION_LEN: usize = 1000;

fn non_blank(field: &'static str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        Err(ValidationError::Required { field })
    } else {
        Ok(())
    }
}

fn at_most(field: &'static str, value: &str, max: usize) -> ValidationResult<()> {
    if value.chars().count() > max {
        Err(ValidationError::TooLong { field, max })
    } else {
        Ok(())
    }
}

fn not_negative(field: &'static str, value: i64) -> ValidationResult<()> {
    if value < 0 {
        Err(ValidationError::Negative { field })
    } else {
        Ok(())
    }
}

/// Non-blank, at most [`MAX_NAME_LEN`] characters.
///
/// ```rust
/// use kasir_core::validation::validate_name;
///
/// assert!(validate_name("Kopi Gadjah").is_ok());
/// assert!(validate_name("   ").is_err());
/// ```
pub fn validate_name(name: &str) -> ValidationResult<()> {
    non_blank("name", name)?;
    at_most("name", name.trim(), MAX_NAME_LEN)
}

/// Zero is a valid price.
pub fn validate_price(price: i64) -> ValidationResult<()> {
    not_negative("price", price)
}

pub fn validate_stock(stock: i64) -> ValidationResult<()> {
    not_negative("stock", stock)
}

pub fn validate_product_input(input: &ProductInput) -> ValidationResult<()> {
    validate_name(&input.name)?;
    validate_price(input.price)?;
    validate_stock(input.stock)?;

    match input.category_id {
        Some(id) if id <= 0 => Err(ValidationError::InvalidId {
            field: "category_id",
        }),
        _ => Ok(()),
    }
}

pub fn validate_category_input(input: &CategoryInput) -> ValidationResult<()> {
    validate_name(&input.name)?;
    at_most("description", &input.description, MAX_DESCRIPTION_LEN)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn panadol() -> ProductInput {
        ProductInput {
            name: "Panadol".to_string(),
            price: 4700,
            stock: 2,
            category_id: Some(3),
        }
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("Teh Tong Tji").is_ok());
        assert_eq!(
            validate_name(""),
            Err(ValidationError::Required { field: "name" })
        );
        assert!(validate_name(&"A".repeat(MAX_NAME_LEN)).is_ok());
        assert!(validate_name(&"A".repeat(MAX_NAME_LEN + 1)).is_err());
    }

    #[test]
    fn test_price_and_stock_may_be_zero() {
        assert!(validate_price(0).is_ok());
        assert!(validate_stock(0).is_ok());
        assert!(validate_price(-1).is_err());
        assert!(validate_stock(-5).is_err());
    }

    #[test]
    fn test_validate_product_input() {
        assert!(validate_product_input(&panadol()).is_ok());
        assert!(validate_product_input(&ProductInput {
            category_id: None,
            ..panadol()
        })
        .is_ok());

        assert_eq!(
            validate_product_input(&ProductInput { stock: -1, ..panadol() }),
            Err(ValidationError::Negative { field: "stock" })
        );
        assert_eq!(
            validate_product_input(&ProductInput {
                category_id: Some(0),
                ..panadol()
            }),
            Err(ValidationError::InvalidId {
                field: "category_id"
            })
        );
    }

    #[test]
    fn test_validate_category_input() {
        let obat = CategoryInput {
            name: "Obat".to_string(),
            description: "Obat mujarab".to_string(),
        };
        assert!(validate_category_input(&obat).is_ok());

        let blank = CategoryInput {
            name: " ".to_string(),
            description: String::new(),
        };
        assert!(validate_category_input(&blank).is_err());

        let wordy = CategoryInput {
            description: "x".repeat(MAX_DESCRIPTION_LEN + 1),
            ..obat
        };
        assert_eq!(
            validate_category_input(&wordy),
            Err(ValidationError::TooLong {
                field: "description",
                max: MAX_DESCRIPTION_LEN
            })
        );
    }
}
