//! # Checkout Math
//!
//! The pure half of the checkout engine: input validation, line pricing and
//! total accumulation. The storage half (locking, decrementing, inserting)
//! lives in `kasir-db`.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  [{product_id: 1, quantity: 3}, {product_id: 2, quantity: 2}]          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  validate_items() ── empty? qty <= 0? ──► CoreError                    │
//! │       │                                                                 │
//! │       ▼   (per item, after the product row is locked and decremented)  │
//! │  CheckoutTotals::stage(&product, qty)                                  │
//! │       ├── subtotal = price × qty      (checked)                        │
//! │       ├── total   += subtotal         (checked)                        │
//! │       └── SaleLine { name, price snapshot, qty, subtotal }             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  total() ──► transactions.total_amount                                 │
//! │  SaleLine::into_detail(id, transaction_id) ──► TransactionDetail       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{CheckoutItem, Product, TransactionDetail};

/// Rejects empty carts and non-positive quantities.
///
/// Runs before any storage access so a malformed request never opens a
/// database transaction.
///
/// ## Example
/// ```rust
/// use kasir_core::checkout::validate_items;
/// use kasir_core::{CheckoutItem, CoreError};
///
/// assert!(validate_items(&[CheckoutItem::new(1, 2)]).is_ok());
/// assert_eq!(validate_items(&[]), Err(CoreError::EmptyCheckout));
/// ```
pub fn validate_items(items: &[CheckoutItem]) -> CoreResult<()> {
    if items.is_empty() {
        return Err(CoreError::EmptyCheckout);
    }

    if let Some(bad) = items.iter().find(|item| item.quantity <= 0) {
        return Err(CoreError::InvalidQuantity {
            product_id: bad.product_id,
            quantity: bad.quantity,
        });
    }

    Ok(())
}

/// A priced line waiting for its transaction id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaleLine {
    pub product_id: i64,
    pub product_name: String,
    pub unit_price: i64,
    pub quantity: i64,
    pub subtotal: i64,
}

impl SaleLine {
    /// Attaches the generated ids, producing the persisted detail.
    pub fn into_detail(self, id: i64, transaction_id: i64) -> TransactionDetail {
        TransactionDetail {
            id,
            transaction_id,
            product_id: self.product_id,
            product_name: self.product_name,
            unit_price: self.unit_price,
            quantity: self.quantity,
            subtotal: self.subtotal,
        }
    }
}

/// Running total of a checkout.
#[derive(Debug, Clone, Default)]
pub struct CheckoutTotals {
    total: Money,
    lines: usize,
}

impl CheckoutTotals {
    pub fn new() -> Self {
        CheckoutTotals::default()
    }

    /// Prices one line and adds it to the running total.
    ///
    /// Overflow in either the multiplication or the accumulation is reported
    /// as `InvalidQuantity` for the offending product; the total is left
    /// unchanged in that case.
    pub fn add_line(&mut self, product_id: i64, unit_price: Money, quantity: i64) -> CoreResult<Money> {
        let invalid = || CoreError::InvalidQuantity {
            product_id,
            quantity,
        };

        let subtotal = unit_price
            .checked_multiply_quantity(quantity)
            .ok_or_else(invalid)?;
        self.total = self.total.checked_add(subtotal).ok_or_else(invalid)?;
        self.lines += 1;

        Ok(subtotal)
    }

    /// Prices a line from a product snapshot and freezes its name and price.
    pub fn stage(&mut self, product: &Product, quantity: i64) -> CoreResult<SaleLine> {
        let subtotal = self.add_line(product.id, product.price(), quantity)?;

        Ok(SaleLine {
            product_id: product.id,
            product_name: product.name.clone(),
            unit_price: product.unit_price,
            quantity,
            subtotal: subtotal.amount(),
        })
    }

    /// Accumulated total of all staged lines.
    pub fn total(&self) -> Money {
        self.total
    }

    /// Number of lines staged so far.
    pub fn line_count(&self) -> usize {
        self.lines
    }
}
