//! # Domain Types
//!
//! Core domain types used throughout Kasir POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌──────────────────────┐  │
//! │  │    Category     │◄──│    Product      │   │    Transaction       │  │
//! │  │  ─────────────  │   │  ─────────────  │   │  ──────────────────  │  │
//! │  │  id             │   │  id             │   │  id                  │  │
//! │  │  name           │   │  name           │   │  total_amount        │  │
//! │  │  description    │   │  price, stock   │   │  created_at          │  │
//! │  └─────────────────┘   └─────────────────┘   │  details[] ──────┐   │  │
//! │                                              └──────────────────┼───┘  │
//! │                        ┌─────────────────────────────────────── ▼ ──┐  │
//! │                        │  TransactionDetail (snapshot of product)   │  │
//! │                        │  product_name, unit_price, qty, subtotal   │  │
//! │                        └────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! A detail copies the product's name and price at the moment of sale. It
//! never points back at the live product row for those values, so editing
//! or deleting a product leaves the ledger untouched.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::NO_BEST_SELLER;

// =============================================================================
// Category
// =============================================================================

/// A catalog category (Minuman, Makanan, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Category {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Payload for creating or replacing a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryInput {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

// =============================================================================
// Product
// =============================================================================

/// A product available for sale.
///
/// Columns and wire fields are named `price` and `stock`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    pub id: i64,

    /// Display name; copied into transaction details at sale time.
    pub name: String,

    /// Unit price in whole currency units.
    #[serde(rename = "price")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "price"))]
    pub unit_price: i64,

    /// Units on hand. Never negative.
    #[serde(rename = "stock")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "stock"))]
    pub stock_quantity: i64,

    pub category_id: Option<i64>,
}

impl Product {
    /// Returns the unit price as Money.
    #[inline]
    pub fn price(&self) -> Money {
        Money::new(self.unit_price)
    }
}

/// Product with its category eager-loaded, as returned by catalog reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductWithCategory {
    #[serde(flatten)]
    pub product: Product,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub category: Option<Category>,
}

/// Payload for creating or replacing a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductInput {
    pub name: String,
    pub price: i64,
    pub stock: i64,
    #[serde(default)]
    pub category_id: Option<i64>,
}

// =============================================================================
// Checkout
// =============================================================================

/// One requested line of a checkout. Exists only for the duration of a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutItem {
    pub product_id: i64,
    pub quantity: i64,
}

impl CheckoutItem {
    pub fn new(product_id: i64, quantity: i64) -> Self {
        CheckoutItem {
            product_id,
            quantity,
        }
    }
}

// =============================================================================
// Ledger
// =============================================================================

/// A line item of a persisted transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct TransactionDetail {
    pub id: i64,
    pub transaction_id: i64,
    pub product_id: i64,
    /// Product name at time of sale (frozen).
    pub product_name: String,
    /// Unit price at time of sale (frozen).
    pub unit_price: i64,
    pub quantity: i64,
    /// `unit_price × quantity`.
    pub subtotal: i64,
}

impl TransactionDetail {
    /// Returns the line subtotal as Money.
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::new(self.subtotal)
    }
}

/// A completed sale: header plus its ordered details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Transaction {
    pub id: i64,
    pub total_amount: i64,
    pub created_at: DateTime<Utc>,
    #[cfg_attr(feature = "sqlx", sqlx(skip))]
    #[serde(default)]
    pub details: Vec<TransactionDetail>,
}

impl Transaction {
    /// Sum of the detail subtotals.
    pub fn details_total(&self) -> Money {
        self.details.iter().map(TransactionDetail::subtotal).sum()
    }

    /// Checks the header/detail arithmetic invariant.
    pub fn is_balanced(&self) -> bool {
        self.details_total().amount() == self.total_amount
    }
}

// =============================================================================
// Reporting
// =============================================================================

/// The product sold most within a report window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestSeller {
    pub name: String,
    pub quantity_sold: i64,
}

impl BestSeller {
    /// Sentinel used when nothing was sold: `{ name: "-", quantity_sold: 0 }`.
    pub fn none() -> Self {
        BestSeller {
            name: NO_BEST_SELLER.to_string(),
            quantity_sold: 0,
        }
    }
}

impl Default for BestSeller {
    fn default() -> Self {
        BestSeller::none()
    }
}

/// Sales summary for one calendar day. Derived, never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyReport {
    pub total_revenue: i64,
    pub total_transactions: i64,
    pub best_seller: BestSeller,
}
