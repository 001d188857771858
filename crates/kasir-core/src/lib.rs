//! # kasir-core: Pure Business Logic for Kasir POS
//!
//! This crate is the **heart** of Kasir POS. It contains the domain types
//! and the checkout arithmetic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Kasir POS Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    HTTP API (axum)                              │   │
//! │  │    /api/produk, /api/categories, /api/checkout, /api/report    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ kasir-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │ checkout  │  │ validation│  │   │
//! │  │   │  Product  │  │   Money   │  │  Totals   │  │   rules   │  │   │
//! │  │   │Transaction│  │           │  │ SaleLine  │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    kasir-db (Database Layer)                    │   │
//! │  │         SQLite, migrations, checkout unit of work, reports     │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Category, Transaction, DailyReport)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`checkout`] - Checkout input validation and line/total computation
//! - [`error`] - Domain error types
//! - [`validation`] - Catalog field validation
//!
//! ## Example Usage
//!
//! ```rust
//! use kasir_core::checkout::CheckoutTotals;
//! use kasir_core::money::Money;
//!
//! let mut totals = CheckoutTotals::new();
//! let line = totals.add_line(1, Money::new(2000), 3).unwrap();
//! assert_eq!(line.amount(), 6000);
//! assert_eq!(totals.total().amount(), 6000);
//! ```

pub mod checkout;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

/// Name reported as the best seller when nothing was sold in the window.
pub const NO_BEST_SELLER: &str = "-";
