//! # Repository Module
//!
//! Database repository implementations for Kasir POS.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  HTTP handler                                                          │
//! │       │                                                                 │
//! │       │  db.transactions().process_checkout(&items)                    │
//! │       ▼                                                                 │
//! │  TransactionRepository                                                 │
//! │  ├── process_checkout(&self, items)                                    │
//! │  ├── get_transaction(&self, id)                                        │
//! │  ├── get_today_report(&self)                                           │
//! │  └── get_report_for(&self, date)                                       │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`ProductRepository`](product::ProductRepository) - Product CRUD with eager category
//! - [`CategoryRepository`](category::CategoryRepository) - Category CRUD
//! - [`TransactionRepository`](transaction::TransactionRepository) - Checkout engine and daily reports

pub mod category;
pub mod product;
pub mod transaction;
