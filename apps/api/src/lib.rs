//! # Kasir API
//!
//! REST server for Kasir POS.
//!
//! ## Routes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  GET     /                          banner                             │
//! │  GET     /health                    DB probe (503 when unreachable)    │
//! │  GET     /api/produk                products with category             │
//! │  POST    /api/produk                create product                     │
//! │  GET     /api/produk/:id            one product                        │
//! │  PUT     /api/produk/:id            replace product                    │
//! │  DELETE  /api/produk/:id            delete product                     │
//! │  GET     /api/categories            categories                         │
//! │  POST    /api/categories            create category                    │
//! │  GET     /api/categories/:id        one category                       │
//! │  PUT     /api/categories/:id        replace category                   │
//! │  DELETE  /api/categories/:id        delete category                    │
//! │  POST    /api/checkout              cart → Transaction (201)           │
//! │  GET     /api/transactions/:id      Transaction with details           │
//! │  GET     /api/report/hari-ini       today's DailyReport                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod state;

use axum::http::{header, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use config::{ApiConfig, ConfigError};
pub use error::{ApiError, ErrorCode};
pub use state::AppState;

use handlers::{category, product, transaction};

/// Builds the application router.
pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route(
            "/api/produk",
            get(product::list_products).post(product::create_product),
        )
        .route(
            "/api/produk/:id",
            get(product::get_product)
                .put(product::update_product)
                .delete(product::delete_product),
        )
        .route(
            "/api/categories",
            get(category::list_categories).post(category::create_category),
        )
        .route(
            "/api/categories/:id",
            get(category::get_category)
                .put(category::update_category)
                .delete(category::delete_category),
        )
        .route("/api/checkout", post(transaction::checkout))
        .route("/api/transactions/:id", get(transaction::get_transaction))
        .route("/api/report/hari-ini", get(transaction::today_report))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
