//! Shared application state.

use std::time::Duration;

use kasir_db::Database;

/// State handed to every handler. Cheap to clone.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,

    /// Upper bound on one checkout; exceeding it rolls the unit of work back.
    pub checkout_timeout: Duration,
}

impl AppState {
    pub fn new(db: Database, checkout_timeout: Duration) -> Self {
        AppState {
            db,
            checkout_timeout,
        }
    }
}
