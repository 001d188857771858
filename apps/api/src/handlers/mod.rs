//! HTTP handlers.
//!
//! Handlers only translate between HTTP and the repositories: extract,
//! call, serialize. Business rules live in `kasir-core` and `kasir-db`.

pub mod category;
pub mod product;
pub mod transaction;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub database: &'static str,
}

/// `GET /`
pub async fn root() -> &'static str {
    "Kasir POS API"
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    if state.db.health_check().await {
        (
            StatusCode::OK,
            Json(HealthResponse {
                status: "OK",
                message: "API Running",
                database: "connected",
            }),
        )
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthResponse {
                status: "ERROR",
                message: "Database unreachable",
                database: "disconnected",
            }),
        )
    }
}
