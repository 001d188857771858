//! `/api/produk` handlers.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use kasir_core::{ProductInput, ProductWithCategory};
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::state::AppState;

pub async fn list_products(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProductWithCategory>>, ApiError> {
    Ok(Json(state.db.products().list().await?))
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ProductWithCategory>, ApiError> {
    state
        .db
        .products()
        .get_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Product", id))
}

pub async fn create_product(
    State(state): State<AppState>,
    body: Result<Json<ProductInput>, JsonRejection>,
) -> Result<(StatusCode, Json<ProductWithCategory>), ApiError> {
    let Json(input) = body?;
    let product = state.db.products().insert(&input).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    body: Result<Json<ProductInput>, JsonRejection>,
) -> Result<Json<ProductWithCategory>, ApiError> {
    let Json(input) = body?;
    Ok(Json(state.db.products().update(id, &input).await?))
}

pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    state.db.products().delete(id).await?;
    Ok(Json(json!({ "message": "Product deleted" })))
}
