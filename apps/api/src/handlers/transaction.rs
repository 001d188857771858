//! Checkout, transaction lookup and daily report handlers.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use kasir_core::{CheckoutItem, DailyReport, Transaction};
use serde::Deserialize;

use crate::error::ApiError;
use crate::state::AppState;

/// Checkout body: a bare array of items, or `{"items": [...]}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum CheckoutRequest {
    Items(Vec<CheckoutItem>),
    Envelope { items: Vec<CheckoutItem> },
}

impl CheckoutRequest {
    pub fn into_items(self) -> Vec<CheckoutItem> {
        match self {
            CheckoutRequest::Items(items) | CheckoutRequest::Envelope { items } => items,
        }
    }
}

/// `POST /api/checkout`
///
/// A 500 `CHECKOUT_TIMEOUT` means nothing was stored; the deadline only
/// covers work before COMMIT.
pub async fn checkout(
    State(state): State<AppState>,
    body: Result<Json<CheckoutRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Transaction>), ApiError> {
    let Json(request) = body?;
    let items = request.into_items();

    let transaction = state
        .db
        .transactions()
        .process_checkout_with_timeout(&items, state.checkout_timeout)
        .await?;

    Ok((StatusCode::CREATED, Json(transaction)))
}

/// `GET /api/transactions/:id`
pub async fn get_transaction(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Transaction>, ApiError> {
    state
        .db
        .transactions()
        .get_transaction(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Transaction", id))
}

/// `GET /api/report/hari-ini`
pub async fn today_report(State(state): State<AppState>) -> Result<Json<DailyReport>, ApiError> {
    Ok(Json(state.db.transactions().get_today_report().await?))
}
