//! Error types for the HTTP API.
//!
//! Every failure leaves a handler as an [`ApiError`], rendered as
//! `{"code": "...", "message": "..."}` with a matching status code.
//!
//! ```text
//! CoreError::ProductNotFound         → 404 PRODUCT_NOT_FOUND
//! CoreError::EmptyCheckout           → 400 EMPTY_CHECKOUT
//! CoreError::InvalidQuantity         → 400 INVALID_QUANTITY
//! CoreError::InsufficientStock       → 400 INSUFFICIENT_STOCK
//! ValidationError / bad JSON         → 400 VALIDATION_ERROR
//! DbError::NotFound                  → 404 NOT_FOUND
//! DbError::UniqueViolation           → 409 CONFLICT
//! CheckoutError::StorageFailure      → 500 DATABASE_ERROR (details logged)
//! CheckoutError::TimedOut            → 500 CHECKOUT_TIMEOUT (nothing stored)
//! ```

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use kasir_core::{CoreError, ValidationError};
use kasir_db::{CheckoutError, DbError};
use serde::Serialize;
use tracing::error;

/// Machine-readable error code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    NotFound,
    ProductNotFound,
    EmptyCheckout,
    InvalidQuantity,
    InsufficientStock,
    ValidationError,
    Conflict,
    CheckoutTimeout,
    DatabaseError,
}

impl ErrorCode {
    pub fn status_code(self) -> StatusCode {
        match self {
            ErrorCode::NotFound | ErrorCode::ProductNotFound => StatusCode::NOT_FOUND,
            ErrorCode::EmptyCheckout
            | ErrorCode::InvalidQuantity
            | ErrorCode::InsufficientStock
            | ErrorCode::ValidationError => StatusCode::BAD_REQUEST,
            ErrorCode::Conflict => StatusCode::CONFLICT,
            ErrorCode::CheckoutTimeout | ErrorCode::DatabaseError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// API error response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(entity: &str, id: i64) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{entity} not found: {id}"))
    }

    pub fn checkout_timeout() -> Self {
        ApiError::new(ErrorCode::CheckoutTimeout, "Checkout timed out")
    }

    fn internal() -> Self {
        ApiError::new(ErrorCode::DatabaseError, "Database error")
    }

    pub fn status_code(&self) -> StatusCode {
        self.code.status_code()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self)).into_response()
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let code = match &err {
            CoreError::EmptyCheckout => ErrorCode::EmptyCheckout,
            CoreError::InvalidQuantity { .. } => ErrorCode::InvalidQuantity,
            CoreError::ProductNotFound(_) => ErrorCode::ProductNotFound,
            CoreError::InsufficientStock { .. } => ErrorCode::InsufficientStock,
        };
        ApiError::new(code, err.to_string())
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::new(ErrorCode::ValidationError, err.to_string())
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { .. } => ApiError::new(ErrorCode::NotFound, err.to_string()),
            DbError::Validation(inner) => inner.into(),
            DbError::ForeignKeyViolation { .. } => {
                ApiError::new(ErrorCode::ValidationError, "Referenced category does not exist")
            }
            DbError::CheckViolation { .. } => {
                ApiError::new(ErrorCode::ValidationError, "Value out of range")
            }
            DbError::UniqueViolation { .. } => ApiError::new(ErrorCode::Conflict, err.to_string()),
            other => {
                error!(error = %other, "Database failure");
                ApiError::internal()
            }
        }
    }
}

impl From<CheckoutError> for ApiError {
    fn from(err: CheckoutError) -> Self {
        match err {
            CheckoutError::Rejected(core) => core.into(),
            CheckoutError::StorageFailure(db) => {
                error!(error = %db, "Checkout storage failure");
                ApiError::internal()
            }
            CheckoutError::TimedOut(_) => ApiError::checkout_timeout(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::new(ErrorCode::ValidationError, rejection.body_text())
    }
}
