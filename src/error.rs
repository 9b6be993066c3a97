//! Service error type and its HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use crate::domain::pricing::PricingError;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not found")]
    NotFound,

    #[error("validation failed: {0}")]
    Validation(String),

    /// Invalid and inactive codes deliberately share one message (see
    /// `domain::promo`).
    #[error("invalid promo code")]
    InvalidPromo,

    #[error("payment method not available for this order")]
    PaymentMethodUnavailable,

    #[error("insufficient stock for one of the ordered products")]
    InsufficientStock,

    #[error("incorrect password")]
    Unauthorized,

    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;

impl From<validator::ValidationErrors> for StoreError {
    fn from(e: validator::ValidationErrors) -> Self {
        StoreError::Validation(e.to_string())
    }
}

impl IntoResponse for StoreError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            StoreError::NotFound => (StatusCode::NOT_FOUND, self.to_string()),
            StoreError::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, self.to_string()),
            // The user-facing text never distinguishes inactive from
            // nonexistent; matches the storefront's single generic message.
            StoreError::InvalidPromo => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "كود الخصم غير صالح أو منتهي الصلاحية".to_string(),
            ),
            StoreError::PaymentMethodUnavailable => {
                (StatusCode::UNPROCESSABLE_ENTITY, self.to_string())
            }
            StoreError::InsufficientStock => {
                (StatusCode::UNPROCESSABLE_ENTITY, self.to_string())
            }
            StoreError::Unauthorized => (StatusCode::UNAUTHORIZED, self.to_string()),
            StoreError::Pricing(e) => (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()),
            StoreError::Database(sqlx::Error::RowNotFound) => {
                (StatusCode::NOT_FOUND, "not found".to_string())
            }
            // Cause goes to the log, the client gets a generic retry message.
            StoreError::Database(e) => {
                tracing::error!(error = %e, "database operation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "حدث خطأ، يرجى المحاولة مرة أخرى".to_string(),
                )
            }
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}
