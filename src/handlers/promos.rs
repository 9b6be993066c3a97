//! Promo codes: the public check endpoint and the admin CRUD panel.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::domain::promo::{normalize_code, PromoLookup};
use crate::error::{Result, StoreError};
use crate::models::PromoCode;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CheckPromoRequest {
    pub code: String,
}

/// Resolves a user-entered code. Inactive and unknown codes both collapse to
/// the same generic error toward the customer.
pub async fn check_promo(
    State(s): State<AppState>,
    Json(r): Json<CheckPromoRequest>,
) -> Result<Json<PromoCode>> {
    let normalized = normalize_code(&r.code);
    let row = sqlx::query_as::<_, PromoCode>("SELECT * FROM promo_codes WHERE code = $1")
        .bind(&normalized)
        .fetch_optional(&s.db)
        .await?;
    match PromoLookup::classify(row, |p: &PromoCode| p.is_active) {
        PromoLookup::Found(promo) => Ok(Json(promo)),
        PromoLookup::Inactive => {
            tracing::debug!(code = %normalized, "promo code exists but is inactive");
            Err(StoreError::InvalidPromo)
        }
        PromoLookup::NotFound => Err(StoreError::InvalidPromo),
    }
}

pub async fn list_promos(State(s): State<AppState>) -> Result<Json<Vec<PromoCode>>> {
    let promos =
        sqlx::query_as::<_, PromoCode>("SELECT * FROM promo_codes ORDER BY created_at DESC")
            .fetch_all(&s.db)
            .await?;
    Ok(Json(promos))
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePromoRequest {
    #[validate(length(min = 1, message = "code is required"))]
    pub code: String,
    #[serde(alias = "discountPercent")]
    #[validate(range(min = 1, max = 100))]
    pub discount_percent: i32,
    #[serde(default = "default_active", alias = "isActive")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

pub async fn create_promo(
    State(s): State<AppState>,
    Json(r): Json<CreatePromoRequest>,
) -> Result<(StatusCode, Json<PromoCode>)> {
    r.validate()?;
    let promo = sqlx::query_as::<_, PromoCode>(
        "INSERT INTO promo_codes (id, code, discount_percent, is_active, created_at) \
         VALUES ($1, $2, $3, $4, NOW()) RETURNING *",
    )
    .bind(Uuid::now_v7())
    .bind(normalize_code(&r.code))
    .bind(r.discount_percent)
    .bind(r.is_active)
    .fetch_one(&s.db)
    .await?;
    Ok((StatusCode::CREATED, Json(promo)))
}

pub async fn toggle_promo(
    State(s): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PromoCode>> {
    let promo = sqlx::query_as::<_, PromoCode>(
        "UPDATE promo_codes SET is_active = NOT is_active WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .fetch_optional(&s.db)
    .await?
    .ok_or(StoreError::NotFound)?;
    Ok(Json(promo))
}

pub async fn delete_promo(State(s): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode> {
    let result = sqlx::query("DELETE FROM promo_codes WHERE id = $1")
        .bind(id)
        .execute(&s.db)
        .await?;
    if result.rows_affected() == 0 {
        return Err(StoreError::NotFound);
    }
    Ok(StatusCode::NO_CONTENT)
}
