//! Store-wide settings singleton: payment flags, contact info, shipping cost.

use axum::extract::State;
use axum::Json;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::domain::payment::PaymentFlags;
use crate::error::{Result, StoreError};
use crate::models::{ContactInfo, StoreSettings};
use crate::AppState;

pub async fn get_settings(State(s): State<AppState>) -> Result<Json<StoreSettings>> {
    let settings =
        sqlx::query_as::<_, StoreSettings>("SELECT * FROM store_settings WHERE id = 1")
            .fetch_one(&s.db)
            .await?;
    Ok(Json(settings))
}

#[derive(Debug, Deserialize)]
pub struct UpdateSettingsRequest {
    #[serde(alias = "paymentMethods")]
    pub payment_methods: PaymentFlags,
    #[serde(alias = "contactInfo")]
    pub contact_info: ContactInfo,
    #[serde(alias = "shippingCost")]
    pub shipping_cost: Option<Decimal>,
}

pub async fn update_settings(
    State(s): State<AppState>,
    Json(r): Json<UpdateSettingsRequest>,
) -> Result<Json<StoreSettings>> {
    if let Some(cost) = r.shipping_cost {
        if cost < Decimal::ZERO {
            return Err(StoreError::Validation(
                "shipping cost cannot be negative".into(),
            ));
        }
    }
    let settings = sqlx::query_as::<_, StoreSettings>(
        "UPDATE store_settings SET \
           payment_methods = $1, contact_info = $2, shipping_cost = $3, updated_at = NOW() \
         WHERE id = 1 RETURNING *",
    )
    .bind(sqlx::types::Json(&r.payment_methods))
    .bind(sqlx::types::Json(&r.contact_info))
    .bind(r.shipping_cost)
    .fetch_one(&s.db)
    .await?;
    Ok(Json(settings))
}
