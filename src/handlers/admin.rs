//! Admin-only endpoints: login check, dashboard overview, notification slot.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{Result, StoreError};
use crate::notify::Toast;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub password: String,
}

/// Single shared password, compared verbatim. There are no admin accounts.
pub async fn login(
    State(s): State<AppState>,
    Json(r): Json<LoginRequest>,
) -> Result<StatusCode> {
    if r.password == s.config.admin_password {
        Ok(StatusCode::NO_CONTENT)
    } else {
        tracing::warn!("rejected admin login attempt");
        Err(StoreError::Unauthorized)
    }
}

#[derive(Debug, Serialize)]
pub struct DailyOrders {
    pub day: chrono::NaiveDate,
    pub count: i64,
}

#[derive(Debug, Serialize)]
pub struct Overview {
    pub total_revenue: Decimal,
    pub new_orders: i64,
    pub in_progress_orders: i64,
    pub product_count: i64,
    pub average_rating: Option<Decimal>,
    pub last_week: Vec<DailyOrders>,
}

pub async fn overview(State(s): State<AppState>) -> Result<Json<Overview>> {
    let (total_revenue,): (Decimal,) =
        sqlx::query_as("SELECT COALESCE(SUM(total_amount), 0) FROM orders")
            .fetch_one(&s.db)
            .await?;
    let (new_orders,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM orders WHERE status = 'new'")
            .fetch_one(&s.db)
            .await?;
    let (in_progress_orders,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM orders WHERE status = 'in_progress'")
            .fetch_one(&s.db)
            .await?;
    let (product_count, average_rating): (i64, Option<Decimal>) =
        sqlx::query_as("SELECT COUNT(*), AVG(rating) FROM products")
            .fetch_one(&s.db)
            .await?;

    // Zero-filled through generate_series so quiet days still chart.
    let last_week: Vec<(chrono::NaiveDate, i64)> = sqlx::query_as(
        "SELECT d::date, COUNT(o.id) \
         FROM generate_series(CURRENT_DATE - 6, CURRENT_DATE, '1 day') AS d \
         LEFT JOIN orders o ON o.created_at::date = d::date \
         GROUP BY d::date ORDER BY d::date",
    )
    .fetch_all(&s.db)
    .await?;

    Ok(Json(Overview {
        total_revenue,
        new_orders,
        in_progress_orders,
        product_count,
        average_rating,
        last_week: last_week
            .into_iter()
            .map(|(day, count)| DailyOrders { day, count })
            .collect(),
    }))
}

/// The currently visible toast, if any. Expiry is applied on read.
pub async fn current_notification(State(s): State<AppState>) -> Json<Option<Toast>> {
    Json(s.notifier.current())
}

pub async fn dismiss_notification(State(s): State<AppState>) -> StatusCode {
    s.notifier.dismiss();
    StatusCode::NO_CONTENT
}
