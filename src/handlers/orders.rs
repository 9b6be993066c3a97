//! Order reads, admin status transitions and deletion. Orders are created
//! only by checkout; the invoice view is `get_order`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{Result, StoreError};
use crate::models::{Order, OrderStatus};
use crate::AppState;

pub async fn list_orders(State(s): State<AppState>) -> Result<Json<Vec<Order>>> {
    let orders =
        sqlx::query_as::<_, Order>("SELECT * FROM orders ORDER BY created_at DESC")
            .fetch_all(&s.db)
            .await?;
    Ok(Json(orders))
}

pub async fn get_order(State(s): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<Order>> {
    sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = $1")
        .bind(id)
        .fetch_optional(&s.db)
        .await?
        .map(Json)
        .ok_or(StoreError::NotFound)
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
}

pub async fn update_status(
    State(s): State<AppState>,
    Path(id): Path<Uuid>,
    Json(r): Json<UpdateStatusRequest>,
) -> Result<Json<Order>> {
    let order = sqlx::query_as::<_, Order>(
        "UPDATE orders SET status = $2 WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(r.status)
    .fetch_optional(&s.db)
    .await?
    .ok_or(StoreError::NotFound)?;
    Ok(Json(order))
}

pub async fn delete_order(State(s): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode> {
    let result = sqlx::query("DELETE FROM orders WHERE id = $1")
        .bind(id)
        .execute(&s.db)
        .await?;
    if result.rows_affected() == 0 {
        return Err(StoreError::NotFound);
    }
    Ok(StatusCode::NO_CONTENT)
}
